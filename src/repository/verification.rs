//! Verification record repository
//!
//! Persists backend-generated verdicts per (jobId, claimId). Last write
//! wins; user choices like "skip" are never stored.

use std::sync::Arc;
use std::time::Duration;

use crate::model::VerificationRecord;
use crate::repository::RepositoryError;
use crate::store::{TtlStore, keys};

pub struct VerificationRepository {
    store: Arc<dyn TtlStore>,
    ttl: Duration,
}

impl VerificationRepository {
    pub fn new(store: Arc<dyn TtlStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Upsert: unconditionally replaces any prior record for the same key.
    /// Idempotent, so client retries of the verify call are harmless.
    pub async fn put(
        &self,
        job_id: &str,
        record: &VerificationRecord,
    ) -> Result<(), RepositoryError> {
        let payload = serde_json::to_vec(record)?;
        self.store
            .set(
                &keys::verification(job_id, &record.claim_id),
                &payload,
                self.ttl,
            )
            .await?;
        tracing::debug!(job_id = %job_id, claim_id = %record.claim_id, "verification stored");
        Ok(())
    }

    /// `None` is the expected "not yet verified" result, not a failure.
    /// Refreshes the record's TTL on a hit.
    pub async fn get(
        &self,
        job_id: &str,
        claim_id: &str,
    ) -> Result<Option<VerificationRecord>, RepositoryError> {
        let key = keys::verification(job_id, claim_id);
        let raw = match self.store.get(&key).await? {
            Some(raw) => raw,
            None => return Ok(None),
        };

        let record = match serde_json::from_slice(&raw) {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!(job_id = %job_id, claim_id = %claim_id, error = %err, "skipping malformed verification record");
                return Ok(None);
            }
        };

        self.store.expire(&key, self.ttl).await?;
        Ok(Some(record))
    }
}
