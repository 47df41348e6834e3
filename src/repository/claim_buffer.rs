//! Append-only claim buffer repository
//!
//! Each emitted claim is appended once, in emission order, to a per-job
//! list. Reconnects replay the list; the stored records are never rewritten.

use std::sync::Arc;
use std::time::Duration;

use crate::model::Claim;
use crate::repository::RepositoryError;
use crate::store::{TtlStore, keys};

pub struct ClaimBufferRepository {
    store: Arc<dyn TtlStore>,
    ttl: Duration,
}

impl ClaimBufferRepository {
    pub fn new(store: Arc<dyn TtlStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Append a claim to the end of the job's buffer, refreshing its TTL.
    ///
    /// Fails with `DuplicateClaim` when a claim with the same id is already
    /// buffered; that check is what makes reconnect-driven re-emission safe.
    /// The stored shape is always unverified; verdicts are merged in at read
    /// time, never written here.
    pub async fn append(&self, job_id: &str, claim: &Claim) -> Result<(), RepositoryError> {
        let key = keys::claims(job_id);

        for raw in self.store.list(&key).await? {
            if let Ok(existing) = serde_json::from_slice::<Claim>(&raw) {
                if existing.id == claim.id {
                    return Err(RepositoryError::DuplicateClaim {
                        job_id: job_id.to_string(),
                        claim_id: claim.id.clone(),
                    });
                }
            }
        }

        let stored = Claim {
            verification: None,
            ..claim.clone()
        };
        let payload = serde_json::to_vec(&stored)?;
        self.store.append(&key, &payload, self.ttl).await?;
        Ok(())
    }

    /// All buffered claims in original emission order.
    ///
    /// An empty buffer for a live job is an empty vec, not an error;
    /// `NotFound` means the job itself is gone.
    pub async fn list_all(&self, job_id: &str) -> Result<Vec<Claim>, RepositoryError> {
        let key = keys::claims(job_id);
        let items = self.store.list(&key).await?;

        if items.is_empty() {
            if self.store.get(&keys::job(job_id)).await?.is_none() {
                return Err(RepositoryError::NotFound(job_id.to_string()));
            }
            return Ok(Vec::new());
        }

        let mut out = Vec::with_capacity(items.len());
        for raw in items {
            match serde_json::from_slice::<Claim>(&raw) {
                Ok(claim) => out.push(claim),
                Err(err) => {
                    // Skip malformed entries instead of breaking the stream
                    tracing::warn!(job_id = %job_id, error = %err, "skipping malformed buffered claim");
                }
            }
        }

        self.store.expire(&key, self.ttl).await?;
        Ok(out)
    }
}
