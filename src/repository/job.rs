//! Job lifecycle repository

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use crate::model::{Job, JobStatus};
use crate::repository::RepositoryError;
use crate::store::{TtlStore, keys};

/// Owns job lifecycle metadata and lease renewal.
///
/// The TTL window restarts on every write touching the job; `get` is a
/// read-only peek and deliberately does not refresh it.
pub struct JobRepository {
    store: Arc<dyn TtlStore>,
    ttl: Duration,
}

impl JobRepository {
    pub fn new(store: Arc<dyn TtlStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Mint a job with a fresh UUID and persist it with the full TTL window.
    pub async fn mint(&self) -> Result<Job, RepositoryError> {
        self.create(Job::new(Uuid::new_v4().to_string())).await
    }

    /// Persist a new job. Fails with `AlreadyExists` when an unexpired job
    /// with the same id is present.
    pub async fn create(&self, job: Job) -> Result<Job, RepositoryError> {
        let key = keys::job(&job.id);
        if self.store.get(&key).await?.is_some() {
            return Err(RepositoryError::AlreadyExists(job.id));
        }
        self.put(&job).await?;
        tracing::debug!(job_id = %job.id, "job created");
        Ok(job)
    }

    /// Read-only peek; `None` means expired or never existed.
    pub async fn get(&self, job_id: &str) -> Result<Option<Job>, RepositoryError> {
        let raw = match self.store.get(&keys::job(job_id)).await? {
            Some(raw) => raw,
            None => return Ok(None),
        };
        match serde_json::from_slice(&raw) {
            Ok(job) => Ok(Some(job)),
            Err(err) => {
                tracing::warn!(job_id = %job_id, error = %err, "skipping malformed job record");
                Ok(None)
            }
        }
    }

    /// Update status and last-activity, resetting the TTL to the full
    /// window. `NotFound` is the expected signal that the job is gone.
    pub async fn touch(&self, job_id: &str, status: JobStatus) -> Result<Job, RepositoryError> {
        let mut job = self
            .get(job_id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(job_id.to_string()))?;
        job.status = status;
        job.last_activity = Utc::now();
        self.put(&job).await?;
        Ok(job)
    }

    /// Persist a progress snapshot. `processed` never regresses and `total`
    /// never decreases, whatever the caller hands in.
    pub async fn update_progress(
        &self,
        job_id: &str,
        processed: u32,
        total: u32,
    ) -> Result<Job, RepositoryError> {
        let mut job = self
            .get(job_id)
            .await?
            .ok_or_else(|| RepositoryError::NotFound(job_id.to_string()))?;
        job.processed = job.processed.max(processed);
        job.total = job.total.max(total);
        job.last_activity = Utc::now();
        self.put(&job).await?;
        Ok(job)
    }

    async fn put(&self, job: &Job) -> Result<(), RepositoryError> {
        let payload = serde_json::to_vec(job)?;
        self.store
            .set(&keys::job(&job.id), &payload, self.ttl)
            .await?;
        Ok(())
    }
}
