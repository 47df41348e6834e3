//! Ephemeral repositories scoped to a job's TTL window
//!
//! All mutation goes through these narrow operations (set, append, upsert,
//! touch); no caller read-modifies-writes a composite object.

pub mod claim_buffer;
pub mod job;
pub mod verification;

pub use claim_buffer::ClaimBufferRepository;
pub use job::JobRepository;
pub use verification::VerificationRepository;

use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The job expired or never existed. Expected signal, not a fault: the
    /// caller's job context is gone and it must re-upload.
    #[error("job not found: {0}")]
    NotFound(String),

    #[error("job already exists: {0}")]
    AlreadyExists(String),

    /// A claim with this id is already buffered. Consumed by the session
    /// controller as a redelivery signal, never surfaced to clients.
    #[error("duplicate claim {claim_id} for job {job_id}")]
    DuplicateClaim { job_id: String, claim_id: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
