//! Application state and service wiring
//!
//! Centralizes repository and service construction so handlers only depend
//! on one injected state object.

use std::sync::Arc;
use std::time::Duration;

use crate::repository::{ClaimBufferRepository, JobRepository, VerificationRepository};
use crate::service::{
    ClaimProducer, ClaimVerifier, StreamingSession, VerificationService,
};
use crate::store::TtlStore;

/// Shared state injected into every handler
#[derive(Clone)]
pub struct AppState {
    /// TTL store handle, exposed for the readiness probe
    pub store: Arc<dyn TtlStore>,
    pub jobs: Arc<JobRepository>,
    pub session: Arc<StreamingSession>,
    pub verification: Arc<VerificationService>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn TtlStore>,
        producer: Arc<dyn ClaimProducer>,
        verifier: Arc<dyn ClaimVerifier>,
        ttl: Duration,
    ) -> Self {
        let jobs = Arc::new(JobRepository::new(store.clone(), ttl));
        let buffer = Arc::new(ClaimBufferRepository::new(store.clone(), ttl));
        let verifications = Arc::new(VerificationRepository::new(store.clone(), ttl));

        let session = Arc::new(StreamingSession::new(
            jobs.clone(),
            buffer.clone(),
            verifications.clone(),
            producer,
        ));
        let verification = Arc::new(VerificationService::new(
            jobs.clone(),
            buffer,
            verifications,
            verifier,
        ));

        Self {
            store,
            jobs,
            session,
            verification,
        }
    }

    /// In-memory wiring with an unpaced demo producer, used by handler tests.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        use crate::service::{LexicalVerifier, ScriptedProducer};
        use crate::store::InMemoryTtlStore;

        Self::new(
            Arc::new(InMemoryTtlStore::new()),
            Arc::new(ScriptedProducer::demo().with_pace(Duration::ZERO)),
            Arc::new(LexicalVerifier::new()),
            Duration::from_secs(7200),
        )
    }
}
