//! Streaming session controller
//!
//! Owns claim emission order and merge semantics. Each connect/reconnect
//! replays the buffered claims (merged with the freshest verification
//! state), then bridges the live producer, emitting every claim exactly
//! once per session.

use std::collections::HashSet;
use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::SendError;

use crate::model::{Claim, JobStatus, StreamEvent};
use crate::repository::{
    ClaimBufferRepository, JobRepository, RepositoryError, VerificationRepository,
};
use crate::service::producer::{ClaimProducer, ProducerEvent};

/// Why a session stopped before its normal `done`.
enum SessionHalt {
    /// Receiver dropped: the client went away. Aborts the live phase
    /// promptly; everything already written stays written.
    Disconnected,
    /// Job expired or never existed; the caller must re-upload.
    JobGone(String),
    Repository(RepositoryError),
}

impl From<SendError<StreamEvent>> for SessionHalt {
    fn from(_: SendError<StreamEvent>) -> Self {
        SessionHalt::Disconnected
    }
}

impl From<RepositoryError> for SessionHalt {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => SessionHalt::JobGone(id),
            other => SessionHalt::Repository(other),
        }
    }
}

#[derive(Clone)]
pub struct StreamingSession {
    jobs: Arc<JobRepository>,
    buffer: Arc<ClaimBufferRepository>,
    verifications: Arc<VerificationRepository>,
    producer: Arc<dyn ClaimProducer>,
}

impl StreamingSession {
    pub fn new(
        jobs: Arc<JobRepository>,
        buffer: Arc<ClaimBufferRepository>,
        verifications: Arc<VerificationRepository>,
        producer: Arc<dyn ClaimProducer>,
    ) -> Self {
        Self {
            jobs,
            buffer,
            verifications,
            producer,
        }
    }

    /// Run one session, emitting events into `tx` until the producer
    /// finishes or the client disconnects.
    pub async fn run(&self, job_id: &str, tx: mpsc::Sender<StreamEvent>) {
        match self.stream(job_id, &tx).await {
            Ok(()) => {}
            Err(SessionHalt::Disconnected) => {
                tracing::debug!(job_id = %job_id, "client disconnected, session aborted");
            }
            Err(SessionHalt::JobGone(id)) => {
                tracing::info!(job_id = %id, "stream requested for unknown or expired job");
                let _ = tx.send(StreamEvent::error("Unknown or expired jobId")).await;
                let _ = tx.send(StreamEvent::Done).await;
            }
            Err(SessionHalt::Repository(err)) => {
                tracing::error!(job_id = %job_id, error = %err, "session failed");
                let _ = tx
                    .send(StreamEvent::error("Internal error, please retry"))
                    .await;
                let _ = tx.send(StreamEvent::Done).await;
            }
        }
    }

    async fn stream(
        &self,
        job_id: &str,
        tx: &mpsc::Sender<StreamEvent>,
    ) -> Result<(), SessionHalt> {
        let job = self
            .jobs
            .get(job_id)
            .await?
            .ok_or_else(|| SessionHalt::JobGone(job_id.to_string()))?;

        // Progress accounting survives reconnects via the stored counters.
        let mut processed = job.processed;
        let mut total = job.total;
        if total > 0 {
            tx.send(StreamEvent::progress(processed, total)).await?;
        }

        self.jobs.touch(job_id, JobStatus::Streaming).await?;

        // Replay phase: everything already buffered goes out first, in
        // original order, merged with the current verification state.
        let buffered = self.buffer.list_all(job_id).await?;
        let mut replayed: HashSet<String> = HashSet::with_capacity(buffered.len());
        for claim in &buffered {
            replayed.insert(claim.id.clone());
            self.emit_merged(job_id, claim, tx).await?;
        }
        if !buffered.is_empty() {
            tracing::debug!(job_id = %job_id, count = buffered.len(), "replayed buffered claims");
        }

        // Live phase: bridge the producer until it runs dry.
        let mut events = self.producer.produce(job_id);
        while let Some(event) = events.next().await {
            match event {
                ProducerEvent::Claim(claim) => {
                    if replayed.contains(&claim.id) {
                        continue; // already sent during replay
                    }
                    match self.buffer.append(job_id, &claim).await {
                        Ok(()) => {}
                        Err(RepositoryError::DuplicateClaim { claim_id, .. }) => {
                            // At-least-once redelivery from upstream; the
                            // claim already reached the client.
                            tracing::debug!(job_id = %job_id, claim_id = %claim_id, "skipping redelivered claim");
                            continue;
                        }
                        Err(err) => return Err(err.into()),
                    }
                    self.jobs.touch(job_id, JobStatus::Streaming).await?;
                    self.emit_merged(job_id, &claim, tx).await?;
                }
                ProducerEvent::Progress {
                    processed: p,
                    total: t,
                } => {
                    processed = processed.max(p);
                    total = total.max(t);
                    self.jobs.update_progress(job_id, processed, total).await?;
                    tx.send(StreamEvent::progress(processed, total)).await?;
                }
            }
        }

        self.jobs.touch(job_id, JobStatus::Completed).await?;
        tx.send(StreamEvent::Done).await?;
        Ok(())
    }

    /// Merge-at-emit: the buffered record stays unverified-shaped; the
    /// verification state is read fresh for every emission.
    async fn emit_merged(
        &self,
        job_id: &str,
        claim: &Claim,
        tx: &mpsc::Sender<StreamEvent>,
    ) -> Result<(), SessionHalt> {
        let saved = self.verifications.get(job_id, &claim.id).await?;
        tx.send(StreamEvent::claim(claim.merged_with(saved.as_ref())))
            .await?;
        Ok(())
    }
}
