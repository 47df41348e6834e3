//! Verification submission service
//!
//! Guards against gone jobs, runs the verifier collaborator, caps evidence
//! excerpts, persists the record and returns the merged shape.

use std::sync::Arc;

use chrono::Utc;

use crate::model::claim::{Evidence, VerificationOutcome, VerificationRecord};
use crate::repository::{
    ClaimBufferRepository, JobRepository, RepositoryError, VerificationRepository,
};
use crate::service::verifier::{ClaimVerifier, SourceDocument, VerifierError};

const DEFAULT_REASONING: &str = "Automated verification result.";

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// The job expired or never existed; refusing to persist an orphaned
    /// record.
    #[error("unknown or expired job: {0}")]
    JobGone(String),

    #[error(transparent)]
    Verifier(#[from] VerifierError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub struct VerificationService {
    jobs: Arc<JobRepository>,
    buffer: Arc<ClaimBufferRepository>,
    verifications: Arc<VerificationRepository>,
    verifier: Arc<dyn ClaimVerifier>,
}

impl VerificationService {
    pub fn new(
        jobs: Arc<JobRepository>,
        buffer: Arc<ClaimBufferRepository>,
        verifications: Arc<VerificationRepository>,
        verifier: Arc<dyn ClaimVerifier>,
    ) -> Self {
        Self {
            jobs,
            buffer,
            verifications,
            verifier,
        }
    }

    /// Verify one claim against a submitted source and persist the verdict.
    ///
    /// Resubmitting the same verification is idempotent (last write wins in
    /// the repository). The claim need not be buffered yet: a record stored
    /// ahead of the claim merges in whenever the claim arrives.
    pub async fn verify_claim(
        &self,
        job_id: &str,
        claim_id: &str,
        source: SourceDocument,
    ) -> Result<VerificationRecord, VerifyError> {
        let job = self
            .jobs
            .get(job_id)
            .await?
            .ok_or_else(|| VerifyError::JobGone(job_id.to_string()))?;

        let claim_text = match self.buffer.list_all(job_id).await {
            Ok(buffered) => buffered
                .into_iter()
                .find(|c| c.id == claim_id)
                .map(|c| c.text),
            Err(RepositoryError::NotFound(id)) => return Err(VerifyError::JobGone(id)),
            Err(err) => return Err(err.into()),
        };
        // Verification may precede claim arrival; fall back to the id as
        // the text to check.
        let claim_text = claim_text.unwrap_or_else(|| claim_id.to_string());

        let output = self.verifier.verify(&claim_text, &source).await?;

        let reasoning_md = if output.reasoning_md.trim().is_empty() {
            DEFAULT_REASONING.to_string()
        } else {
            output.reasoning_md
        };

        let record = VerificationRecord {
            claim_id: claim_id.to_string(),
            outcome: VerificationOutcome {
                verdict: output.verdict,
                confidence: output.confidence.clamp(0.0, 1.0),
                reasoning_md,
                evidence: output
                    .evidence
                    .into_iter()
                    .map(Evidence::with_capped_excerpt)
                    .collect(),
            },
            written_at: Utc::now(),
        };

        self.verifications.put(job_id, &record).await?;
        self.jobs.touch(job_id, job.status).await?;

        tracing::info!(
            job_id = %job_id,
            claim_id = %claim_id,
            verdict = ?record.outcome.verdict,
            "claim verified"
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::claim::{CitationStatus, Claim, MAX_EXCERPT_WORDS, Verdict};
    use crate::model::Job;
    use crate::service::verifier::{LexicalVerifier, VerifierOutput};
    use crate::store::{InMemoryTtlStore, TtlStore};
    use async_trait::async_trait;
    use std::time::Duration;

    const TTL: Duration = Duration::from_secs(7200);

    /// Verifier returning a fixed output, for shaping tests.
    struct FixedVerifier(VerifierOutput);

    #[async_trait]
    impl ClaimVerifier for FixedVerifier {
        async fn verify(
            &self,
            _claim_text: &str,
            _source: &SourceDocument,
        ) -> Result<VerifierOutput, VerifierError> {
            Ok(self.0.clone())
        }
    }

    struct Harness {
        jobs: Arc<JobRepository>,
        buffer: Arc<ClaimBufferRepository>,
        verifications: Arc<VerificationRepository>,
    }

    impl Harness {
        fn new() -> Self {
            let store: Arc<dyn TtlStore> = Arc::new(InMemoryTtlStore::new());
            Self {
                jobs: Arc::new(JobRepository::new(store.clone(), TTL)),
                buffer: Arc::new(ClaimBufferRepository::new(store.clone(), TTL)),
                verifications: Arc::new(VerificationRepository::new(store, TTL)),
            }
        }

        fn service(&self, verifier: Arc<dyn ClaimVerifier>) -> VerificationService {
            VerificationService::new(
                self.jobs.clone(),
                self.buffer.clone(),
                self.verifications.clone(),
                verifier,
            )
        }
    }

    fn source(text: &str) -> SourceDocument {
        SourceDocument {
            title: "Cited paper".to_string(),
            text: text.to_string(),
        }
    }

    fn long_evidence_output(words: usize) -> VerifierOutput {
        let excerpt = (0..words)
            .map(|i| format!("w{}", i))
            .collect::<Vec<_>>()
            .join(" ");
        VerifierOutput {
            verdict: Verdict::Supported,
            confidence: 0.9,
            reasoning_md: "ok".to_string(),
            evidence: vec![Evidence {
                paper_title: "Cited paper".to_string(),
                page: 1,
                section: None,
                paragraph: 1,
                excerpt,
            }],
        }
    }

    #[tokio::test]
    async fn gone_job_fails_without_persisting() {
        let harness = Harness::new();
        let service = harness.service(Arc::new(LexicalVerifier::new()));

        let err = service
            .verify_claim("ghost", "c1", source("anything"))
            .await
            .unwrap_err();
        assert!(matches!(err, VerifyError::JobGone(_)));
        assert!(harness
            .verifications
            .get("ghost", "c1")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn buffered_claim_text_is_checked_against_the_source() {
        let harness = Harness::new();
        harness.jobs.create(Job::new("j1")).await.unwrap();
        harness
            .buffer
            .append(
                "j1",
                &Claim::unverified(
                    "c1",
                    "Transformers outperform RNNs on translation tasks.",
                    CitationStatus::WeaklyCited,
                ),
            )
            .await
            .unwrap();

        let service = harness.service(Arc::new(LexicalVerifier::new()));
        let record = service
            .verify_claim(
                "j1",
                "c1",
                source("Our experiments show transformers outperform RNNs on translation tasks."),
            )
            .await
            .unwrap();

        assert_eq!(record.outcome.verdict, Verdict::Supported);
        assert_eq!(
            harness
                .verifications
                .get("j1", "c1")
                .await
                .unwrap()
                .unwrap(),
            record
        );
    }

    #[tokio::test]
    async fn overlong_excerpts_are_capped_before_storage() {
        let harness = Harness::new();
        harness.jobs.create(Job::new("j1")).await.unwrap();
        let service = harness.service(Arc::new(FixedVerifier(long_evidence_output(130))));

        let record = service
            .verify_claim("j1", "c1", source("whatever"))
            .await
            .unwrap();

        let stored = harness
            .verifications
            .get("j1", "c1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            stored.outcome.evidence[0]
                .excerpt
                .split_whitespace()
                .count(),
            MAX_EXCERPT_WORDS
        );
        assert_eq!(record.outcome.evidence[0], stored.outcome.evidence[0]);
    }

    #[tokio::test]
    async fn at_cap_excerpt_is_stored_unchanged() {
        let harness = Harness::new();
        harness.jobs.create(Job::new("j1")).await.unwrap();
        let output = long_evidence_output(100);
        let expected = output.evidence[0].excerpt.clone();
        let service = harness.service(Arc::new(FixedVerifier(output)));

        service
            .verify_claim("j1", "c1", source("whatever"))
            .await
            .unwrap();
        let stored = harness
            .verifications
            .get("j1", "c1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.outcome.evidence[0].excerpt, expected);
    }

    #[tokio::test]
    async fn verification_may_precede_claim_arrival() {
        let harness = Harness::new();
        harness.jobs.create(Job::new("j1")).await.unwrap();
        let service = harness.service(Arc::new(FixedVerifier(long_evidence_output(3))));

        // No claim buffered yet; the record is still stored and will merge
        // in whenever the claim is appended.
        service
            .verify_claim("j1", "c9", source("whatever"))
            .await
            .unwrap();
        assert!(harness
            .verifications
            .get("j1", "c9")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn blank_reasoning_gets_the_default_text() {
        let harness = Harness::new();
        harness.jobs.create(Job::new("j1")).await.unwrap();
        let mut output = long_evidence_output(3);
        output.reasoning_md = "   ".to_string();
        let service = harness.service(Arc::new(FixedVerifier(output)));

        let record = service
            .verify_claim("j1", "c1", source("whatever"))
            .await
            .unwrap();
        assert_eq!(record.outcome.reasoning_md, DEFAULT_REASONING);
    }

    #[tokio::test]
    async fn confidence_is_clamped_to_unit_interval() {
        let harness = Harness::new();
        harness.jobs.create(Job::new("j1")).await.unwrap();
        let mut output = long_evidence_output(3);
        output.confidence = 1.7;
        let service = harness.service(Arc::new(FixedVerifier(output)));

        let record = service
            .verify_claim("j1", "c1", source("whatever"))
            .await
            .unwrap();
        assert_eq!(record.outcome.confidence, 1.0);
    }
}
