//! Upstream claim producer seam
//!
//! The extraction/classification pipeline lives outside this service; the
//! session controller only sees a finite, cancellable stream of events.

use std::time::Duration;

use futures::StreamExt;
use futures::stream::BoxStream;

use crate::model::claim::{CitationStatus, Claim};

/// One unit of upstream output: a discovered claim, or a revised page/unit
/// count. `total` may grow as more material is discovered, never shrink.
#[derive(Debug, Clone)]
pub enum ProducerEvent {
    Claim(Claim),
    Progress { processed: u32, total: u32 },
}

pub type ClaimStream = BoxStream<'static, ProducerEvent>;

/// Source of incrementally-discovered claims for a job.
///
/// The stream is finite and not restartable; dropping it cancels
/// production. Delivery is at-least-once: a reconnecting consumer may see
/// claims it already handled.
pub trait ClaimProducer: Send + Sync {
    fn produce(&self, job_id: &str) -> ClaimStream;
}

/// Replays a fixed script of events, optionally paced. Stands in for the
/// extraction pipeline and drives the session tests.
pub struct ScriptedProducer {
    events: Vec<ProducerEvent>,
    pace: Duration,
}

impl ScriptedProducer {
    pub fn new(events: Vec<ProducerEvent>) -> Self {
        Self {
            events,
            pace: Duration::ZERO,
        }
    }

    pub fn with_pace(mut self, pace: Duration) -> Self {
        self.pace = pace;
        self
    }

    /// Small built-in document so the server is exercisable end to end
    /// without a real extraction pipeline.
    pub fn demo() -> Self {
        let claims = [
            (
                "c1",
                "Transformers outperform RNNs on translation tasks.",
                CitationStatus::Cited,
            ),
            (
                "c2",
                "Pretraining improves zero-shot performance in most language tasks.",
                CitationStatus::WeaklyCited,
            ),
            (
                "c3",
                "Graph neural networks strictly dominate CNNs for all vision tasks.",
                CitationStatus::Uncited,
            ),
        ];

        let total = claims.len() as u32;
        let mut events = Vec::with_capacity(claims.len() * 2);
        for (i, (id, text, status)) in claims.into_iter().enumerate() {
            events.push(ProducerEvent::Claim(Claim::unverified(id, text, status)));
            events.push(ProducerEvent::Progress {
                processed: i as u32 + 1,
                total,
            });
        }

        Self::new(events).with_pace(Duration::from_millis(350))
    }
}

impl ClaimProducer for ScriptedProducer {
    fn produce(&self, _job_id: &str) -> ClaimStream {
        let pace = self.pace;
        futures::stream::iter(self.events.clone())
            .then(move |event| async move {
                if !pace.is_zero() {
                    tokio::time::sleep(pace).await;
                }
                event
            })
            .boxed()
    }
}
