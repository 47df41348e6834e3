//! NDJSON wire messages for the claim stream
//!
//! One JSON object per line. `done` is terminal and emitted exactly once as
//! the last line of every session.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::claim::Claim;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    Claim { payload: Claim },
    Progress { payload: ProgressPayload },
    Error { payload: ErrorPayload },
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProgressPayload {
    pub processed: u32,
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorPayload {
    pub message: String,
}

impl StreamEvent {
    pub fn claim(claim: Claim) -> Self {
        Self::Claim { payload: claim }
    }

    pub fn progress(processed: u32, total: u32) -> Self {
        Self::Progress {
            payload: ProgressPayload { processed, total },
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            payload: ErrorPayload {
                message: message.into(),
            },
        }
    }

    /// Encode as one NDJSON line: compact JSON plus a trailing newline.
    pub fn to_ndjson(&self) -> Vec<u8> {
        // Serialization of these shapes cannot fail; fall back to an empty
        // line rather than poisoning the stream.
        let mut line = serde_json::to_vec(self).unwrap_or_default();
        line.push(b'\n');
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::claim::CitationStatus;

    #[test]
    fn claim_event_wire_shape() {
        let event = StreamEvent::claim(Claim::unverified(
            "c1",
            "The sky is blue.",
            CitationStatus::Uncited,
        ));
        let line = String::from_utf8(event.to_ndjson()).unwrap();
        assert_eq!(
            line,
            "{\"type\":\"claim\",\"payload\":{\"id\":\"c1\",\"text\":\"The sky is blue.\",\"status\":\"uncited\"}}\n"
        );
    }

    #[test]
    fn progress_event_wire_shape() {
        let line = String::from_utf8(StreamEvent::progress(2, 5).to_ndjson()).unwrap();
        assert_eq!(
            line,
            "{\"type\":\"progress\",\"payload\":{\"processed\":2,\"total\":5}}\n"
        );
    }

    #[test]
    fn done_event_wire_shape() {
        let line = String::from_utf8(StreamEvent::Done.to_ndjson()).unwrap();
        assert_eq!(line, "{\"type\":\"done\"}\n");
    }
}
