//! Claim, evidence and verification value types shared by all repositories

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Maximum number of words kept in an evidence excerpt.
pub const MAX_EXCERPT_WORDS: usize = 100;

/// Citation status assigned by the upstream extraction step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CitationStatus {
    Cited,
    Uncited,
    WeaklyCited,
}

/// Outcome classification of verifying a claim against a source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Supported,
    PartiallySupported,
    Unsupported,
}

/// A bounded excerpt-with-location cited in support of a verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Evidence {
    pub paper_title: String,
    /// 1-based page index in the source document
    pub page: u32,
    pub section: Option<String>,
    /// 1-based paragraph ordinal within the page
    pub paragraph: u32,
    pub excerpt: String,
}

impl Evidence {
    /// Cap the excerpt at [`MAX_EXCERPT_WORDS`], truncating at the word
    /// boundary. The truncation is lossy; inputs at or under the cap are
    /// kept byte-for-byte.
    pub fn with_capped_excerpt(mut self) -> Self {
        self.excerpt = clip_words(&self.excerpt, MAX_EXCERPT_WORDS);
        self
    }
}

/// The verification layer of a claim. Verdict, confidence, reasoning and
/// evidence are always populated together; a claim either carries all of
/// them or none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerificationOutcome {
    pub verdict: Verdict,
    /// Confidence in the verdict, in [0, 1]
    pub confidence: f64,
    pub reasoning_md: String,
    pub evidence: Vec<Evidence>,
}

/// A single extracted factual statement plus its citation/verification state.
///
/// The buffered form always carries `verification: None`; the verified view
/// is produced at read time by [`Claim::merged_with`], never by rewriting
/// the stored record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Claim {
    pub id: String,
    pub text: String,
    pub status: CitationStatus,
    #[serde(flatten)]
    pub verification: Option<VerificationOutcome>,
}

impl Claim {
    pub fn unverified(
        id: impl Into<String>,
        text: impl Into<String>,
        status: CitationStatus,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            status,
            verification: None,
        }
    }

    /// Read-time merge: the view of this claim enriched with a saved
    /// verification record, citation status untouched.
    pub fn merged_with(&self, record: Option<&VerificationRecord>) -> Claim {
        let mut view = self.clone();
        if let Some(record) = record {
            view.verification = Some(record.outcome.clone());
        }
        view
    }
}

/// Persisted verdict for one (job, claim) pair; a later write for the same
/// key fully replaces the earlier one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRecord {
    pub claim_id: String,
    #[serde(flatten)]
    pub outcome: VerificationOutcome,
    pub written_at: DateTime<Utc>,
}

/// Trim `text` to at most `max_words` whitespace-separated words.
pub fn clip_words(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max_words {
        return text.to_string();
    }
    words[..max_words].join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n_words(n: usize) -> String {
        (0..n).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn clip_words_truncates_long_input_to_cap() {
        let clipped = clip_words(&n_words(130), MAX_EXCERPT_WORDS);
        assert_eq!(clipped.split_whitespace().count(), 100);
        assert!(clipped.ends_with("w99"));
    }

    #[test]
    fn clip_words_keeps_input_at_cap_unchanged() {
        let text = n_words(100);
        assert_eq!(clip_words(&text, MAX_EXCERPT_WORDS), text);
    }

    #[test]
    fn clip_words_keeps_input_under_cap_unchanged() {
        let text = n_words(99);
        assert_eq!(clip_words(&text, MAX_EXCERPT_WORDS), text);
    }

    #[test]
    fn unverified_claim_serializes_without_verification_fields() {
        let claim = Claim::unverified("c1", "Water boils at 100C.", CitationStatus::Cited);
        let json = serde_json::to_value(&claim).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": "c1", "text": "Water boils at 100C.", "status": "cited"})
        );
    }

    #[test]
    fn merged_claim_carries_full_verification_layer() {
        let claim = Claim::unverified("c1", "Water boils at 100C.", CitationStatus::WeaklyCited);
        let record = VerificationRecord {
            claim_id: "c1".to_string(),
            outcome: VerificationOutcome {
                verdict: Verdict::Supported,
                confidence: 0.82,
                reasoning_md: "Matches the source.".to_string(),
                evidence: vec![Evidence {
                    paper_title: "Thermodynamics".to_string(),
                    page: 3,
                    section: Some("Results".to_string()),
                    paragraph: 2,
                    excerpt: "boils at 100C at sea level".to_string(),
                }],
            },
            written_at: Utc::now(),
        };

        let merged = claim.merged_with(Some(&record));
        assert_eq!(merged.status, CitationStatus::WeaklyCited);
        let outcome = merged.verification.expect("merged claim must be verified");
        assert_eq!(outcome.verdict, Verdict::Supported);
        assert_eq!(outcome.confidence, 0.82);
        assert_eq!(outcome.evidence.len(), 1);

        let json = serde_json::to_value(claim.merged_with(Some(&record))).unwrap();
        assert_eq!(json["verdict"], "supported");
        assert_eq!(json["reasoningMd"], "Matches the source.");
        assert_eq!(json["evidence"][0]["paperTitle"], "Thermodynamics");
    }

    #[test]
    fn merge_without_record_is_identity() {
        let claim = Claim::unverified("c9", "Some claim.", CitationStatus::Uncited);
        assert_eq!(claim.merged_with(None), claim);
    }
}
