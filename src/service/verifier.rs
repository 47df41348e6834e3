//! Verifier seam and the built-in lexical stand-in
//!
//! The real retrieval/LLM judgment is an external collaborator; callers
//! only depend on the [`ClaimVerifier`] trait.

use async_trait::async_trait;

use crate::model::claim::{Evidence, Verdict, clip_words};

/// A source document submitted for verification, already reduced to text.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub title: String,
    pub text: String,
}

/// Raw verifier output before persistence shaping
#[derive(Debug, Clone)]
pub struct VerifierOutput {
    pub verdict: Verdict,
    pub confidence: f64,
    pub reasoning_md: String,
    pub evidence: Vec<Evidence>,
}

#[derive(Debug, thiserror::Error)]
pub enum VerifierError {
    #[error("verifier failure: {0}")]
    Failed(String),
}

#[async_trait]
pub trait ClaimVerifier: Send + Sync {
    async fn verify(
        &self,
        claim_text: &str,
        source: &SourceDocument,
    ) -> Result<VerifierOutput, VerifierError>;
}

const SUPPORTED_THRESHOLD: f64 = 0.8;
const PARTIAL_THRESHOLD: f64 = 0.5;

/// Word-overlap verifier: scores each paragraph of the source against the
/// claim by in-order word matching and judges support from the best match.
pub struct LexicalVerifier {
    top_k: usize,
}

impl Default for LexicalVerifier {
    fn default() -> Self {
        Self { top_k: 4 }
    }
}

impl LexicalVerifier {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClaimVerifier for LexicalVerifier {
    async fn verify(
        &self,
        claim_text: &str,
        source: &SourceDocument,
    ) -> Result<VerifierOutput, VerifierError> {
        let paragraphs: Vec<&str> = source
            .text
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

        if paragraphs.is_empty() {
            return Err(VerifierError::Failed("source document is empty".to_string()));
        }

        let mut scored: Vec<(usize, f64)> = paragraphs
            .iter()
            .enumerate()
            .map(|(i, p)| (i, word_subsequence_ratio(claim_text, p)))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(self.top_k);

        let best = scored.first().map(|(_, s)| *s).unwrap_or(0.0);
        let verdict = if best >= SUPPORTED_THRESHOLD {
            Verdict::Supported
        } else if best >= PARTIAL_THRESHOLD {
            Verdict::PartiallySupported
        } else {
            Verdict::Unsupported
        };

        let evidence: Vec<Evidence> = scored
            .iter()
            .filter(|(_, score)| *score > 0.0)
            .map(|(i, _)| Evidence {
                paper_title: source.title.clone(),
                page: 1,
                section: None,
                paragraph: *i as u32 + 1,
                excerpt: clip_words(paragraphs[*i], 140),
            })
            .collect();

        let reasoning_md = match verdict {
            Verdict::Supported => format!(
                "The source text closely matches the claim (best paragraph overlap {:.0}%).",
                best * 100.0
            ),
            Verdict::PartiallySupported => format!(
                "The source text partially matches the claim (best paragraph overlap {:.0}%).",
                best * 100.0
            ),
            Verdict::Unsupported => format!(
                "No paragraph in the source substantially matches the claim (best overlap {:.0}%).",
                best * 100.0
            ),
        };

        Ok(VerifierOutput {
            verdict,
            confidence: best,
            reasoning_md,
            evidence,
        })
    }
}

/// Fraction of the claim's words that appear in `text` in order
/// (subsequence match over punctuation-stripped, lowercased words).
fn word_subsequence_ratio(claim: &str, text: &str) -> f64 {
    let claim_words: Vec<String> = claim
        .split_whitespace()
        .map(normalize_word)
        .filter(|w| !w.is_empty())
        .collect();
    if claim_words.is_empty() {
        return 0.0;
    }

    let text_words: Vec<String> = text
        .split_whitespace()
        .map(normalize_word)
        .filter(|w| !w.is_empty())
        .collect();

    let mut text_idx = 0;
    let mut matched = 0usize;
    for word in &claim_words {
        while text_idx < text_words.len() {
            if &text_words[text_idx] == word {
                matched += 1;
                text_idx += 1;
                break;
            }
            text_idx += 1;
        }
    }

    matched as f64 / claim_words.len() as f64
}

fn normalize_word(w: &str) -> String {
    w.trim_matches(|c: char| c.is_ascii_punctuation())
        .to_lowercase()
}
