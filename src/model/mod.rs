pub mod claim;
pub mod config;
pub mod job;
pub mod stream;

pub use claim::{CitationStatus, Claim, Evidence, Verdict, VerificationOutcome, VerificationRecord};
pub use config::Config;
pub use job::{Job, JobStatus};
pub use stream::{ErrorPayload, ProgressPayload, StreamEvent};
