pub mod producer;
pub mod session;
pub mod verifier;
pub mod verify;

pub use producer::{ClaimProducer, ClaimStream, ProducerEvent, ScriptedProducer};
pub use session::StreamingSession;
pub use verifier::{ClaimVerifier, LexicalVerifier, SourceDocument};
pub use verify::{VerificationService, VerifyError};
