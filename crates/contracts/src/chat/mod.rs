//! Wire contract between the chat widget and the `/chat` endpoint.
//!
//! Structure:
//! - envelope.rs: request/reply bodies and the tagged `ResponseEnvelope`
//! - artifact.rs: artifact kinds and typed payloads (table, filing)

pub mod artifact;
pub mod envelope;

pub use artifact::{cell_text, ArtifactKind, FilingArtifact, TableArtifact, TableRow};
pub use envelope::{ChatReply, ChatRequest, ResponseEnvelope};

/// Path of the single chat endpoint
pub const CHAT_PATH: &str = "/chat";
