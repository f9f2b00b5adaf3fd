//! Conversation domain.
//!
//! - [`message::Message`] — one immutable entry of the shared history
//! - [`history::History`] — the append-only message sequence of a run
//! - [`phase::EnginePhase`] — where the engine is in its turn cycle

pub mod history;
pub mod message;
pub mod phase;

pub use history::History;
pub use message::{Message, MessageDraft, MessageStatus, Source};
pub use phase::EnginePhase;
