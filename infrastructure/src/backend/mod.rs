//! Decision backend adapters
//!
//! - [`OpenAiBackend`]: any OpenAI-compatible chat completions server
//! - [`ScriptedBackend`]: deterministic offline stand-in

mod openai;
mod scripted;

pub use openai::OpenAiBackend;
pub use scripted::{Play, ScriptedBackend};
