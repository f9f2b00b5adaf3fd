//! Prompt domain
//!
//! Templates for the prompts the engine itself writes. Participant system
//! prompts belong to each [`Participant`](crate::participant::Participant).

pub mod template;

pub use template::{DEFAULT_SELECTOR_TEMPLATE, SelectorPrompt};
