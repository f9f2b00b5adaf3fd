//! Session domain
//!
//! Types exchanged with a decision backend: the context of one call and the
//! generation it returns.

pub mod entities;
pub mod response;

pub use entities::{ContextMessage, GenerationContext, Requester, Role};
pub use response::Generation;
