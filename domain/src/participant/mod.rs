//! Participant registry domain.
//!
//! - [`entities::ParticipantId`] — unique participant name
//! - [`entities::Participant`] — description, system prompt and tool set of one participant
//! - [`roster::Roster`] — the read-only registry with its designated leader

pub mod entities;
pub mod roster;

pub use entities::{Participant, ParticipantId, USER_SOURCE};
pub use roster::Roster;
