//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// Raised while building the static pieces of a run (roster, tasks).
/// Runtime failures of the engine live in the application layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Roster must contain at least one participant")]
    EmptyRoster,

    #[error("Duplicate participant identity: {0}")]
    DuplicateParticipant(String),

    #[error("Leader '{0}' is not part of the roster")]
    UnknownLeader(String),

    #[error("Participant identity '{0}' is reserved")]
    ReservedIdentity(String),

    #[error("Invalid participant identity: {0:?}")]
    InvalidIdentity(String),

    #[error("Invalid task: {0}")]
    InvalidTask(String),
}
