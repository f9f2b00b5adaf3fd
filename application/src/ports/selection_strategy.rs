//! Selection strategy port
//!
//! The fallback used by the turn selector whenever the leader override rule
//! does not apply (that is, right after the leader has spoken).

use crate::ports::decision_backend::BackendError;
use async_trait::async_trait;
use crew_domain::{History, ParticipantId, Roster};
use thiserror::Error;

/// Errors raised while choosing the next speaker
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Unknown participant: {0}")]
    UnknownParticipant(String),

    #[error("Participant {0} is not an eligible candidate")]
    NotACandidate(String),

    #[error("No participant may take the next turn")]
    NoCandidates,

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}

/// Ranks the eligible candidates and picks one
///
/// Returning `Ok(None)` means "no opinion"; the selector then falls back to
/// the leader, or to the first candidate when the leader is excluded.
#[async_trait]
pub trait SelectionStrategy: Send + Sync {
    async fn select(
        &self,
        roster: &Roster,
        candidates: &[ParticipantId],
        history: &History,
    ) -> Result<Option<ParticipantId>, SelectionError>;

    /// Short name used in logs and configuration
    fn name(&self) -> &'static str;
}
