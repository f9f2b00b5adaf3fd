//! Engine phase (state machine position)

use serde::{Deserialize, Serialize};

/// Position of the conversation engine in its turn cycle
///
/// ```text
/// Idle → Selecting → Executing → Appending → Evaluating ─┬→ Selecting
///                                                        └→ Terminated
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnginePhase {
    Idle,
    Selecting,
    Executing,
    Appending,
    Evaluating,
    Terminated,
}

impl EnginePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnginePhase::Idle => "idle",
            EnginePhase::Selecting => "selecting",
            EnginePhase::Executing => "executing",
            EnginePhase::Appending => "appending",
            EnginePhase::Evaluating => "evaluating",
            EnginePhase::Terminated => "terminated",
        }
    }

    /// Whether `next` is a legal successor of this phase.
    pub fn can_transition_to(&self, next: EnginePhase) -> bool {
        use EnginePhase::*;
        matches!(
            (self, next),
            (Idle, Selecting)
                | (Selecting, Executing)
                | (Executing, Appending)
                | (Appending, Evaluating)
                | (Evaluating, Selecting)
                | (Evaluating, Terminated)
                | (Terminated, Idle)
        )
    }
}

impl std::fmt::Display for EnginePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
