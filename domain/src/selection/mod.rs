//! Speaker selection rules that need no model call.
//!
//! The leader must act first on a new task and immediately after any other
//! participant has spoken. Only when the leader itself spoke last does the
//! decision fall through to a pluggable ranking strategy.

use crate::conversation::history::History;
use crate::participant::entities::ParticipantId;
use crate::participant::roster::Roster;
use serde::{Deserialize, Serialize};

/// Outcome of the deterministic override rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeakerDecision {
    /// This participant must speak next
    Speaker(ParticipantId),
    /// No override applies; ask the fallback strategy
    Defer,
}

/// How the next speaker was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMethod {
    /// The leader override rule applied
    Override,
    /// The fallback strategy picked a candidate
    Strategy,
    /// The strategy had no answer, so the leader was used
    DefaultLeader,
    /// The strategy had no answer and the leader may not speak twice in a
    /// row, so the first remaining candidate was used
    FirstCandidate,
}

impl SelectionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionMethod::Override => "override",
            SelectionMethod::Strategy => "strategy",
            SelectionMethod::DefaultLeader => "default_leader",
            SelectionMethod::FirstCandidate => "first_candidate",
        }
    }
}

impl std::fmt::Display for SelectionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The participant that takes the next turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub speaker: ParticipantId,
    pub method: SelectionMethod,
}

impl Selection {
    pub fn new(speaker: ParticipantId, method: SelectionMethod) -> Self {
        Self { speaker, method }
    }
}

/// The leader-always-re-engages rule
pub struct LeaderOverride;

impl LeaderOverride {
    /// Hand the floor to the leader unless the leader spoke last.
    pub fn apply(roster: &Roster, history: &History) -> SpeakerDecision {
        match history.last() {
            Some(last) if last.source().is(roster.leader()) => SpeakerDecision::Defer,
            _ => SpeakerDecision::Speaker(roster.leader().clone()),
        }
    }
}

/// Candidate speakers for the fallback strategy.
///
/// With `allow_repeated_speaker` off, the author of the last message is
/// excluded so the floor has to change hands.
pub fn candidates(
    roster: &Roster,
    history: &History,
    allow_repeated_speaker: bool,
) -> Vec<ParticipantId> {
    let previous = history.last().and_then(|m| m.source().participant());
    roster
        .ids()
        .filter(|id| allow_repeated_speaker || Some(*id) != previous)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::message::MessageDraft;
    use crate::participant::entities::Participant;

    fn id(name: &str) -> ParticipantId {
        ParticipantId::try_new(name).unwrap()
    }

    fn roster() -> Roster {
        Roster::new(
            vec![
                Participant::new(id("Planner"), "Leads"),
                Participant::new(id("A"), "Does A"),
                Participant::new(id("B"), "Does B"),
            ],
            id("Planner"),
        )
        .unwrap()
    }

    #[test]
    fn test_empty_history_selects_leader() {
        assert_eq!(
            LeaderOverride::apply(&roster(), &History::new()),
            SpeakerDecision::Speaker(id("Planner"))
        );
    }

    #[test]
    fn test_user_message_selects_leader() {
        let mut history = History::new();
        history.begin_task("new task");
        assert_eq!(
            LeaderOverride::apply(&roster(), &history),
            SpeakerDecision::Speaker(id("Planner"))
        );
    }

    #[test]
    fn test_member_message_selects_leader() {
        let mut history = History::new();
        history.append(MessageDraft::from_participant(id("Planner"), "assign task"));
        history.append(MessageDraft::from_participant(id("A"), "done"));
        assert_eq!(
            LeaderOverride::apply(&roster(), &history),
            SpeakerDecision::Speaker(id("Planner"))
        );
    }

    #[test]
    fn test_leader_message_defers() {
        let mut history = History::new();
        history.append(MessageDraft::from_participant(id("Planner"), "assign task"));
        assert_eq!(
            LeaderOverride::apply(&roster(), &history),
            SpeakerDecision::Defer
        );
    }

    #[test]
    fn test_candidates_respect_repeat_flag() {
        let mut history = History::new();
        history.append(MessageDraft::from_participant(id("Planner"), "assign task"));

        assert_eq!(candidates(&roster(), &history, true).len(), 3);
        let alternating = candidates(&roster(), &history, false);
        assert_eq!(alternating, vec![id("A"), id("B")]);
    }
}
