//! Participant registry
//!
//! The [`Roster`] is the static list of participants for a run. It keeps the
//! declaration order (used for enumeration by selection strategies) and the
//! designated leader that the override rule hands the floor back to.

use super::entities::{Participant, ParticipantId};
use crate::core::error::DomainError;
use std::collections::HashSet;

/// Static, read-only roster of participants with a designated leader
#[derive(Debug, Clone)]
pub struct Roster {
    participants: Vec<Participant>,
    leader: ParticipantId,
}

impl Roster {
    /// Build a roster from participants in declaration order.
    ///
    /// Fails when the list is empty, an identity appears twice, or the
    /// leader is not one of the participants.
    pub fn new(
        participants: Vec<Participant>,
        leader: ParticipantId,
    ) -> Result<Self, DomainError> {
        if participants.is_empty() {
            return Err(DomainError::EmptyRoster);
        }

        let mut seen = HashSet::new();
        for participant in &participants {
            if !seen.insert(participant.id().clone()) {
                return Err(DomainError::DuplicateParticipant(
                    participant.id().to_string(),
                ));
            }
        }

        if !seen.contains(&leader) {
            return Err(DomainError::UnknownLeader(leader.to_string()));
        }

        Ok(Self {
            participants,
            leader,
        })
    }

    pub fn leader(&self) -> &ParticipantId {
        &self.leader
    }

    pub fn is_leader(&self, id: &ParticipantId) -> bool {
        &self.leader == id
    }

    pub fn get(&self, id: &ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id() == id)
    }

    /// Look up a participant by its textual name.
    pub fn find(&self, name: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id().as_str() == name)
    }

    pub fn contains(&self, id: &ParticipantId) -> bool {
        self.get(id).is_some()
    }

    /// All identities in declaration order.
    pub fn ids(&self) -> impl Iterator<Item = &ParticipantId> {
        self.participants.iter().map(|p| p.id())
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// `name: description` lines, one per participant.
    pub fn describe_roles(&self) -> String {
        self.participants
            .iter()
            .map(|p| format!("{}: {}", p.id(), p.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(name: &str) -> ParticipantId {
        ParticipantId::try_new(name).unwrap()
    }

    fn member(name: &str) -> Participant {
        Participant::new(id(name), format!("{} role", name))
    }

    #[test]
    fn test_roster_keeps_declaration_order() {
        let roster = Roster::new(
            vec![member("Planner"), member("A"), member("B")],
            id("Planner"),
        )
        .unwrap();

        let names: Vec<&str> = roster.ids().map(|i| i.as_str()).collect();
        assert_eq!(names, vec!["Planner", "A", "B"]);
        assert_eq!(roster.len(), 3);
        assert!(roster.is_leader(&id("Planner")));
        assert!(!roster.is_leader(&id("A")));
    }

    #[test]
    fn test_roster_rejects_empty() {
        assert_eq!(
            Roster::new(vec![], id("Planner")).unwrap_err(),
            DomainError::EmptyRoster
        );
    }

    #[test]
    fn test_roster_rejects_duplicates() {
        let err = Roster::new(vec![member("A"), member("A")], id("A")).unwrap_err();
        assert_eq!(err, DomainError::DuplicateParticipant("A".to_string()));
    }

    #[test]
    fn test_roster_rejects_unknown_leader() {
        let err = Roster::new(vec![member("A")], id("Planner")).unwrap_err();
        assert_eq!(err, DomainError::UnknownLeader("Planner".to_string()));
    }

    #[test]
    fn test_describe_roles() {
        let roster = Roster::new(vec![member("Planner"), member("A")], id("Planner")).unwrap();
        assert_eq!(roster.describe_roles(), "Planner: Planner role\nA: A role");
        assert!(roster.find("A").is_some());
        assert!(roster.find("C").is_none());
    }
}
