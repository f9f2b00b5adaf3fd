//! Round-robin strategy: hand the floor to the next non-leader in roster order.

use async_trait::async_trait;
use crew_application::ports::selection_strategy::{SelectionError, SelectionStrategy};
use crew_domain::{History, ParticipantId, Roster};

#[derive(Debug, Clone, Copy, Default)]
pub struct RoundRobinStrategy;

impl RoundRobinStrategy {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SelectionStrategy for RoundRobinStrategy {
    async fn select(
        &self,
        roster: &Roster,
        candidates: &[ParticipantId],
        history: &History,
    ) -> Result<Option<ParticipantId>, SelectionError> {
        let members: Vec<&ParticipantId> = roster
            .ids()
            .filter(|id| !roster.is_leader(id) && candidates.contains(id))
            .collect();
        if members.is_empty() {
            return Ok(None);
        }

        let previous = history
            .messages()
            .iter()
            .rev()
            .filter_map(|m| m.source().participant())
            .find(|id| !roster.is_leader(id));

        let next = previous
            .and_then(|prev| members.iter().position(|id| *id == prev))
            .map_or(0, |pos| (pos + 1) % members.len());

        Ok(Some(members[next].clone()))
    }

    fn name(&self) -> &'static str {
        "round_robin"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crew_domain::{MessageDraft, Participant};

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

    #[tokio::test]
    async fn test_cycles_through_members() {
        let roster = roster();
        let candidates: Vec<ParticipantId> = roster.ids().cloned().collect();
        let mut history = History::new();
        history.begin_task("go");
        history.append(MessageDraft::from_participant(id("Planner"), "plan"));

        let first = RoundRobinStrategy.select(&roster, &candidates, &history).await.unwrap();
        assert_eq!(first, Some(id("A")));

        history.append(MessageDraft::from_participant(id("A"), "done"));
        history.append(MessageDraft::from_participant(id("Planner"), "next"));
        let second = RoundRobinStrategy.select(&roster, &candidates, &history).await.unwrap();
        assert_eq!(second, Some(id("B")));

        history.append(MessageDraft::from_participant(id("B"), "done"));
        history.append(MessageDraft::from_participant(id("Planner"), "again"));
        let third = RoundRobinStrategy.select(&roster, &candidates, &history).await.unwrap();
        assert_eq!(third, Some(id("A")));
    }

    #[tokio::test]
    async fn test_only_leader_left() {
        let roster = roster();
        let history = History::new();
        let choice = RoundRobinStrategy
            .select(&roster, &[id("Planner")], &history)
            .await
            .unwrap();
        assert_eq!(choice, None);
    }
}
