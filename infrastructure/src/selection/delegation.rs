//! Delegation strategy: follow the leader's assignment lines.
//!
//! The leader assigns work with numbered lines of the form
//! `1. <agent> : <task>`. After the leader speaks, the first assigned
//! candidate that has not yet spoken in the current task goes next.

use async_trait::async_trait;
use crew_application::ports::selection_strategy::{SelectionError, SelectionStrategy};
use crew_domain::{History, ParticipantId, Roster};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static ASSIGNMENT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*\d+[.)]\s*\**([A-Za-z0-9_\-]+)\**\s*:\s*(.+?)\s*$")
        .expect("assignment pattern is valid")
});

/// One `N. agent : task` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub agent: String,
    pub task: String,
}

/// Extract every assignment line from a message, in order.
pub fn parse_assignments(text: &str) -> Vec<Assignment> {
    ASSIGNMENT_LINE
        .captures_iter(text)
        .map(|caps| Assignment {
            agent: caps[1].to_string(),
            task: caps[2].to_string(),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DelegationStrategy;

impl DelegationStrategy {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SelectionStrategy for DelegationStrategy {
    async fn select(
        &self,
        roster: &Roster,
        candidates: &[ParticipantId],
        history: &History,
    ) -> Result<Option<ParticipantId>, SelectionError> {
        let Some(last) = history.last() else {
            return Ok(None);
        };

        let assigned: Vec<&ParticipantId> = parse_assignments(last.content())
            .iter()
            .filter_map(|a| roster.find(&a.agent).map(|p| p.id()))
            .filter(|id| candidates.contains(id))
            .collect();

        let already_spoke = |id: &ParticipantId| {
            history
                .current_task()
                .iter()
                .any(|m| m.source().is(id))
        };

        let choice = assigned
            .iter()
            .find(|id| !already_spoke(id))
            .or_else(|| assigned.first())
            .map(|id| (*id).clone());

        debug!(
            assigned = assigned.len(),
            choice = choice.as_ref().map(|c| c.as_str()).unwrap_or("-"),
            "Delegation strategy"
        );
        Ok(choice)
    }

    fn name(&self) -> &'static str {
        "delegation"
    }
}
