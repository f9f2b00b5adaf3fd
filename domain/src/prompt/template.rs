//! Prompt templates for speaker selection

use crate::conversation::message::Message;
use crate::participant::entities::ParticipantId;
use crate::participant::roster::Roster;

/// Default instruction sent to the model when it must pick the next speaker
pub const DEFAULT_SELECTOR_TEMPLATE: &str = r#"Select an agent to perform task.

{roles}

Current conversation context:
{history}

Read the above conversation, then select an agent from {participants} to perform the next task.
Make sure the planner agent has assigned tasks before other agents start working.
Only select one agent."#;

/// Template with `{roles}`, `{history}` and `{participants}` placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorPrompt {
    template: String,
}

impl Default for SelectorPrompt {
    fn default() -> Self {
        Self {
            template: DEFAULT_SELECTOR_TEMPLATE.to_string(),
        }
    }
}

impl SelectorPrompt {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Fill in the placeholders.
    ///
    /// `messages` is the slice of history the selector is allowed to see;
    /// `candidates` is the list it must choose from.
    pub fn render(
        &self,
        roster: &Roster,
        messages: &[Message],
        candidates: &[ParticipantId],
    ) -> String {
        let participants = format!(
            "[{}]",
            candidates
                .iter()
                .map(|id| format!("'{}'", id))
                .collect::<Vec<_>>()
                .join(", ")
        );

        self.template
            .replace("{roles}", &roster.describe_roles())
            .replace("{history}", &Self::format_history(messages))
            .replace("{participants}", &participants)
    }

    /// One `source: content` block per message, separated by blank lines.
    pub fn format_history(messages: &[Message]) -> String {
        messages
            .iter()
            .map(|m| format!("{}: {}", m.source(), m.content()))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::history::History;
    use crate::conversation::message::MessageDraft;
    use crate::participant::entities::Participant;

    fn id(name: &str) -> ParticipantId {
        ParticipantId::try_new(name).unwrap()
    }

    fn roster() -> Roster {
        Roster::new(
            vec![
                Participant::new(id("Planner"), "Plans the work"),
                Participant::new(id("Courier"), "Moves things"),
            ],
            id("Planner"),
        )
        .unwrap()
    }

    #[test]
    fn test_render_fills_every_placeholder() {
        let mut history = History::new();
        history.begin_task("Deliver the parcel");
        history.append(MessageDraft::from_participant(id("Planner"), "1. Courier : deliver"));

        let prompt = SelectorPrompt::default().render(
            &roster(),
            history.messages(),
            &[id("Planner"), id("Courier")],
        );

        assert!(prompt.contains("Planner: Plans the work\nCourier: Moves things"));
        assert!(prompt.contains("user: Deliver the parcel\n\nPlanner: 1. Courier : deliver"));
        assert!(prompt.contains("select an agent from ['Planner', 'Courier']"));
        assert!(!prompt.contains('{'));
    }

    #[test]
    fn test_custom_template() {
        let prompt = SelectorPrompt::new("Pick one of {participants}").render(
            &roster(),
            &[],
            &[id("Courier")],
        );
        assert_eq!(prompt, "Pick one of ['Courier']");
    }

    #[test]
    fn test_format_history_empty() {
        assert_eq!(SelectorPrompt::format_history(&[]), "");
    }
}
