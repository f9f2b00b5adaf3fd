//! Append-only conversation history
//!
//! The history is the only persistent state of a run. It is shared by every
//! task submitted to one engine, so later tasks can refer to the outcome of
//! earlier ones. Messages are never reordered, edited or removed.

use super::message::{Message, MessageDraft};
use serde::Serialize;

/// Ordered, append-only sequence of [`Message`]s with task boundaries
#[derive(Debug, Clone, Default, Serialize)]
pub struct History {
    messages: Vec<Message>,
    /// Index of the first message of each task, in submission order
    task_starts: Vec<usize>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message and return it with its assigned sequence number.
    pub fn append(&mut self, draft: MessageDraft) -> &Message {
        let sequence = self.messages.len();
        self.messages.push(Message::from_draft(sequence, draft));
        &self.messages[sequence]
    }

    /// Append the prompt that opens a new task and record the boundary.
    pub fn begin_task(&mut self, prompt: impl Into<String>) -> &Message {
        self.task_starts.push(self.messages.len());
        self.append(MessageDraft::user(prompt))
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn get(&self, sequence: usize) -> Option<&Message> {
        self.messages.get(sequence)
    }

    /// Number of tasks started on this history
    pub fn task_count(&self) -> usize {
        self.task_starts.len()
    }

    /// Messages since the latest task boundary (the whole history when no
    /// task has been started).
    pub fn current_task(&self) -> &[Message] {
        let start = self.task_starts.last().copied().unwrap_or(0);
        &self.messages[start..]
    }

    /// The last `size` messages, or everything when `size` is `None`.
    pub fn window(&self, size: Option<usize>) -> &[Message] {
        match size {
            Some(size) if size < self.messages.len() => {
                &self.messages[self.messages.len() - size..]
            }
            _ => &self.messages,
        }
    }

    /// Whether this history is a (non-strict) prefix of `other`.
    pub fn is_prefix_of(&self, other: &History) -> bool {
        self.messages.len() <= other.messages.len()
            && self
                .messages
                .iter()
                .zip(other.messages.iter())
                .all(|(a, b)| a == b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::message::Source;
    use crate::participant::entities::ParticipantId;

    fn leader() -> ParticipantId {
        ParticipantId::try_new("Planner").unwrap()
    }

    #[test]
    fn test_append_assigns_sequence() {
        let mut history = History::new();
        assert!(history.is_empty());
        assert!(history.last().is_none());

        history.begin_task("task one");
        let seq = history
            .append(MessageDraft::from_participant(leader(), "1. A : go"))
            .sequence();

        assert_eq!(seq, 1);
        assert_eq!(history.len(), 2);
        assert_eq!(history.last().unwrap().source(), &Source::Participant(leader()));
        assert_eq!(history.get(0).unwrap().content(), "task one");
    }

    #[test]
    fn test_current_task_slices_from_latest_boundary() {
        let mut history = History::new();
        assert!(history.current_task().is_empty());

        history.begin_task("first");
        history.append(MessageDraft::from_participant(leader(), "done TERMINATE"));
        history.begin_task("second");
        history.append(MessageDraft::from_participant(leader(), "working"));

        assert_eq!(history.task_count(), 2);
        let current = history.current_task();
        assert_eq!(current.len(), 2);
        assert_eq!(current[0].content(), "second");
        assert_eq!(current[0].sequence(), 2);
    }

    #[test]
    fn test_window() {
        let mut history = History::new();
        for i in 0..5 {
            history.append(MessageDraft::user(format!("m{}", i)));
        }
        assert_eq!(history.window(None).len(), 5);
        assert_eq!(history.window(Some(10)).len(), 5);
        let tail = history.window(Some(2));
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].content(), "m3");
    }

    #[test]
    fn test_is_prefix_of() {
        let mut before = History::new();
        before.begin_task("task");
        let mut after = before.clone();
        after.append(MessageDraft::from_participant(leader(), "plan"));

        assert!(before.is_prefix_of(&after));
        assert!(!after.is_prefix_of(&before));

        let mut diverged = History::new();
        diverged.begin_task("other task");
        assert!(!diverged.is_prefix_of(&after));
    }
}
