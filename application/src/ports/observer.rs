//! Conversation observer port
//!
//! Receives engine events in the order they happen. Callbacks are
//! synchronous and must not block: the engine waits for each one before
//! moving on to the next phase.
//!
//! ```text
//! ConversationEngine.run_task(task, &observer)
//!                                      |
//!              +-----------------------+------------------------+
//!              |                                                |
//!     ConsoleObserver (presentation)              ChannelObserver
//!     → colored live transcript                   → UnboundedReceiver<ObserverEvent>
//! ```

use crew_domain::{Message, ParticipantId, Selection, Task, TerminationReason, ToolResult};
use tokio::sync::mpsc;

/// Callbacks fired while the engine runs
pub trait ConversationObserver: Send + Sync {
    /// A message was appended to the history (including task prompts)
    fn on_message(&self, message: &Message);

    /// A task is about to be submitted
    fn on_task_start(&self, _index: usize, _total: usize, _task: &Task) {}

    /// The next speaker has been chosen
    fn on_speaker_selected(&self, _selection: &Selection) {}

    /// A participant's capability invocation returned
    fn on_tool_result(&self, _participant: &ParticipantId, _result: &ToolResult) {}

    /// The current task has stopped
    fn on_termination(&self, _reason: &TerminationReason) {}
}

/// No-op observer for when live output is not needed
pub struct NoObserver;

impl ConversationObserver for NoObserver {
    fn on_message(&self, _message: &Message) {}
}

// ==================== Channel Observer ====================

/// Engine events as owned values, for consumers on another task
#[derive(Debug, Clone, PartialEq)]
pub enum ObserverEvent {
    TaskStarted { index: usize, total: usize, name: String },
    SpeakerSelected(Selection),
    ToolResult {
        participant: ParticipantId,
        result: ToolResult,
    },
    Message(Message),
    Terminated(TerminationReason),
}

/// Forwards every event into an unbounded channel
///
/// Sends never block. Events are dropped silently once the receiver is gone.
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<ObserverEvent>,
}

impl ChannelObserver {
    pub fn new(tx: mpsc::UnboundedSender<ObserverEvent>) -> Self {
        Self { tx }
    }

    /// Create an observer together with the receiving end
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ObserverEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    fn send(&self, event: ObserverEvent) {
        let _ = self.tx.send(event);
    }
}

impl ConversationObserver for ChannelObserver {
    fn on_message(&self, message: &Message) {
        self.send(ObserverEvent::Message(message.clone()));
    }

    fn on_task_start(&self, index: usize, total: usize, task: &Task) {
        self.send(ObserverEvent::TaskStarted {
            index,
            total,
            name: task.name().to_string(),
        });
    }

    fn on_speaker_selected(&self, selection: &Selection) {
        self.send(ObserverEvent::SpeakerSelected(selection.clone()));
    }

    fn on_tool_result(&self, participant: &ParticipantId, result: &ToolResult) {
        self.send(ObserverEvent::ToolResult {
            participant: participant.clone(),
            result: result.clone(),
        });
    }

    fn on_termination(&self, reason: &TerminationReason) {
        self.send(ObserverEvent::Terminated(reason.clone()));
    }
}

// ==================== Composite Observer ====================

/// An observer that delegates to multiple inner observers.
///
/// Uses borrowed references so both owned and borrowed observers can be
/// composed without wrapper types.
pub struct CompositeObserver<'a> {
    delegates: Vec<&'a dyn ConversationObserver>,
}

impl<'a> CompositeObserver<'a> {
    pub fn new(delegates: Vec<&'a dyn ConversationObserver>) -> Self {
        Self { delegates }
    }
}

/// Macro to delegate a method call to all inner observers.
macro_rules! delegate {
    ($self:ident, $method:ident $(, $arg:expr)*) => {
        for d in &$self.delegates {
            d.$method($($arg),*);
        }
    };
}

impl ConversationObserver for CompositeObserver<'_> {
    fn on_message(&self, message: &Message) {
        delegate!(self, on_message, message);
    }

    fn on_task_start(&self, index: usize, total: usize, task: &Task) {
        delegate!(self, on_task_start, index, total, task);
    }

    fn on_speaker_selected(&self, selection: &Selection) {
        delegate!(self, on_speaker_selected, selection);
    }

    fn on_tool_result(&self, participant: &ParticipantId, result: &ToolResult) {
        delegate!(self, on_tool_result, participant, result);
    }

    fn on_termination(&self, reason: &TerminationReason) {
        delegate!(self, on_termination, reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crew_domain::{History, MessageDraft, SelectionMethod};

    fn id(name: &str) -> ParticipantId {
        ParticipantId::try_new(name).unwrap()
    }

    #[test]
    fn test_channel_observer_forwards_in_order() {
        let (observer, mut rx) = ChannelObserver::channel();
        let mut history = History::new();
        let prompt = history.begin_task("go").clone();

        observer.on_message(&prompt);
        observer.on_speaker_selected(&Selection::new(id("Planner"), SelectionMethod::Override));

        assert_eq!(rx.try_recv().unwrap(), ObserverEvent::Message(prompt));
        assert!(matches!(
            rx.try_recv().unwrap(),
            ObserverEvent::SpeakerSelected(Selection {
                method: SelectionMethod::Override,
                ..
            })
        ));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_channel_observer_survives_dropped_receiver() {
        let (observer, rx) = ChannelObserver::channel();
        drop(rx);
        let mut history = History::new();
        let message = history.append(MessageDraft::from_participant(id("A"), "hi")).clone();
        observer.on_message(&message);
    }

    #[test]
    fn test_composite_fans_out() {
        let (first, mut rx1) = ChannelObserver::channel();
        let (second, mut rx2) = ChannelObserver::channel();
        let composite = CompositeObserver::new(vec![&first, &second, &NoObserver]);

        let mut history = History::new();
        let message = history.begin_task("task").clone();
        composite.on_message(&message);

        assert_eq!(rx1.try_recv().unwrap(), ObserverEvent::Message(message.clone()));
        assert_eq!(rx2.try_recv().unwrap(), ObserverEvent::Message(message));
    }
}
