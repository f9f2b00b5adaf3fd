//! Port for structured conversation logging.
//!
//! Defines the [`ConversationLogger`] trait for recording transcript events
//! (task prompts, speaker choices, tool results, messages, termination) to a
//! structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the full
//! conversation transcript in a machine-readable format (JSONL).

use serde_json::{Value, json};

/// A structured conversation event for logging.
///
/// Each event has a type string and a JSON payload containing
/// event-specific fields. The adapter adds the timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationEvent {
    /// Event type identifier (e.g., "message", "tool_result", "termination").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }

    pub fn task_started(index: usize, name: &str, prompt: &str) -> Self {
        Self::new(
            "task_started",
            json!({ "index": index, "task": name, "prompt": prompt }),
        )
    }

    pub fn speaker_selected(speaker: &str, method: &str) -> Self {
        Self::new(
            "speaker_selected",
            json!({ "speaker": speaker, "method": method }),
        )
    }

    pub fn tool_result(participant: &str, result: &crew_domain::ToolResult) -> Self {
        Self::new(
            "tool_result",
            json!({ "participant": participant, "result": result }),
        )
    }

    pub fn message(message: &crew_domain::Message) -> Self {
        Self::new("message", json!(message))
    }

    pub fn termination(reason: &crew_domain::TerminationReason) -> Self {
        Self::new(
            "termination",
            json!({ "reason": reason, "text": reason.to_string() }),
        )
    }
}

/// Port for logging conversation events to a structured log.
///
/// Implementations write each event as a single record (e.g., one JSONL line).
/// The `log` method is synchronous and non-fallible; logging failures are
/// ignored so they never disrupt a run.
pub trait ConversationLogger: Send + Sync {
    /// Record a conversation event.
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
