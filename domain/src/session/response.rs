//! Generation results returned by a decision backend.
//!
//! A participant turn sees at most two of these: the first may ask for a
//! tool, the second (after the tool result is fed back) must be text.
//!
//! ```
//! use crew_domain::session::response::Generation;
//! use crew_domain::tool::ToolCall;
//!
//! let text = Generation::text("1. NavigationRobot : guide HCW #80");
//! assert!(text.as_text().is_some());
//!
//! let call = Generation::ToolCall(ToolCall::new("display_tool"));
//! assert!(call.as_tool_call().is_some());
//! ```

use crate::conversation::message::MessageStatus;
use crate::tool::entities::ToolCall;
use serde::{Deserialize, Serialize};

/// One model decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Generation {
    /// Final text, optionally with a structured completion signal
    Text {
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        status: Option<MessageStatus>,
    },
    /// A request to invoke one of the offered tools
    ToolCall(ToolCall),
}

impl Generation {
    /// Text without a structured status
    pub fn text(content: impl Into<String>) -> Self {
        Generation::Text {
            content: content.into(),
            status: None,
        }
    }

    /// Text with a structured status
    pub fn text_with_status(content: impl Into<String>, status: MessageStatus) -> Self {
        Generation::Text {
            content: content.into(),
            status: Some(status),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Generation::Text { content, .. } => Some(content),
            Generation::ToolCall(_) => None,
        }
    }

    pub fn as_tool_call(&self) -> Option<&ToolCall> {
        match self {
            Generation::ToolCall(call) => Some(call),
            Generation::Text { .. } => None,
        }
    }

    pub fn is_tool_call(&self) -> bool {
        matches!(self, Generation::ToolCall(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_accessors() {
        let generation = Generation::text_with_status("All tasks done", MessageStatus::Success);
        assert_eq!(generation.as_text(), Some("All tasks done"));
        assert!(generation.as_tool_call().is_none());
        assert!(!generation.is_tool_call());
    }

    #[test]
    fn test_tool_call_accessors() {
        let generation = Generation::ToolCall(ToolCall::new("collection_tool").with_arg("ID", "90"));
        assert!(generation.is_tool_call());
        assert!(generation.as_text().is_none());
        assert_eq!(
            generation.as_tool_call().and_then(|c| c.get_string("ID")),
            Some("90")
        );
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_value(Generation::text("hi")).unwrap();
        assert_eq!(json, serde_json::json!({"type": "text", "content": "hi"}));
    }
}
