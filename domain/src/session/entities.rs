//! Generation context entities
//!
//! The engine flattens the shared history into a list of
//! [`ContextMessage`]s addressed to one requester before each model call.

use crate::conversation::message::{Message, Source};
use crate::participant::entities::ParticipantId;
use crate::tool::entities::{ToolCall, ToolDefinition};
use serde::{Deserialize, Serialize};

/// Role of a message inside a generation context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// One entry of the context sent to the decision backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextMessage {
    pub role: Role,
    /// Author name, set for messages written by participants
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub content: String,
    /// Tool request made by the assistant in this entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call: Option<ToolCall>,
    /// Id of the tool request this entry answers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ContextMessage {
    fn plain(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            name: None,
            content: content.into(),
            tool_call: None,
            tool_call_id: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::plain(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::plain(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::plain(Role::Assistant, content)
    }

    /// The assistant asking for a tool invocation
    pub fn tool_request(call: ToolCall) -> Self {
        Self {
            tool_call: Some(call),
            ..Self::plain(Role::Assistant, "")
        }
    }

    /// The result of a tool invocation, fed back for reflection
    pub fn tool_result(call_id: Option<String>, content: impl Into<String>) -> Self {
        Self {
            tool_call_id: call_id,
            ..Self::plain(Role::Tool, content)
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// View a history message from the point of view of `viewer`.
    ///
    /// The viewer's own messages become assistant turns; everything else,
    /// including other participants, is presented as user input tagged with
    /// the author's name.
    pub fn from_history(message: &Message, viewer: Option<&ParticipantId>) -> Self {
        match message.source() {
            Source::Participant(author) if Some(author) == viewer => {
                Self::assistant(message.content()).with_name(author.as_str())
            }
            source => Self::user(message.content()).with_name(source.as_str()),
        }
    }
}

/// Who a generation is produced for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum Requester {
    /// A participant taking its turn
    Participant(ParticipantId),
    /// The model-backed speaker selector
    Selector,
}

impl std::fmt::Display for Requester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Requester::Participant(id) => write!(f, "{}", id),
            Requester::Selector => write!(f, "selector"),
        }
    }
}

/// Everything a decision backend needs for one call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationContext {
    pub requester: Requester,
    pub system_prompt: String,
    pub messages: Vec<ContextMessage>,
    /// Tools the requester may call; empty means "answer directly"
    #[serde(default)]
    pub tools: Vec<ToolDefinition>,
}

impl GenerationContext {
    pub fn new(requester: Requester, system_prompt: impl Into<String>) -> Self {
        Self {
            requester,
            system_prompt: system_prompt.into(),
            messages: Vec::new(),
            tools: Vec::new(),
        }
    }

    /// Seed the context with history, as seen by the requester.
    pub fn with_history(mut self, messages: &[Message]) -> Self {
        let viewer = match &self.requester {
            Requester::Participant(id) => Some(id.clone()),
            Requester::Selector => None,
        };
        self.messages.extend(
            messages
                .iter()
                .map(|m| ContextMessage::from_history(m, viewer.as_ref())),
        );
        self
    }

    pub fn with_message(mut self, message: ContextMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    pub fn push(&mut self, message: ContextMessage) {
        self.messages.push(message);
    }

    pub fn offers_tools(&self) -> bool {
        !self.tools.is_empty()
    }

    /// Content of the most recent entry, if any
    pub fn last_content(&self) -> Option<&str> {
        self.messages.last().map(|m| m.content.as_str())
    }
}
