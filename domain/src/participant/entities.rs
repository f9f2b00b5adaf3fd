//! Participant entities

use crate::core::error::DomainError;
use crate::tool::entities::{ToolDefinition, ToolSpec};
use serde::{Deserialize, Serialize};

/// Identity reserved for task prompts submitted by the caller.
pub const USER_SOURCE: &str = "user";

/// Unique name of a participant (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Create an identity, rejecting blank names, whitespace and the reserved `user` source.
    pub fn try_new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() || name.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidIdentity(name));
        }
        if name.eq_ignore_ascii_case(USER_SOURCE) {
            return Err(DomainError::ReservedIdentity(name));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ParticipantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ParticipantId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ParticipantId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A member of the roster (Entity)
///
/// Created once when the roster is assembled and never changed during a run.
#[derive(Debug, Clone)]
pub struct Participant {
    id: ParticipantId,
    description: String,
    system_prompt: String,
    tools: ToolSpec,
    reflect_on_tool_use: bool,
}

impl Participant {
    pub fn new(id: ParticipantId, description: impl Into<String>) -> Self {
        Self {
            id,
            description: description.into(),
            system_prompt: String::new(),
            tools: ToolSpec::new(),
            reflect_on_tool_use: true,
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_tool(mut self, tool: ToolDefinition) -> Self {
        self.tools = self.tools.register(tool);
        self
    }

    pub fn with_tools(mut self, tools: ToolSpec) -> Self {
        self.tools = tools;
        self
    }

    /// Whether a tool result must be turned into a natural-language reply
    /// before the turn ends. When disabled, the turn ends with a summary of
    /// the raw tool output.
    pub fn with_reflect_on_tool_use(mut self, reflect: bool) -> Self {
        self.reflect_on_tool_use = reflect;
        self
    }

    // ==================== Accessors ====================

    pub fn id(&self) -> &ParticipantId {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn tools(&self) -> &ToolSpec {
        &self.tools
    }

    pub fn has_tools(&self) -> bool {
        !self.tools.is_empty()
    }

    pub fn reflects_on_tool_use(&self) -> bool {
        self.reflect_on_tool_use
    }
}
