//! Conversation messages

use crate::participant::entities::{ParticipantId, USER_SOURCE};
use serde::{Deserialize, Serialize};

/// Who authored a message
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// A task prompt submitted by the caller
    User,
    /// A roster member
    Participant(ParticipantId),
}

impl Source {
    pub fn as_str(&self) -> &str {
        match self {
            Source::User => USER_SOURCE,
            Source::Participant(id) => id.as_str(),
        }
    }

    pub fn participant(&self) -> Option<&ParticipantId> {
        match self {
            Source::User => None,
            Source::Participant(id) => Some(id),
        }
    }

    pub fn is(&self, id: &ParticipantId) -> bool {
        self.participant() == Some(id)
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<ParticipantId> for Source {
    fn from(id: ParticipantId) -> Self {
        Source::Participant(id)
    }
}

/// Structured completion signal carried by a message
///
/// This is the primary stop signal. Keyword scanning of the content is kept
/// as a fallback for backends that only produce text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    #[default]
    Continue,
    Success,
    Escalate,
}

impl MessageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageStatus::Continue => "continue",
            MessageStatus::Success => "success",
            MessageStatus::Escalate => "escalate",
        }
    }

    pub fn is_final(&self) -> bool {
        !matches!(self, MessageStatus::Continue)
    }
}

impl std::fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MessageStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "continue" => Ok(MessageStatus::Continue),
            "success" | "terminate" => Ok(MessageStatus::Success),
            "escalate" => Ok(MessageStatus::Escalate),
            other => Err(format!("unknown message status: {}", other)),
        }
    }
}

/// A message that has not been appended yet.
///
/// Only [`History`](super::history::History) turns a draft into a
/// [`Message`], assigning its sequence number.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageDraft {
    pub source: Source,
    pub content: String,
    pub status: MessageStatus,
    pub issue: Option<String>,
}

impl MessageDraft {
    pub fn new(source: Source, content: impl Into<String>) -> Self {
        Self {
            source,
            content: content.into(),
            status: MessageStatus::Continue,
            issue: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Source::User, content)
    }

    pub fn from_participant(id: ParticipantId, content: impl Into<String>) -> Self {
        Self::new(Source::Participant(id), content)
    }

    pub fn with_status(mut self, status: MessageStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_issue(mut self, issue: impl Into<String>) -> Self {
        self.issue = Some(issue.into());
        self
    }
}

/// A message in the shared conversation history (Entity)
///
/// Immutable once appended; fields are only readable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    sequence: usize,
    source: Source,
    content: String,
    #[serde(default)]
    status: MessageStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    issue: Option<String>,
}

impl Message {
    pub(crate) fn from_draft(sequence: usize, draft: MessageDraft) -> Self {
        Self {
            sequence,
            source: draft.source,
            content: draft.content,
            status: draft.status,
            issue: draft.issue,
        }
    }

    pub fn sequence(&self) -> usize {
        self.sequence
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn status(&self) -> MessageStatus {
        self.status
    }

    /// Issue reported by a capability during the turn that produced this message
    pub fn issue(&self) -> Option<&str> {
        self.issue.as_deref()
    }

    pub fn is_from_user(&self) -> bool {
        matches!(self.source, Source::User)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_display() {
        let id = ParticipantId::try_new("NavigationRobot").unwrap();
        assert_eq!(Source::User.to_string(), "user");
        assert_eq!(Source::from(id.clone()).to_string(), "NavigationRobot");
        assert!(Source::Participant(id.clone()).is(&id));
        assert!(!Source::User.is(&id));
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("SUCCESS".parse::<MessageStatus>(), Ok(MessageStatus::Success));
        assert_eq!("terminate".parse::<MessageStatus>(), Ok(MessageStatus::Success));
        assert_eq!("escalate".parse::<MessageStatus>(), Ok(MessageStatus::Escalate));
        assert!("done".parse::<MessageStatus>().is_err());
        assert!(!MessageStatus::Continue.is_final());
        assert!(MessageStatus::Escalate.is_final());
    }

    #[test]
    fn test_draft_to_message() {
        let draft = MessageDraft::user("Guide HCW #80 to ER-12")
            .with_status(MessageStatus::Continue)
            .with_issue("none");
        let message = Message::from_draft(4, draft);

        assert_eq!(message.sequence(), 4);
        assert!(message.is_from_user());
        assert_eq!(message.content(), "Guide HCW #80 to ER-12");
        assert_eq!(message.issue(), Some("none"));
    }
}
