//! Domain layer for crew-relay
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Roster
//!
//! A fixed set of named participants, one of which is the leader. The
//! leader plans, assigns work and decides when the team is done.
//!
//! ## History
//!
//! The append-only sequence of messages shared by every participant. It
//! survives across tasks so later tasks can build on earlier results.
//!
//! ## Turn rules
//!
//! - **Leader override**: the leader speaks first on a new task and right
//!   after any other participant.
//! - **Termination**: stop predicates (status, keywords, message count)
//!   composed with logical OR and evaluated after every appended message.

pub mod config;
pub mod conversation;
pub mod core;
pub mod participant;
pub mod prompt;
pub mod selection;
pub mod session;
pub mod task;
pub mod termination;
pub mod tool;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use conversation::{EnginePhase, History, Message, MessageDraft, MessageStatus, Source};
pub use core::error::DomainError;
pub use participant::{Participant, ParticipantId, Roster, USER_SOURCE};
pub use prompt::{DEFAULT_SELECTOR_TEMPLATE, SelectorPrompt};
pub use selection::{LeaderOverride, Selection, SelectionMethod, SpeakerDecision};
pub use session::{ContextMessage, Generation, GenerationContext, Requester, Role};
pub use task::Task;
pub use termination::{
    CountScope, MaxMessages, StatusSignal, TerminationAmbiguity, TerminationCondition,
    TerminationEvaluator, TerminationReason, TextMention,
};
pub use tool::{
    DefaultToolValidator, ISSUE_REPORTED_KEY, ToolCall, ToolDefinition, ToolError, ToolParameter,
    ToolResult, ToolSpec, ToolValidator,
};
