//! Tool domain module
//!
//! Tools are the capabilities a participant may invoke during its turn.
//! Every tool is described by a [`ToolDefinition`], grouped per participant
//! in a [`ToolSpec`], invoked through a [`ToolCall`] and answered by a
//! [`ToolResult`].
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ ToolSpec     │───▶│ ToolCall     │───▶│ ToolResult   │
//! │ (per member) │    │ (invocation) │    │ (mapping or  │
//! └──────────────┘    └──────────────┘    │  ToolError)  │
//!                                         └──────────────┘
//! ```
//!
//! Failures stay data: a failed [`ToolResult`] is folded into the
//! participant's message as a reported issue instead of aborting the run.

pub mod entities;
pub mod traits;
pub mod value_objects;

pub use entities::{ToolCall, ToolDefinition, ToolParameter, ToolSpec};
pub use traits::{DefaultToolValidator, ToolValidator};
pub use value_objects::{ISSUE_REPORTED_KEY, ToolError, ToolResult};
