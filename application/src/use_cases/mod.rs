//! Use cases (application services)

pub mod invoke_capability;
pub mod participant_turn;
pub mod run_conversation;
pub mod run_tasks;
pub mod select_speaker;
pub(crate) mod shared;
pub(crate) mod tool_helpers;
