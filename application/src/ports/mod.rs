//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod conversation_logger;
pub mod decision_backend;
pub mod observer;
pub mod run_hooks;
pub mod selection_strategy;
pub mod tool_executor;
