//! Application layer for crew-relay
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::EngineParams;
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    decision_backend::{BackendError, DecisionBackend},
    observer::{ChannelObserver, CompositeObserver, ConversationObserver, NoObserver, ObserverEvent},
    run_hooks::{NoRunHooks, RunHooks},
    selection_strategy::{SelectionError, SelectionStrategy},
    tool_executor::ToolExecutorPort,
};
pub use use_cases::invoke_capability::CapabilityInvoker;
pub use use_cases::participant_turn::{ParticipantTurn, TurnRecord, TurnStep};
pub use use_cases::run_conversation::{ConversationEngine, EngineError, EngineErrorKind, TaskOutcome};
pub use use_cases::run_tasks::{RunReport, RunTasksError, RunTasksUseCase};
pub use use_cases::select_speaker::{ModelSelectionStrategy, TurnSelector};
