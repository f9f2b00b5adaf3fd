//! Infrastructure layer for crew-relay
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: decision backends, the care-team tools,
//! deterministic selection strategies, transcript logging and
//! configuration file loading.

pub mod backend;
pub mod config;
pub mod logging;
pub mod presets;
pub mod selection;
pub mod tools;

// Re-export commonly used types
pub use backend::{OpenAiBackend, ScriptedBackend};
pub use config::{
    BackendProvider, ConfigLoader, ConfigValidationError, FileConfig, FileOutputConfig,
    SelectionStrategyKind,
};
pub use logging::{JsonlConversationLogger, TracingRunHooks};
pub use presets::CareTeamPreset;
pub use selection::{DelegationStrategy, RoundRobinStrategy};
pub use tools::{CareToolExecutor, FunctionSchemaConverter, care_tool_spec};
