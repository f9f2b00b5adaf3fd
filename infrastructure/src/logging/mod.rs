//! Logging infrastructure: transcripts and run telemetry.
//!
//! - [`JsonlConversationLogger`]: JSONL transcript writer implementing the
//!   [`ConversationLogger`](crew_application::ConversationLogger) port.
//! - [`TracingRunHooks`]: run-boundary events through `tracing`.

mod jsonl_logger;
mod run_hooks;

pub use jsonl_logger::JsonlConversationLogger;
pub use run_hooks::TracingRunHooks;
