//! Presentation layer for crew-relay
//!
//! This crate contains CLI definitions, the live console transcript,
//! end-of-run formatters and progress reporters.

pub mod cli;
pub mod config;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat, StrategyArg};
pub use config::OutputConfig;
pub use output::console::ConsoleObserver;
pub use output::formatter::{ReportFormatter, formatter_for};
pub use output::summary::{JsonSummary, TextSummary};
pub use progress::reporter::{ProgressReporter, SimpleProgress};
