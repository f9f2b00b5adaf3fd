//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw logging configuration from TOML
///
/// # Example
///
/// ```toml
/// [logging]
/// transcript = "runs/transcript.jsonl"  # JSONL conversation transcript
/// file = "crew-relay.log"               # diagnostics log file
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Where to write the JSONL conversation transcript
    pub transcript: Option<PathBuf>,
    /// Where to write diagnostics instead of stderr
    pub file: Option<PathBuf>,
}
