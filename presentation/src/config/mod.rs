//! Presentation-level configuration
//!
//! Resolves how results are shown from CLI flags and the `[output]` file
//! section. CLI flags win.

use crew_domain::OutputFormat;
use serde::{Deserialize, Serialize};

/// Output configuration for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Enable colored terminal output
    pub color: bool,
    /// Show a spinner while waiting on participants
    pub show_progress: bool,
    /// Print how each speaker was chosen
    pub verbose: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            color: true,
            show_progress: true,
            verbose: false,
        }
    }
}

impl OutputConfig {
    pub fn with_format(mut self, format: Option<OutputFormat>) -> Self {
        if let Some(format) = format {
            self.format = format;
        }
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn with_show_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Live transcript goes to stdout only for text output
    pub fn live_transcript(&self) -> bool {
        self.format == OutputFormat::Text
    }

    /// The spinner is drawn only alongside the live transcript
    pub fn spinner(&self) -> bool {
        self.show_progress && self.live_transcript()
    }
}
