//! Tool domain value objects — immutable result and error types
//!
//! A failed tool is never an engine error: the [`ToolResult`] travels back
//! into the participant's turn and the failure ends up as a reported issue
//! inside the emitted message, where the leader can react to it.

use serde::{Deserialize, Serialize};

/// Key under which tools report domain problems inside an otherwise
/// successful output mapping.
pub const ISSUE_REPORTED_KEY: &str = "Issue Reported";

/// Error that occurred during tool execution.
///
/// | Code | Description |
/// |------|-------------|
/// | `INVALID_ARGUMENT` | Missing/unknown parameters |
/// | `NOT_FOUND` | Tool not declared for the participant or not implemented |
/// | `EXECUTION_FAILED` | The tool itself failed |
/// | `TIMEOUT` | The tool did not answer in time |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolError {
    /// Error code (e.g., "NOT_FOUND", "EXECUTION_FAILED")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ToolError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Common error constructors
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            "NOT_FOUND",
            format!("Resource not found: {}", resource.into()),
        )
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new("INVALID_ARGUMENT", message)
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new("EXECUTION_FAILED", message)
    }

    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::new(
            "TIMEOUT",
            format!("Operation timed out: {}", operation.into()),
        )
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for ToolError {}

/// Result of a tool execution: a structured mapping on success, a
/// [`ToolError`] otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Name of the tool that was executed
    pub tool_name: String,
    /// Whether the execution was successful
    pub success: bool,
    /// Structured output (for successful execution)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<serde_json::Value>,
    /// Error information (for failed execution)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolError>,
    /// Duration of execution in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(tool_name: impl Into<String>, output: serde_json::Value) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: true,
            output: Some(output),
            error: None,
            duration_ms: None,
        }
    }

    /// Create a failed result
    pub fn failure(tool_name: impl Into<String>, error: ToolError) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: false,
            output: None,
            error: Some(error),
            duration_ms: None,
        }
    }

    /// Add duration metadata
    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Check if execution was successful
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get the structured output
    pub fn output(&self) -> Option<&serde_json::Value> {
        self.output.as_ref()
    }

    /// Get the error
    pub fn error(&self) -> Option<&ToolError> {
        self.error.as_ref()
    }

    /// The issue this result reports, if any.
    ///
    /// A failed execution reports its error message. A successful one
    /// reports the non-null `"Issue Reported"` field of its output mapping.
    pub fn reported_issue(&self) -> Option<String> {
        if let Some(error) = &self.error {
            return Some(error.to_string());
        }
        match self.output.as_ref()?.get(ISSUE_REPORTED_KEY)? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) if s.trim().is_empty() => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Text form handed back to the participant (and used as the turn's
    /// content when the participant does not reflect).
    pub fn summary(&self) -> String {
        match (&self.output, &self.error) {
            (_, Some(error)) => format!(
                "{} failed\n{}: {}",
                self.tool_name, ISSUE_REPORTED_KEY, error
            ),
            (Some(output), None) => format!(
                "{} returned:\n{}",
                self.tool_name,
                serde_json::to_string_pretty(output).unwrap_or_else(|_| output.to_string())
            ),
            (None, None) => format!("{} returned no output", self.tool_name),
        }
    }
}
