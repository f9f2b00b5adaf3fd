//! Tool Executor port
//!
//! Defines the interface for running the capabilities participants invoke.

use async_trait::async_trait;
use crew_domain::tool::{
    entities::{ToolCall, ToolDefinition, ToolSpec},
    value_objects::ToolResult,
};

/// Port for tool execution
///
/// This port defines how the application layer executes tools.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Get the specification of all tools this executor implements
    fn tool_spec(&self) -> &ToolSpec;

    /// Check if a tool is implemented
    fn has_tool(&self, name: &str) -> bool {
        self.tool_spec().get(name).is_some()
    }

    /// Get the definition of a specific tool
    fn get_tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.tool_spec().get(name)
    }

    /// Get names of all implemented tools
    fn available_tools(&self) -> Vec<&str> {
        self.tool_spec().names().collect()
    }

    /// Execute a tool call
    ///
    /// Failures are returned as a failed [`ToolResult`], never as an error.
    async fn execute(&self, call: &ToolCall) -> ToolResult;
}
