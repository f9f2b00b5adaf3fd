//! Care-team tool executor, the concrete implementation of [`ToolExecutorPort`].
//!
//! [`CareToolExecutor`] bridges the application layer's abstract port with
//! the robots' onboard systems in [`care`](super::care). Calls are validated
//! against the registered [`ToolDefinition`]s before they are dispatched.

use async_trait::async_trait;
use crew_application::ports::tool_executor::ToolExecutorPort;
use crew_domain::tool::{
    entities::{ToolCall, ToolSpec},
    traits::{DefaultToolValidator, ToolValidator},
    value_objects::{ToolError, ToolResult},
};
use tracing::debug;

use super::care;

/// Executor that runs the care-team robot tools in-process.
///
/// # Configurations
///
/// | Constructor | Tools | Use Case |
/// |-------------|-------|----------|
/// | [`new()`](Self::new) | All three robot tools | Care-team preset |
/// | [`with_tools()`](Self::with_tools) | Custom [`ToolSpec`] | Testing / reduced setups |
#[derive(Debug, Clone)]
pub struct CareToolExecutor {
    /// Available tools
    tool_spec: ToolSpec,
}

impl CareToolExecutor {
    /// Create a new executor with every care-team tool.
    pub fn new() -> Self {
        Self {
            tool_spec: super::care_tool_spec(),
        }
    }

    /// Create an executor with a custom tool spec
    pub fn with_tools(tool_spec: ToolSpec) -> Self {
        Self { tool_spec }
    }

    fn execute_internal(&self, call: &ToolCall) -> ToolResult {
        let definition = match self.tool_spec.get(&call.tool_name) {
            Some(d) => d,
            None => {
                return ToolResult::failure(
                    &call.tool_name,
                    ToolError::not_found(format!("Unknown tool: {}", call.tool_name)),
                );
            }
        };

        if let Err(e) = DefaultToolValidator.validate(call, definition) {
            return ToolResult::failure(&call.tool_name, ToolError::invalid_argument(e));
        }

        debug!(tool = %call.tool_name, "Running care tool");
        match call.tool_name.as_str() {
            care::NAVIGATION_TOOL => care::execute_navigation_tool(call),
            care::COLLECTION_TOOL => care::execute_collection_tool(call),
            care::DISPLAY_TOOL => care::execute_display_tool(call),
            _ => ToolResult::failure(
                &call.tool_name,
                ToolError::execution_failed(format!(
                    "Tool '{}' is not implemented",
                    call.tool_name
                )),
            ),
        }
    }
}

impl Default for CareToolExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolExecutorPort for CareToolExecutor {
    fn tool_spec(&self) -> &ToolSpec {
        &self.tool_spec
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        self.execute_internal(call)
    }
}
