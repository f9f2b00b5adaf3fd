//! Capability invocation.
//!
//! Runs one tool call on behalf of a participant. Every outcome is a
//! [`ToolResult`]; nothing here can abort the run.
//!
//! ```text
//! ToolCall ──▶ declared by participant? ──▶ arguments valid? ──▶ ToolExecutorPort
//!                  │ no                         │ no
//!                  ▼                            ▼
//!             NOT_FOUND result           INVALID_ARGUMENT result
//! ```

use crate::ports::tool_executor::ToolExecutorPort;
use crate::use_cases::tool_helpers::tool_args_preview;
use crew_domain::{
    DefaultToolValidator, Participant, ToolCall, ToolError, ToolResult, ToolValidator,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Checks and executes capability requests
pub struct CapabilityInvoker {
    executor: Arc<dyn ToolExecutorPort>,
    validator: DefaultToolValidator,
}

impl CapabilityInvoker {
    pub fn new(executor: Arc<dyn ToolExecutorPort>) -> Self {
        Self {
            executor,
            validator: DefaultToolValidator,
        }
    }

    /// Invoke `call` for `participant`.
    pub async fn invoke(&self, participant: &Participant, call: &ToolCall) -> ToolResult {
        let Some(definition) = participant.tools().get(&call.tool_name) else {
            warn!(
                "{} requested undeclared tool {}",
                participant.id(),
                call.tool_name
            );
            return ToolResult::failure(
                &call.tool_name,
                ToolError::not_found(&call.tool_name)
                    .with_details(format!("not declared for {}", participant.id())),
            );
        };

        if let Err(message) = self.validator.validate(call, definition) {
            warn!("{} sent invalid arguments: {}", participant.id(), message);
            return ToolResult::failure(&call.tool_name, ToolError::invalid_argument(message));
        }

        if !self.executor.has_tool(&call.tool_name) {
            return ToolResult::failure(
                &call.tool_name,
                ToolError::not_found(&call.tool_name).with_details("no implementation available"),
            );
        }

        debug!(
            "{} invoking {}({})",
            participant.id(),
            call.tool_name,
            tool_args_preview(call)
        );
        let started = Instant::now();
        let result = self.executor.execute(call).await;
        let result = match result.duration_ms {
            Some(_) => result,
            None => result.with_duration(started.elapsed().as_millis() as u64),
        };

        if let Some(issue) = result.reported_issue() {
            warn!("{} reported an issue: {}", call.tool_name, issue);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crew_domain::{ParticipantId, ToolDefinition, ToolParameter, ToolSpec};
    use serde_json::json;

    struct EchoExecutor {
        spec: ToolSpec,
    }

    impl EchoExecutor {
        fn new() -> Self {
            Self {
                spec: ToolSpec::new().register(lookup_tool()),
            }
        }
    }

    #[async_trait]
    impl ToolExecutorPort for EchoExecutor {
        fn tool_spec(&self) -> &ToolSpec {
            &self.spec
        }

        async fn execute(&self, call: &ToolCall) -> ToolResult {
            ToolResult::success(&call.tool_name, call.arguments_json())
        }
    }

    fn lookup_tool() -> ToolDefinition {
        ToolDefinition::new("lookup", "Look up a record")
            .with_parameter(ToolParameter::new("ID", "Record id", true))
    }

    fn participant(tools: Vec<ToolDefinition>) -> Participant {
        let mut p = Participant::new(ParticipantId::try_new("Clerk").unwrap(), "Looks things up");
        for tool in tools {
            p = p.with_tool(tool);
        }
        p
    }

    fn invoker() -> CapabilityInvoker {
        CapabilityInvoker::new(Arc::new(EchoExecutor::new()))
    }

    #[tokio::test]
    async fn test_successful_invocation() {
        let call = ToolCall::new("lookup").with_arg("ID", "90");
        let result = invoker().invoke(&participant(vec![lookup_tool()]), &call).await;

        assert!(result.is_success());
        assert_eq!(result.output(), Some(&json!({"ID": "90"})));
        assert!(result.duration_ms.is_some());
        assert!(result.reported_issue().is_none());
    }

    #[tokio::test]
    async fn test_undeclared_tool_is_not_found() {
        let call = ToolCall::new("lookup").with_arg("ID", "90");
        let result = invoker().invoke(&participant(vec![]), &call).await;

        assert!(!result.is_success());
        assert_eq!(result.error().unwrap().code, "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_missing_argument_is_invalid() {
        let result = invoker()
            .invoke(&participant(vec![lookup_tool()]), &ToolCall::new("lookup"))
            .await;

        assert_eq!(result.error().unwrap().code, "INVALID_ARGUMENT");
        assert!(result.reported_issue().unwrap().contains("ID"));
    }

    #[tokio::test]
    async fn test_declared_but_unimplemented_tool() {
        let extra = ToolDefinition::new("teleport", "Not implemented anywhere");
        let result = invoker()
            .invoke(&participant(vec![extra]), &ToolCall::new("teleport"))
            .await;

        assert_eq!(result.error().unwrap().code, "NOT_FOUND");
    }
}
