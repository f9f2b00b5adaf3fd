//! Tool domain traits
//!
//! Pure validation of a [`ToolCall`] against the [`ToolDefinition`] a
//! participant declared. Execution itself is an application-layer port.

use super::entities::{ToolCall, ToolDefinition};

/// Validator for tool calls
pub trait ToolValidator {
    /// Validate a tool call against its definition
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), String>;
}

/// Default implementation of ToolValidator
///
/// Checks required parameters, rejects unknown ones and verifies the JSON
/// type of each argument against its `param_type` hint.
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl DefaultToolValidator {
    fn type_matches(param_type: &str, value: &serde_json::Value) -> bool {
        match param_type {
            "number" => value.is_number(),
            "integer" => value.is_i64() || value.is_u64(),
            "boolean" => value.is_boolean(),
            "object" => value.is_object(),
            "array" => value.is_array(),
            _ => value.is_string(),
        }
    }
}

impl ToolValidator for DefaultToolValidator {
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), String> {
        for param in &definition.parameters {
            match call.arguments.get(&param.name) {
                None if param.required => {
                    return Err(format!(
                        "Missing required parameter '{}' for tool '{}'",
                        param.name, definition.name
                    ));
                }
                Some(value) if !Self::type_matches(&param.param_type, value) => {
                    return Err(format!(
                        "Parameter '{}' for tool '{}' must be of type {}",
                        param.name, definition.name, param.param_type
                    ));
                }
                _ => {}
            }
        }

        for arg_name in call.arguments.keys() {
            if !definition.parameters.iter().any(|p| &p.name == arg_name) {
                return Err(format!(
                    "Unknown parameter '{}' for tool '{}'",
                    arg_name, definition.name
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::ToolParameter;

    fn navigation() -> ToolDefinition {
        ToolDefinition::new("navigation_tool", "Plan a path")
            .with_parameter(ToolParameter::new("ID", "Worker ID", true))
            .with_parameter(ToolParameter::new("room", "Room number", true))
            .with_parameter(ToolParameter::new("urgent", "Urgent route", false).with_type("boolean"))
    }

    #[test]
    fn test_validator_missing_required() {
        let call = ToolCall::new("navigation_tool").with_arg("ID", "#80");
        let result = DefaultToolValidator.validate(&call, &navigation());
        assert!(result.unwrap_err().contains("Missing required parameter 'room'"));
    }

    #[test]
    fn test_validator_unknown_param() {
        let call = ToolCall::new("navigation_tool")
            .with_arg("ID", "#80")
            .with_arg("room", "ER-12")
            .with_arg("floor", "2");
        let result = DefaultToolValidator.validate(&call, &navigation());
        assert!(result.unwrap_err().contains("Unknown parameter 'floor'"));
    }

    #[test]
    fn test_validator_wrong_type() {
        let call = ToolCall::new("navigation_tool")
            .with_arg("ID", "#80")
            .with_arg("room", "ER-12")
            .with_arg("urgent", "yes");
        let result = DefaultToolValidator.validate(&call, &navigation());
        assert!(result.unwrap_err().contains("must be of type boolean"));
    }

    #[test]
    fn test_validator_valid_call() {
        let call = ToolCall::new("navigation_tool")
            .with_arg("ID", "#80")
            .with_arg("room", "ER-12")
            .with_arg("urgent", true);
        assert!(DefaultToolValidator.validate(&call, &navigation()).is_ok());
    }
}
