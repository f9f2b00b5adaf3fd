//! Tool domain entities

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Definition of a capability a participant may invoke during its turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name of the tool (e.g., "navigation_tool")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// Parameter specifications
    pub parameters: Vec<ToolParameter>,
}

/// Parameter specification for a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name
    pub name: String,
    /// Parameter description
    pub description: String,
    /// Whether this parameter is required
    pub required: bool,
    /// Parameter type hint (e.g., "string", "number", "boolean")
    pub param_type: String,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            param_type: "string".to_string(),
        }
    }

    pub fn with_type(mut self, param_type: impl Into<String>) -> Self {
        self.param_type = param_type.into();
        self
    }
}

/// The capability set of one participant
#[derive(Debug, Clone, Default)]
pub struct ToolSpec {
    tools: HashMap<String, ToolDefinition>,
}

impl ToolSpec {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    pub fn register(mut self, tool: ToolDefinition) -> Self {
        self.tools.insert(tool.name.clone(), tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    pub fn all(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.values()
    }

    /// Definitions sorted by name, for stable prompts and API payloads.
    pub fn sorted(&self) -> Vec<&ToolDefinition> {
        let mut tools: Vec<&ToolDefinition> = self.tools.values().collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// A call to a tool with arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Backend-assigned call id, echoed back with the result when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Name of the tool to call
    pub tool_name: String,
    /// Arguments passed to the tool
    #[serde(default)]
    pub arguments: HashMap<String, serde_json::Value>,
}

impl ToolCall {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            id: None,
            tool_name: tool_name.into(),
            arguments: HashMap::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    /// Get a string argument
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }

    /// Get a required string argument or return an error message
    pub fn require_string(&self, key: &str) -> Result<&str, String> {
        self.get_string(key)
            .ok_or_else(|| format!("Missing required argument: {}", key))
    }

    /// Arguments as a JSON object, keys sorted for stable output.
    pub fn arguments_json(&self) -> serde_json::Value {
        let sorted: std::collections::BTreeMap<_, _> = self.arguments.iter().collect();
        serde_json::json!(sorted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_definition() {
        let tool = ToolDefinition::new("navigation_tool", "Plan a path to a room")
            .with_parameter(ToolParameter::new("ID", "Worker ID", true))
            .with_parameter(ToolParameter::new("room", "Room number", true));

        assert_eq!(tool.name, "navigation_tool");
        assert_eq!(tool.parameters.len(), 2);
        assert_eq!(tool.parameters[1].param_type, "string");
    }

    #[test]
    fn test_tool_spec_sorted() {
        let spec = ToolSpec::new()
            .register(ToolDefinition::new("display_tool", "Display"))
            .register(ToolDefinition::new("collection_tool", "Collect"));

        let names: Vec<&str> = spec.sorted().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["collection_tool", "display_tool"]);
        assert_eq!(spec.len(), 2);
        assert!(spec.get("unknown").is_none());
        assert!(ToolSpec::new().is_empty());
    }

    #[test]
    fn test_tool_call() {
        let call = ToolCall::new("navigation_tool")
            .with_id("call_1")
            .with_arg("ID", "#80")
            .with_arg("room", "ER-12");

        assert_eq!(call.id.as_deref(), Some("call_1"));
        assert_eq!(call.get_string("room"), Some("ER-12"));
        assert_eq!(call.require_string("ID").unwrap(), "#80");
        assert!(call.require_string("missing").is_err());
        assert_eq!(
            call.arguments_json().to_string(),
            r##"{"ID":"#80","room":"ER-12"}"##
        );
    }
}
