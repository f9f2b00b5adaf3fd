//! OpenAI function-calling schema converter.
//!
//! Turns domain [`ToolDefinition`]s into the `tools` array of a chat
//! completions request.

use crew_domain::tool::entities::ToolDefinition;
use serde_json::{Value, json};

/// Produces `{"type": "function", "function": {...}}` entries.
///
/// Handles param_type → JSON Schema type mapping:
/// - `"string"`, `"path"` → `"string"`
/// - `"number"` → `"number"`
/// - `"integer"` → `"integer"`
/// - `"boolean"` → `"boolean"`
/// - `"object"`, `"array"` → themselves
/// - anything else → `"string"`
pub struct FunctionSchemaConverter;

impl FunctionSchemaConverter {
    pub fn tool_to_schema(&self, tool: &ToolDefinition) -> Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for param in &tool.parameters {
            let schema_type = match param.param_type.as_str() {
                "number" => "number",
                "integer" => "integer",
                "boolean" => "boolean",
                "object" => "object",
                "array" => "array",
                _ => "string",
            };

            properties.insert(
                param.name.clone(),
                json!({
                    "type": schema_type,
                    "description": param.description,
                }),
            );

            if param.required {
                required.push(json!(param.name));
            }
        }

        json!({
            "type": "function",
            "function": {
                "name": tool.name,
                "description": tool.description,
                "parameters": {
                    "type": "object",
                    "properties": properties,
                    "required": required,
                }
            }
        })
    }

    /// Schemas for every offered tool, sorted by name for stable requests.
    pub fn tools_schema(&self, tools: &[ToolDefinition]) -> Vec<Value> {
        let mut sorted: Vec<&ToolDefinition> = tools.iter().collect();
        sorted.sort_by_key(|t| &t.name);
        sorted.into_iter().map(|t| self.tool_to_schema(t)).collect()
    }
}
