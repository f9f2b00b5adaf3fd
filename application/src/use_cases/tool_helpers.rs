//! Shared helpers for tool use cases.

use crew_domain::core::string::truncate;
use crew_domain::tool::entities::ToolCall;

/// Short `key=value` preview of tool call arguments for log lines.
///
/// Keys are sorted so the preview is stable; string values are shown
/// without quotes.
pub(crate) fn tool_args_preview(call: &ToolCall) -> String {
    let mut keys: Vec<&String> = call.arguments.keys().collect();
    keys.sort();
    let joined = keys
        .into_iter()
        .map(|key| match &call.arguments[key] {
            serde_json::Value::String(s) => format!("{}={}", key, s),
            other => format!("{}={}", key, other),
        })
        .collect::<Vec<_>>()
        .join(", ");
    truncate(&joined, 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_pairs() {
        let call = ToolCall::new("navigation_tool")
            .with_arg("room", "ER-12")
            .with_arg("ID", "80");
        assert_eq!(tool_args_preview(&call), "ID=80, room=ER-12");
    }

    #[test]
    fn test_non_string_values() {
        let call = ToolCall::new("t").with_arg("count", 42);
        assert_eq!(tool_args_preview(&call), "count=42");
    }

    #[test]
    fn test_empty_args() {
        assert_eq!(tool_args_preview(&ToolCall::new("display_tool")), "");
    }

    #[test]
    fn test_truncation() {
        let call = ToolCall::new("t").with_arg("path", "a".repeat(100));
        assert!(tool_args_preview(&call).chars().count() <= 63);
    }
}
