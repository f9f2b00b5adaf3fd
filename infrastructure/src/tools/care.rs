//! Care-team robot tools: navigation_tool, collection_tool, display_tool
//!
//! These stand in for the robots' onboard systems. Each returns the
//! structured mapping a real system would, including an `"Issue Reported"`
//! field that is null when the trial went fine.

use crew_domain::tool::{
    entities::{ToolCall, ToolDefinition, ToolParameter},
    value_objects::{ToolError, ToolResult},
};
use serde_json::{Value, json};

/// Tool name constants
pub const NAVIGATION_TOOL: &str = "navigation_tool";
pub const COLLECTION_TOOL: &str = "collection_tool";
pub const DISPLAY_TOOL: &str = "display_tool";

/// Get the tool definition for navigation_tool
pub fn navigation_tool_definition() -> ToolDefinition {
    ToolDefinition::new(
        NAVIGATION_TOOL,
        "Get the result of the navigation task: location, path planned and any issues reported",
    )
    .with_parameter(ToolParameter::new("ID", "The ID of the HCW", true).with_type("string"))
    .with_parameter(
        ToolParameter::new("room", "The room number of the patient", true).with_type("string"),
    )
}

/// Get the tool definition for collection_tool
pub fn collection_tool_definition() -> ToolDefinition {
    ToolDefinition::new(
        COLLECTION_TOOL,
        "Get the information for HCW onboarding: ID, name, specialty, experience, patient room number, time of arrival and any issues reported",
    )
    .with_parameter(ToolParameter::new("ID", "The ID of the HCW", true).with_type("string"))
}

/// Get the tool definition for display_tool
pub fn display_tool_definition() -> ToolDefinition {
    ToolDefinition::new(
        DISPLAY_TOOL,
        "Get information to be shared on the info sharing display: role assignments, patient room number, patient condition and any issues",
    )
}

fn require(call: &ToolCall, tool: &str, key: &str) -> Result<String, ToolResult> {
    call.require_string(key)
        .map(str::to_string)
        .map_err(|e| ToolResult::failure(tool, ToolError::invalid_argument(e)))
}

/// Execute the navigation_tool
///
/// The assigned care worker never answers: the path is planned but the
/// trial reports that the worker is unavailable.
pub fn execute_navigation_tool(call: &ToolCall) -> ToolResult {
    let id = match require(call, NAVIGATION_TOOL, "ID") {
        Ok(id) => id,
        Err(result) => return result,
    };
    let room = match require(call, NAVIGATION_TOOL, "room") {
        Ok(room) => room,
        Err(result) => return result,
    };
    let worker = normalize_worker_id(&id);

    ToolResult::success(
        NAVIGATION_TOOL,
        json!({
            "Location": format!(
                "Location of the human care worker {} is at (Hallway B, near Nurse Station 2), and the patient room is at ({}).",
                worker, room
            ),
            "Path Planned": format!(
                "Proceeding from Hallway B, turning left at Intersection C, then moving straight past ER-10 and ER-11 to reach {}.",
                room
            ),
            "Issue Reported": format!(
                "HCW {} is currently unavailable due to an urgent call. Attempted contact, but no response.",
                worker
            ),
        }),
    )
}

/// Execute the collection_tool
pub fn execute_collection_tool(call: &ToolCall) -> ToolResult {
    let id = match require(call, COLLECTION_TOOL, "ID") {
        Ok(id) => id,
        Err(result) => return result,
    };

    ToolResult::success(
        COLLECTION_TOOL,
        json!({
            "ID": normalize_worker_id(&id),
            "name": "Dr. XXX",
            "specialty": "Emergency Physician - Trauma & Critical Care",
            "experience": "10 years",
            "patient_room_number": "ER-12",
            "time_of_arrival": "2025-04-01T14:30:00Z",
            "Issue Reported": Value::Null,
        }),
    )
}

/// Execute the display_tool
pub fn execute_display_tool(_call: &ToolCall) -> ToolResult {
    ToolResult::success(
        DISPLAY_TOOL,
        json!({
            "Role Assignment": {
                "HCW": {
                    "HCW #01": "Human Leader",
                    "HCW #72": "Physician",
                    "HCW #90": "Physician"
                },
                "Robot": {
                    "Robot #01": "Nurse",
                    "Robot #02": "Technician"
                }
            },
            "patient_room_number": "ER-12",
            "patient_condition": "Severe Trauma",
            "Issue Reported": Value::Null,
        }),
    )
}

/// "80", "#80" and "HCW #80" all name the same worker.
fn normalize_worker_id(id: &str) -> String {
    let digits = id
        .trim()
        .trim_start_matches("HCW")
        .trim()
        .trim_start_matches('#');
    format!("#{}", digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_reports_unavailable_worker() {
        let call = ToolCall::new(NAVIGATION_TOOL)
            .with_arg("ID", "HCW #80")
            .with_arg("room", "ER-12");
        let result = execute_navigation_tool(&call);

        assert!(result.is_success());
        let issue = result.reported_issue().unwrap();
        assert!(issue.starts_with("HCW #80 is currently unavailable"));
        assert!(result.output().unwrap()["Path Planned"]
            .as_str()
            .unwrap()
            .ends_with("reach ER-12."));
    }

    #[test]
    fn test_navigation_missing_room() {
        let call = ToolCall::new(NAVIGATION_TOOL).with_arg("ID", "80");
        let result = execute_navigation_tool(&call);
        assert!(!result.is_success());
        assert_eq!(result.error().unwrap().code, "INVALID_ARGUMENT");
    }

    #[test]
    fn test_collection_has_no_issue() {
        let call = ToolCall::new(COLLECTION_TOOL).with_arg("ID", "90");
        let result = execute_collection_tool(&call);

        assert!(result.reported_issue().is_none());
        let output = result.output().unwrap();
        assert_eq!(output["ID"], "#90");
        assert_eq!(output["patient_room_number"], "ER-12");
    }

    #[test]
    fn test_display_role_assignment() {
        let result = execute_display_tool(&ToolCall::new(DISPLAY_TOOL));
        let output = result.output().unwrap();
        assert_eq!(output["Role Assignment"]["Robot"]["Robot #02"], "Technician");
        assert_eq!(output["patient_condition"], "Severe Trauma");
        assert!(result.reported_issue().is_none());
    }

    #[test]
    fn test_normalize_worker_id() {
        assert_eq!(normalize_worker_id("80"), "#80");
        assert_eq!(normalize_worker_id("#90"), "#90");
        assert_eq!(normalize_worker_id("HCW #72"), "#72");
    }
}
