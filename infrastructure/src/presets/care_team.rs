//! Emergency-department care team
//!
//! A planning agent leads three robots, each with one onboard system, through
//! four ordered tasks: guide a care worker to the patient room, collect the
//! arriving worker's onboarding information, update the info sharing
//! display, and reflect on the collaboration.

use crew_domain::{DomainError, Participant, ParticipantId, Roster, Task};

use crate::backend::ScriptedBackend;
use crate::tools::care;

pub const PLANNING_AGENT: &str = "PlanningAgent";
pub const NAVIGATION_ROBOT: &str = "NavigationRobot";
pub const COLLECTION_ROBOT: &str = "InformationCollectionRobot";
pub const DISPLAY_ROBOT: &str = "InformationDisplayRobot";

/// Task names, in run order
pub const TASK_NAMES: [&str; 4] = ["navigate_HCW", "collect_info", "display_info", "reflection"];

const PLANNING_PROMPT: &str = r#"You are a planning agent representing the team leader of a robot team.
Your job is to break down complex tasks into smaller, manageable subtasks.
Your team members are:
    NavigationRobot: Navigates healthcare workers to the destination
    InformationCollectionRobot: Collects onboarding information from the healthcare workers
    InformationDisplayRobot: Displays information on the info sharing display to support care coordination and team role awareness

You should clearly identify tasks that should be delegated, and tasks should be done by yourself based on the task nature and your team member capabilities.
For all tasks that should be delegated, you only plan and delegate tasks - you do not execute them yourself.

When assigning tasks, use this format:
1. <agent> : <task>

You should follow the following rules:
1. You should do leadership related tasks such as reflection task by yourself without delegation.
2. You are responsible for checking progress and supervising your team members. If any of them report "ALERT" to you, you should consider carefully the issues and provide an alternative solution plan by outputting and urge the team member to reperform the task based on your new plan. If the issue remains unresolved, escalate it to your human supervisor.
3. For all tasks, you should evaluate whether repeating a task is necessary and avoid redundant work by checking previous task outcomes and current requirements. If you decide to do a task again, you should provide a reason for doing so.

Task-related guidance:
1. For display tasks, the InformationDisplayRobot uses its own tool to obtain all required information, and this information must be displayed. It is the InformationDisplayRobot's responsibility to fetch information and generate the layout plan, not yours.

After all tasks are complete, summarize the findings and end with "TERMINATE".
If you escalate an unresolved issue to your human supervisor, summarize the findings and end with "ESCALATE" instead."#;

const ROBOT_REPORTING: &str = r#"report back to your leader with:
    - A `STATUS` field that is either `"SUCCESS"` or `"FAILURE"`
    - If any issues occur during the trial:
        - Include an `ALERT` field with a detailed description of the problem: `ALERT: <issue report>`"#;

const SCENARIO_NAVIGATE: &str = "A new patient has just arrived in the emergency department, showing signs of confusion and distress. Immediate medical attention is required. The system has assigned human care worker #80 to assist. Please guide HCW #80 to patient room ER-12.";
const SCENARIO_COLLECT: &str = "The initial navigation to HCW #80 failed, but the issue was resolved by finding an alternative human care worker #90. HCW #90 successfully arrives at ER-12 and scans their ID card on the ID scanner.";
const SCENARIO_DISPLAY: &str = "The information of HCW #90 is successfully collected.";

const EXPECTED_NAVIGATE: &str = r#"A JSON format with the following fields:
- Task Return:
  -- Location information
  -- Path planned
- Task Status:
  -- "failure" or "success"
  -- If failure, report issues that prevent task completion."#;

const EXPECTED_COLLECT: &str = r#"A JSON format with the following fields:
- Task Return:
  -- ID
  -- Name
  -- Specialty
- Task Status:
  -- "failure" or "success"
  -- If failure, report issues that prevent task completion."#;

const EXPECTED_DISPLAY: &str = r#"A JSON format with the following fields:
- Task Return:
  -- The information to be displayed on the information sharing display
  -- A brief plan of how to lay out the information on the information sharing display
- Task Status:
  -- "failure" or "success"
  -- If failure, report issues that prevent task completion."#;

const EXPECTED_REFLECTION: &str = r#"A JSON format with the following fields:
- Task Return:
  -- A report on the reflection of crew collaboration in text format including the following sections:
    --- Task Outcomes
    --- Recovery Attempts
    --- Lessons Learned from the Process
- Task Status:
  -- "failure" or "success"
  -- If failure, report issues that prevent task completion."#;

/// Factory for the care team's roster, tasks and offline script
pub struct CareTeamPreset;

impl CareTeamPreset {
    pub fn roster() -> Result<Roster, DomainError> {
        let participants = vec![
            Participant::new(
                ParticipantId::try_new(PLANNING_AGENT)?,
                "An agent for planning tasks, this agent should be the first to engage when given a new task.",
            )
            .with_system_prompt(PLANNING_PROMPT),
            robot(
                NAVIGATION_ROBOT,
                "An agent for navigating healthcare workers to the destination.",
                &format!(
                    "You are a navigation robot responsible for facilitating staff movement.\n\
                     Your only tool is {} - this represents your internal navigation system, including location tracking, path planning, and communication with staff.\n\n\
                     After each navigation trial, you must {}\n\n\
                     You must not perform any tasks that are outside your assigned responsibility of navigation.",
                    care::NAVIGATION_TOOL,
                    ROBOT_REPORTING
                ),
            )?
            .with_tool(care::navigation_tool_definition()),
            robot(
                COLLECTION_ROBOT,
                "An agent for collecting onboarding information from the healthcare workers.",
                &format!(
                    "You are an information collection robot responsible for collecting onboarding information from the healthcare workers.\n\
                     Your only tool is {} - this represents your own info collection system to collect information from the healthcare workers when they scan their ID card.\n\n\
                     After each information collection trial, you must {}\n\n\
                     You must not perform any tasks that are outside your assigned responsibility of collecting information.",
                    care::COLLECTION_TOOL,
                    ROBOT_REPORTING
                ),
            )?
            .with_tool(care::collection_tool_definition()),
            robot(
                DISPLAY_ROBOT,
                "An agent that displays information on the shared information display.",
                &format!(
                    "You are a display robot responsible for displaying information on the info sharing display to support care coordination and team role awareness.\n\
                     Your only tool is {} - this represents your own display system to retrieve information and display it on the info sharing display.\n\
                     Note: Your tool's output contains all the information that must be displayed. It is your responsibility to generate a layout plan for presenting all of the information provided by your tool.\n\n\
                     After each information display trial, you must {}\n\n\
                     You must not perform any tasks that are outside your assigned responsibility of displaying information.",
                    care::DISPLAY_TOOL,
                    ROBOT_REPORTING
                ),
            )?
            .with_tool(care::display_tool_definition()),
        ];

        Roster::new(participants, ParticipantId::try_new(PLANNING_AGENT)?)
    }

    /// The four tasks, in run order.
    pub fn tasks() -> Result<Vec<Task>, DomainError> {
        Ok(vec![
            Task::try_new(
                TASK_NAMES[0],
                scenario_prompt(
                    SCENARIO_NAVIGATE,
                    "guide the human care worker to the designated location.",
                ),
            )?
            .with_expected_output(EXPECTED_NAVIGATE),
            Task::try_new(
                TASK_NAMES[1],
                scenario_prompt(
                    SCENARIO_COLLECT,
                    "collect information from the human care worker.",
                ),
            )?
            .with_expected_output(EXPECTED_COLLECT),
            Task::try_new(
                TASK_NAMES[2],
                scenario_prompt(
                    SCENARIO_DISPLAY,
                    "get the information to display and develop a plan to lay out the information on the information sharing display.",
                ),
            )?
            .with_expected_output(EXPECTED_DISPLAY),
            Task::try_new(
                TASK_NAMES[3],
                "Reflect on the entire process of crew collaboration and generate a reflection report highlighting Task Outcomes, Recovery Attempts, and Lessons Learned from the process.",
            )?
            .with_expected_output(EXPECTED_REFLECTION),
        ])
    }

    /// Keep only the named tasks, preserving run order.
    ///
    /// An empty filter keeps every task.
    pub fn select_tasks(names: &[String]) -> Result<Vec<Task>, DomainError> {
        if let Some(unknown) = names.iter().find(|n| !TASK_NAMES.contains(&n.as_str())) {
            return Err(DomainError::InvalidTask(format!(
                "unknown task '{}' (expected one of: {})",
                unknown,
                TASK_NAMES.join(", ")
            )));
        }
        Ok(Self::tasks()?
            .into_iter()
            .filter(|t| names.is_empty() || names.iter().any(|n| n == t.name()))
            .collect())
    }

    /// Offline script that plays the team through every task.
    pub fn script() -> ScriptedBackend {
        ScriptedBackend::new(PLANNING_AGENT)
            .with_play(
                "guide the human care worker",
                NAVIGATION_ROBOT,
                "Navigate HCW #80 to patient room ER-12 and report location and path.",
            )
            .with_play(
                "collect information from the human care worker",
                COLLECTION_ROBOT,
                "Collect the onboarding information of HCW #90 from the ID scan at ER-12.",
            )
            .with_play(
                "information sharing display",
                DISPLAY_ROBOT,
                "Retrieve the display information and generate a layout plan for the info sharing display.",
            )
    }
}

fn robot(name: &str, description: &str, prompt: &str) -> Result<Participant, DomainError> {
    Ok(Participant::new(ParticipantId::try_new(name)?, description)
        .with_system_prompt(prompt)
        .with_reflect_on_tool_use(true))
}

fn scenario_prompt(scenario: &str, goal: &str) -> String {
    format!("The scenario observed: {}\nNow the task is to {}", scenario, goal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_shape() {
        let roster = CareTeamPreset::roster().unwrap();
        assert_eq!(roster.len(), 4);
        assert_eq!(roster.leader().as_str(), PLANNING_AGENT);

        let leader = roster.find(PLANNING_AGENT).unwrap();
        assert!(!leader.has_tools());

        let navigator = roster.find(NAVIGATION_ROBOT).unwrap();
        assert!(navigator.reflects_on_tool_use());
        assert!(navigator.tools().get(care::NAVIGATION_TOOL).is_some());
        assert!(navigator.system_prompt().contains("ALERT: <issue report>"));
    }

    #[test]
    fn test_tasks_in_order() {
        let tasks = CareTeamPreset::tasks().unwrap();
        let names: Vec<&str> = tasks.iter().map(|t| t.name()).collect();
        assert_eq!(names, TASK_NAMES);

        let rendered = tasks[0].render();
        assert!(rendered.starts_with("The scenario observed: A new patient"));
        assert!(rendered.contains("\nNow the task is to guide the human care worker"));
        assert!(rendered.contains("\nExpected output: A JSON format"));
        assert!(tasks[3].prompt().starts_with("Reflect on the entire process"));
    }

    #[test]
    fn test_select_tasks() {
        let selected =
            CareTeamPreset::select_tasks(&["reflection".to_string(), "collect_info".to_string()])
                .unwrap();
        let names: Vec<&str> = selected.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["collect_info", "reflection"]);

        assert_eq!(CareTeamPreset::select_tasks(&[]).unwrap().len(), 4);
        assert!(CareTeamPreset::select_tasks(&["teleport".to_string()]).is_err());
    }

    #[test]
    fn test_each_delegated_task_has_exactly_one_play() {
        let script = CareTeamPreset::script();
        let tasks = CareTeamPreset::tasks().unwrap();
        let matched: Vec<usize> = tasks
            .iter()
            .map(|t| script.plays_matching(&t.render()).count())
            .collect();
        assert_eq!(matched, vec![1, 1, 1, 0]);
    }
}
