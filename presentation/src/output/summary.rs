//! End-of-run summaries in text and JSON

use crate::output::formatter::ReportFormatter;
use colored::Colorize;
use crew_application::{RunReport, RunTasksError, TaskOutcome};
use serde_json::json;

/// Human-readable table of task outcomes
pub struct TextSummary;

impl TextSummary {
    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("\n{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn outcome_line(index: usize, outcome: &TaskOutcome) -> String {
        let marker = if outcome.is_escalation() {
            "!".red().bold()
        } else if outcome.reason.is_limit() {
            "~".yellow().bold()
        } else {
            "v".green().bold()
        };
        format!(
            "  {} {}. {:<14} {} ({} turns, messages #{}..#{})",
            marker,
            index + 1,
            outcome.task,
            outcome.reason,
            outcome.turns,
            outcome.first_sequence,
            (outcome.first_sequence + outcome.messages_appended).saturating_sub(1)
        )
    }
}

impl ReportFormatter for TextSummary {
    fn format(&self, report: &RunReport) -> String {
        let mut output = Self::header("Run Summary");
        output.push('\n');
        for (index, outcome) in report.outcomes.iter().enumerate() {
            output.push_str(&Self::outcome_line(index, outcome));
            output.push('\n');
        }
        output.push_str(&format!("\n{} {}\n", "Total:".cyan().bold(), report.summary()));
        output
    }

    fn format_failure(&self, error: &RunTasksError) -> String {
        let mut output = Self::header("Run Aborted");
        output.push('\n');
        for (index, outcome) in error.completed.iter().enumerate() {
            output.push_str(&Self::outcome_line(index, outcome));
            output.push('\n');
        }
        let label = if error.source.is_cancelled() {
            "Cancelled:".yellow().bold()
        } else {
            "Error:".red().bold()
        };
        output.push_str(&format!(
            "  {} task {} {}\n",
            label,
            error.task_index + 1,
            error.source
        ));
        if let Some(last) = &error.source.last_message {
            output.push_str(&format!(
                "  {} #{} from {}\n",
                "Last message:".dimmed(),
                last.sequence(),
                last.source().as_str()
            ));
        }
        output
    }
}

/// Machine-readable report
pub struct JsonSummary;

impl ReportFormatter for JsonSummary {
    fn format(&self, report: &RunReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_failure(&self, error: &RunTasksError) -> String {
        let value = json!({
            "error": error.source.kind.to_string(),
            "cancelled": error.source.is_cancelled(),
            "task_index": error.task_index,
            "phase": error.source.phase,
            "history_len": error.source.history_len,
            "last_message": error.source.last_message,
            "completed": error.completed,
        });
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crew_application::{EngineError, EngineErrorKind};
    use crew_domain::{EnginePhase, History, MessageDraft, MessageStatus, ParticipantId, TerminationReason};

    fn outcome(task: &str, reason: TerminationReason, first: usize, appended: usize) -> TaskOutcome {
        TaskOutcome {
            task: task.to_string(),
            reason,
            first_sequence: first,
            messages_appended: appended,
            turns: appended.saturating_sub(1),
        }
    }

    fn report() -> RunReport {
        let mut history = History::new();
        history.begin_task("navigate");
        history.append(MessageDraft::from_participant(
            ParticipantId::try_new("PlanningAgent").unwrap(),
            "ESCALATE",
        ));
        RunReport {
            outcomes: vec![
                outcome(
                    "navigate_HCW",
                    TerminationReason::Keyword {
                        keyword: "ESCALATE".to_string(),
                        outcome: MessageStatus::Escalate,
                    },
                    0,
                    2,
                ),
                outcome(
                    "reflection",
                    TerminationReason::MaxMessages { limit: 6, count: 6 },
                    2,
                    4,
                ),
            ],
            total_messages: 6,
            messages: history.messages().to_vec(),
        }
    }

    #[test]
    fn test_text_summary_lists_outcomes() {
        colored::control::set_override(false);
        let text = TextSummary.format(&report());
        assert!(text.contains("Run Summary"));
        assert!(text.contains("1. navigate_HCW"));
        assert!(text.contains("messages #0..#1"));
        assert!(text.contains("2 tasks, 6 messages, 1 escalated, 1 hit the message limit"));
    }

    #[test]
    fn test_json_summary_shape() {
        let text = JsonSummary.format(&report());
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["total_messages"], 6);
        assert_eq!(value["outcomes"].as_array().unwrap().len(), 2);
        assert_eq!(value["messages"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_failure_formats() {
        colored::control::set_override(false);
        let error = RunTasksError {
            task_index: 1,
            completed: report().outcomes[..1].to_vec(),
            source: EngineError {
                phase: EnginePhase::Executing,
                kind: EngineErrorKind::Cancelled,
                history_len: 3,
                last_message: None,
            },
        };

        let text = TextSummary.format_failure(&error);
        assert!(text.contains("Run Aborted"));
        assert!(text.contains("Cancelled: task 2"));

        let value: serde_json::Value =
            serde_json::from_str(&JsonSummary.format_failure(&error)).unwrap();
        assert_eq!(value["cancelled"], true);
        assert_eq!(value["task_index"], 1);
        assert_eq!(value["phase"], "executing");
        assert_eq!(value["completed"].as_array().unwrap().len(), 1);
    }
}
