//! Offline backend that plays a fixed script.
//!
//! [`ScriptedBackend`] stands in for a hosted model when there is no
//! network or API key. It reads the generation context the same way a
//! model would and answers deterministically:
//!
//! - the **leader** assigns the task to the participant whose play matches
//!   the task prompt, then closes the task with `TERMINATE` (or `ESCALATE`
//!   when the report carries an `ALERT`). Tasks no play matches are done by
//!   the leader itself, as a reflection over the whole conversation.
//! - a **participant with tools** calls its first tool, filling arguments
//!   from its assignment line, then reflects on the result with a
//!   `STATUS` line (and an `ALERT` line when an issue was reported).
//! - the **selector** names the last agent assigned in the conversation.

use async_trait::async_trait;
use crew_application::ports::decision_backend::{BackendError, DecisionBackend};
use crew_domain::session::{ContextMessage, Generation, GenerationContext, Requester, Role};
use crew_domain::tool::{ISSUE_REPORTED_KEY, ToolCall, ToolDefinition};
use crew_domain::{MessageStatus, USER_SOURCE};
use regex::Regex;
use serde_json::{Value, json};
use std::sync::LazyLock;
use std::time::Duration;
use tracing::trace;

use crate::selection::parse_assignments;

static WORKER_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\s*(\d+)").expect("worker id pattern is valid"));
static ROOM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Z]{2,}-\d+)\b").expect("room pattern is valid"));

/// A task the leader hands to one participant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Play {
    /// Lowercase phrase that identifies the task prompt
    pub trigger: String,
    pub agent: String,
    pub instruction: String,
}

/// Deterministic, network-free [`DecisionBackend`].
#[derive(Debug, Clone)]
pub struct ScriptedBackend {
    leader: String,
    plays: Vec<Play>,
    delay: Duration,
}

impl ScriptedBackend {
    pub fn new(leader: impl Into<String>) -> Self {
        Self {
            leader: leader.into(),
            plays: Vec::new(),
            delay: Duration::ZERO,
        }
    }

    /// Register a play. The first play whose trigger appears in the task
    /// prompt wins.
    pub fn with_play(
        mut self,
        trigger: impl Into<String>,
        agent: impl Into<String>,
        instruction: impl Into<String>,
    ) -> Self {
        self.plays.push(Play {
            trigger: trigger.into().to_lowercase(),
            agent: agent.into(),
            instruction: instruction.into(),
        });
        self
    }

    /// Plays whose trigger appears in `prompt`, in registration order.
    pub fn plays_matching(&self, prompt: &str) -> impl Iterator<Item = &Play> {
        let prompt = prompt.to_lowercase();
        self.plays.iter().filter(move |p| prompt.contains(&p.trigger))
    }

    /// Pause before every answer, to make progress output readable.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    // ==================== Leader ====================

    fn leader_reply(&self, context: &GenerationContext) -> Generation {
        let (prompt, since_prompt) = split_at_task(&context.messages);
        let report = since_prompt
            .iter()
            .rev()
            .find(|m| m.role == Role::User && m.name.as_deref() != Some(USER_SOURCE));

        match report {
            None => match self.play_for(prompt) {
                Some(play) => Generation::text(format!(
                    "Plan for this task:\n1. {} : {}\nReport back with STATUS and any ALERT.",
                    play.agent, play.instruction
                )),
                None => reflection_report(&context.messages),
            },
            Some(report) => {
                let author = report.name.as_deref().unwrap_or("team member");
                match alert_in(&report.content) {
                    Some(alert) => Generation::text_with_status(
                        format!(
                            "{} reported a failure: {}\n\
                             The issue could not be resolved within the team. \
                             Handing it over to the human supervisor.\nESCALATE",
                            author, alert
                        ),
                        MessageStatus::Escalate,
                    ),
                    None => Generation::text_with_status(
                        format!(
                            "{} completed the task successfully.\nSummary:\n{}\nTERMINATE",
                            author,
                            report.content.trim()
                        ),
                        MessageStatus::Success,
                    ),
                }
            }
        }
    }

    fn play_for(&self, prompt: Option<&ContextMessage>) -> Option<&Play> {
        self.plays_matching(&prompt?.content).next()
    }

    // ==================== Participants ====================

    fn participant_reply(&self, me: &str, context: &GenerationContext) -> Generation {
        if let Some(result) = context.messages.last().filter(|m| m.role == Role::Tool) {
            return reflect_on(&result.content);
        }

        let Some(tool) = context.tools.first() else {
            return Generation::text(
                "STATUS: FAILURE\nALERT: I have no system that can perform this task.",
            );
        };

        let (prompt, since_prompt) = split_at_task(&context.messages);
        let instruction = since_prompt
            .iter()
            .rev()
            .filter(|m| m.name.as_deref() == Some(self.leader.as_str()))
            .flat_map(|m| parse_assignments(&m.content))
            .find(|a| a.agent == me)
            .map(|a| a.task)
            .unwrap_or_default();
        let prompt = prompt.map(|p| p.content.as_str()).unwrap_or_default();

        Generation::ToolCall(fill_arguments(tool, &instruction, prompt))
    }

    // ==================== Selector ====================

    fn selector_reply(&self, context: &GenerationContext) -> Generation {
        let text = context.last_content().unwrap_or_default();
        let agent = parse_assignments(text)
            .pop()
            .map(|a| a.agent)
            .unwrap_or_else(|| self.leader.clone());
        Generation::text(agent)
    }
}

#[async_trait]
impl DecisionBackend for ScriptedBackend {
    async fn generate(&self, context: &GenerationContext) -> Result<Generation, BackendError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        trace!(requester = %context.requester, "Scripted generation");

        Ok(match &context.requester {
            Requester::Selector => self.selector_reply(context),
            Requester::Participant(id) if id.as_str() == self.leader => {
                self.leader_reply(context)
            }
            Requester::Participant(id) => self.participant_reply(id.as_str(), context),
        })
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

// ==================== Helpers ====================

/// The latest task prompt and everything after it.
fn split_at_task(messages: &[ContextMessage]) -> (Option<&ContextMessage>, &[ContextMessage]) {
    match messages
        .iter()
        .rposition(|m| m.role == Role::User && m.name.as_deref() == Some(USER_SOURCE))
    {
        Some(index) => (Some(&messages[index]), &messages[index + 1..]),
        None => (None, messages),
    }
}

fn alert_in(content: &str) -> Option<&str> {
    content
        .lines()
        .find_map(|line| line.trim().strip_prefix("ALERT:"))
        .map(str::trim)
}

fn fill_arguments(tool: &ToolDefinition, instruction: &str, prompt: &str) -> ToolCall {
    tool.parameters.iter().fold(ToolCall::new(&tool.name), |call, param| {
        let value = match param.name.to_lowercase().as_str() {
            "id" => first_capture(&WORKER_ID, instruction)
                .or_else(|| first_capture(&WORKER_ID, prompt)),
            "room" => first_capture(&ROOM, instruction).or_else(|| first_capture(&ROOM, prompt)),
            _ => None,
        };
        match value {
            Some(value) => call.with_arg(&param.name, value),
            None if param.required => call.with_arg(&param.name, "unknown"),
            None => call,
        }
    })
}

fn first_capture(pattern: &Regex, text: &str) -> Option<String> {
    pattern.captures(text).map(|caps| caps[1].to_string())
}

/// Turn a tool result summary (`<tool> returned:\n<json>` or
/// `<tool> failed\nIssue Reported: ...`) into a status report.
fn reflect_on(summary: &str) -> Generation {
    let (_, body) = summary.split_once('\n').unwrap_or((summary, ""));
    let prefix = format!("{}:", ISSUE_REPORTED_KEY);

    let (task_return, issue) = match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(mut output)) => {
            let issue = match output.remove(ISSUE_REPORTED_KEY) {
                Some(Value::String(issue)) if !issue.trim().is_empty() => Some(issue),
                _ => None,
            };
            (Value::Object(output), issue)
        }
        Ok(other) => (other, None),
        Err(_) => (
            Value::Null,
            body.trim()
                .strip_prefix(prefix.as_str())
                .map(|s| s.trim().to_string())
                .or_else(|| Some(body.trim().to_string())),
        ),
    };

    let status = if issue.is_some() { "failure" } else { "success" };
    let report = json!({
        "Task Return": task_return,
        "Task Status": status,
    });
    let report = serde_json::to_string_pretty(&report).unwrap_or_else(|_| report.to_string());

    match issue {
        Some(issue) => Generation::text(format!(
            "{}\nSTATUS: FAILURE\nALERT: {}",
            report, issue
        )),
        None => Generation::text(format!("{}\nSTATUS: SUCCESS", report)),
    }
}

/// The leader's closing report over every task so far.
fn reflection_report(messages: &[ContextMessage]) -> Generation {
    let tasks = messages
        .iter()
        .filter(|m| m.role == Role::User && m.name.as_deref() == Some(USER_SOURCE))
        .count();
    let alerts: Vec<&str> = messages.iter().filter_map(|m| alert_in(&m.content)).collect();
    let successes = messages
        .iter()
        .filter(|m| m.content.contains("STATUS: SUCCESS"))
        .count();
    let escalations = messages
        .iter()
        .filter(|m| m.role == Role::Assistant && m.content.contains("ESCALATE"))
        .count();

    let outcomes = format!(
        "{} task(s) handled before this reflection; {} trial(s) succeeded and {} reported an alert.",
        tasks.saturating_sub(1),
        successes,
        alerts.len()
    );
    let recovery = if alerts.is_empty() {
        "No recovery was needed.".to_string()
    } else {
        format!(
            "{} issue(s) were escalated to the human supervisor: {}",
            escalations,
            alerts.join("; ")
        )
    };
    let lessons = if alerts.is_empty() {
        "Clear one-line assignments kept every robot on its own responsibility."
    } else {
        "Confirm the availability of assigned care workers before navigation, and keep an alternative worker ready."
    };

    let report = json!({
        "Task Return": {
            "Task Outcomes": outcomes,
            "Recovery Attempts": recovery,
            "Lessons Learned from the Process": lessons,
        },
        "Task Status": "success",
    });
    let report = serde_json::to_string_pretty(&report).unwrap_or_else(|_| report.to_string());
    Generation::text_with_status(format!("{}\nTERMINATE", report), MessageStatus::Success)
}
