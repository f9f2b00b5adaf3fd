//! Live console transcript
//!
//! [`ConsoleObserver`] prints every engine event as it happens: task
//! headers, messages colored by author, tool results and the reason a task
//! stopped.

use colored::Colorize;
use crew_application::ConversationObserver;
use crew_domain::{
    Message, MessageStatus, ParticipantId, Selection, Source, Task, TerminationReason, ToolResult,
};

/// Prints a colored transcript while the engine runs
pub struct ConsoleObserver {
    leader: ParticipantId,
    verbose: bool,
}

impl ConsoleObserver {
    pub fn new(leader: ParticipantId) -> Self {
        Self {
            leader,
            verbose: false,
        }
    }

    /// Also print how each speaker was chosen
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn format_task_start(index: usize, total: usize, task: &Task) -> String {
        let title = format!("Task {}/{}: {}", index + 1, total, task.name());
        let line = "=".repeat(60);
        format!("\n{}\n{}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    pub fn format_message(&self, message: &Message) -> String {
        let label = format!("── #{} {} ──", message.sequence(), message.source().as_str());
        let label = match message.source() {
            Source::User => label.green().bold(),
            Source::Participant(id) if *id == self.leader => label.cyan().bold(),
            Source::Participant(_) => label.yellow().bold(),
        };

        let mut output = format!("\n{}\n{}", label, message.content());
        if message.status() != MessageStatus::Continue {
            output.push_str(&format!(
                "\n{} {}",
                "status:".dimmed(),
                message.status().as_str()
            ));
        }
        if let Some(issue) = message.issue() {
            output.push_str(&format!("\n{} {}", "issue:".red().bold(), issue));
        }
        output
    }

    pub fn format_tool_result(participant: &ParticipantId, result: &ToolResult) -> String {
        if result.success {
            let output = result
                .output
                .as_ref()
                .map(|v| v.to_string())
                .unwrap_or_default();
            format!(
                "  {} {} → {}",
                format!("[{}]", participant).dimmed(),
                result.tool_name.magenta(),
                Self::truncate(&output, 120)
            )
        } else {
            let error = result
                .error
                .as_ref()
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown error".to_string());
            format!(
                "  {} {} {} {}",
                format!("[{}]", participant).dimmed(),
                result.tool_name.magenta(),
                "failed:".red(),
                error
            )
        }
    }

    pub fn format_termination(reason: &TerminationReason) -> String {
        let text = format!("stopped: {}", reason);
        let text = if reason.is_escalation() {
            text.red().bold()
        } else if reason.is_limit() {
            text.yellow().bold()
        } else {
            text.green().bold()
        };
        format!("\n{}", text)
    }

    fn truncate(text: &str, max_chars: usize) -> String {
        if text.chars().count() <= max_chars {
            return text.to_string();
        }
        let head: String = text.chars().take(max_chars).collect();
        format!("{}…", head)
    }
}

impl ConversationObserver for ConsoleObserver {
    fn on_message(&self, message: &Message) {
        println!("{}", self.format_message(message));
    }

    fn on_task_start(&self, index: usize, total: usize, task: &Task) {
        println!("{}", Self::format_task_start(index, total, task));
    }

    fn on_speaker_selected(&self, selection: &Selection) {
        if self.verbose {
            println!(
                "{}",
                format!("  next: {} ({})", selection.speaker, selection.method).dimmed()
            );
        }
    }

    fn on_tool_result(&self, participant: &ParticipantId, result: &ToolResult) {
        println!("{}", Self::format_tool_result(participant, result));
    }

    fn on_termination(&self, reason: &TerminationReason) {
        println!("{}", Self::format_termination(reason));
    }
}
