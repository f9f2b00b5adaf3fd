//! Progress reporting while waiting on participants

use crew_application::ConversationObserver;
use crew_domain::{Message, Selection, Task, TerminationReason};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Shows a spinner between speaker selection and the speaker's message
///
/// Register it before the console observer so the spinner is cleared
/// before anything is printed.
pub struct ProgressReporter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn start(&self, message: String) {
        let Ok(mut slot) = self.spinner.lock() else {
            return;
        };
        if let Some(previous) = slot.take() {
            previous.finish_and_clear();
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(100));
        *slot = Some(pb);
    }

    fn clear(&self) {
        if let Ok(mut slot) = self.spinner.lock()
            && let Some(pb) = slot.take()
        {
            pb.finish_and_clear();
        }
    }

    /// Whether a spinner is currently shown
    pub fn is_active(&self) -> bool {
        self.spinner.lock().map(|s| s.is_some()).unwrap_or(false)
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationObserver for ProgressReporter {
    fn on_message(&self, _message: &Message) {
        self.clear();
    }

    fn on_task_start(&self, _index: usize, _total: usize, _task: &Task) {
        self.clear();
    }

    fn on_speaker_selected(&self, selection: &Selection) {
        self.start(format!("Waiting for {}...", selection.speaker));
    }

    fn on_termination(&self, _reason: &TerminationReason) {
        self.clear();
    }
}

/// Plain line-based progress for non-interactive terminals
pub struct SimpleProgress;

impl ConversationObserver for SimpleProgress {
    fn on_message(&self, _message: &Message) {}

    fn on_speaker_selected(&self, selection: &Selection) {
        eprintln!("-> {} ({})", selection.speaker, selection.method);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crew_domain::{ParticipantId, SelectionMethod};

    #[test]
    fn test_spinner_lifecycle() {
        let reporter = ProgressReporter::new();
        assert!(!reporter.is_active());

        let selection = Selection::new(
            ParticipantId::try_new("DisplayRobot").unwrap(),
            SelectionMethod::Strategy,
        );
        reporter.on_speaker_selected(&selection);
        assert!(reporter.is_active());

        reporter.on_termination(&TerminationReason::MaxMessages { limit: 2, count: 2 });
        assert!(!reporter.is_active());
    }
}
