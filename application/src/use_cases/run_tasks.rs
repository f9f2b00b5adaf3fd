//! Run Tasks use case
//!
//! Feeds an ordered list of tasks into one conversation engine. The history
//! is never reset, so each task sees everything the earlier ones produced.
//! An escalation ends the current task but not the run.

use crate::ports::observer::{ConversationObserver, NoObserver};
use crate::ports::run_hooks::{NoRunHooks, RunHooks};
use crate::use_cases::run_conversation::{ConversationEngine, EngineError, TaskOutcome};
use crew_domain::{History, Message, Task};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// A task failed fatally; earlier outcomes are kept
#[derive(Error, Debug)]
#[error("Task {task_index} failed: {source}")]
pub struct RunTasksError {
    /// Zero-based index of the failing task
    pub task_index: usize,
    /// Outcomes of the tasks that finished before the failure
    pub completed: Vec<TaskOutcome>,
    #[source]
    pub source: EngineError,
}

/// Result of a full run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub outcomes: Vec<TaskOutcome>,
    pub total_messages: usize,
    /// Every message of the run, in order
    pub messages: Vec<Message>,
}

impl RunReport {
    /// Number of tasks that stopped with an escalation
    pub fn escalations(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_escalation()).count()
    }

    /// Number of tasks that stopped on the message-count bound
    pub fn limits_reached(&self) -> usize {
        self.outcomes.iter().filter(|o| o.reason.is_limit()).count()
    }

    /// One-line description used by run hooks and logs
    pub fn summary(&self) -> String {
        format!(
            "{} tasks, {} messages, {} escalated, {} hit the message limit",
            self.outcomes.len(),
            self.total_messages,
            self.escalations(),
            self.limits_reached()
        )
    }
}

/// Use case for running several tasks on one shared history
pub struct RunTasksUseCase {
    engine: ConversationEngine,
    hooks: Arc<dyn RunHooks>,
}

impl RunTasksUseCase {
    pub fn new(engine: ConversationEngine) -> Self {
        Self {
            engine,
            hooks: Arc::new(NoRunHooks),
        }
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn RunHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn engine(&self) -> &ConversationEngine {
        &self.engine
    }

    pub fn history(&self) -> &History {
        self.engine.history()
    }

    /// Execute the use case without live output
    pub async fn execute(&mut self, tasks: &[Task]) -> Result<RunReport, RunTasksError> {
        self.execute_with_observer(tasks, &NoObserver).await
    }

    /// Execute the use case with observer callbacks
    pub async fn execute_with_observer(
        &mut self,
        tasks: &[Task],
        observer: &dyn ConversationObserver,
    ) -> Result<RunReport, RunTasksError> {
        info!("Starting run with {} tasks", tasks.len());
        self.hooks.on_run_start(tasks.len());

        let mut outcomes = Vec::with_capacity(tasks.len());
        for (index, task) in tasks.iter().enumerate() {
            observer.on_task_start(index, tasks.len(), task);
            match self.engine.run_task(task, observer).await {
                Ok(outcome) => {
                    if outcome.is_escalation() {
                        warn!("Task {} escalated; continuing with the next task", task.name());
                    }
                    outcomes.push(outcome);
                }
                Err(source) => {
                    let summary = format!("task {} ({}) failed: {}", index, task.name(), source);
                    self.hooks.on_run_end(false, &summary);
                    return Err(RunTasksError {
                        task_index: index,
                        completed: outcomes,
                        source,
                    });
                }
            }
        }

        let history = self.engine.history();
        let report = RunReport {
            outcomes,
            total_messages: history.len(),
            messages: history.messages().to_vec(),
        };
        info!("Run finished: {}", report.summary());
        self.hooks.on_run_end(true, &report.summary());
        Ok(report)
    }
}
