//! Conversation engine.
//!
//! Drives one task at a time through the turn cycle, appending exactly one
//! message per turn to a history that is never reset between tasks.
//!
//! ```text
//! run_task(task)
//!   │ append task prompt
//!   ▼
//! ┌───────────┐   ┌───────────┐   ┌───────────┐   ┌────────────┐
//! │ Selecting │──▶│ Executing │──▶│ Appending │──▶│ Evaluating │──▶ Terminated
//! └───────────┘   └───────────┘   └───────────┘   └────────────┘
//!       ▲                                               │
//!       └───────────────────── no stop ─────────────────┘
//! ```

use crate::config::EngineParams;
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger};
use crate::ports::decision_backend::{BackendError, DecisionBackend};
use crate::ports::observer::ConversationObserver;
use crate::ports::selection_strategy::{SelectionError, SelectionStrategy};
use crate::ports::tool_executor::ToolExecutorPort;
use crate::use_cases::invoke_capability::CapabilityInvoker;
use crate::use_cases::participant_turn::{ParticipantTurn, TurnRecord};
use crate::use_cases::select_speaker::TurnSelector;
use crew_domain::core::string::one_line;
use crew_domain::{
    EnginePhase, History, Message, Roster, Task, TerminationEvaluator, TerminationReason,
};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// What went wrong inside the turn cycle
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineErrorKind {
    #[error("Selection error: {0}")]
    Selection(#[from] SelectionError),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Cancelled")]
    Cancelled,
}

/// A fatal engine error with a snapshot of where it happened
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind} (during {phase}, after {history_len} messages)")]
pub struct EngineError {
    pub phase: EnginePhase,
    #[source]
    pub kind: EngineErrorKind,
    pub history_len: usize,
    pub last_message: Option<Message>,
}

impl EngineError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self.kind, EngineErrorKind::Cancelled)
    }
}

/// Result of one task
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskOutcome {
    /// Task name
    pub task: String,
    pub reason: TerminationReason,
    /// Sequence number of the task's prompt message
    pub first_sequence: usize,
    /// Messages appended for this task, prompt included
    pub messages_appended: usize,
    /// Participant turns taken
    pub turns: usize,
}

impl TaskOutcome {
    pub fn is_escalation(&self) -> bool {
        self.reason.is_escalation()
    }
}

/// The turn-cycle state machine
pub struct ConversationEngine {
    roster: Arc<Roster>,
    selector: TurnSelector,
    turn: ParticipantTurn,
    termination: TerminationEvaluator,
    params: EngineParams,
    history: History,
    phase: EnginePhase,
    cancellation_token: CancellationToken,
    logger: Arc<dyn ConversationLogger>,
}

impl ConversationEngine {
    pub fn new(
        roster: Arc<Roster>,
        backend: Arc<dyn DecisionBackend>,
        executor: Arc<dyn ToolExecutorPort>,
        strategy: Arc<dyn SelectionStrategy>,
        params: EngineParams,
    ) -> Self {
        let selector = TurnSelector::new(Arc::clone(&roster), strategy)
            .with_allow_repeated_speaker(params.allow_repeated_speaker);
        let turn = ParticipantTurn::new(backend, CapabilityInvoker::new(executor))
            .with_timeout(params.backend_timeout);
        Self {
            roster,
            selector,
            turn,
            termination: params.termination(),
            params,
            history: History::new(),
            phase: EnginePhase::Idle,
            cancellation_token: CancellationToken::new(),
            logger: Arc::new(NoConversationLogger),
        }
    }

    // ==================== Builder Methods ====================

    /// Replace the stop conditions built from the parameters
    pub fn with_termination(mut self, termination: TerminationEvaluator) -> Self {
        self.termination = termination;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = token;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    // ==================== Accessors ====================

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation_token.clone()
    }

    // ==================== Turn Cycle ====================

    /// Submit `task` and run turns until a stop condition fires.
    ///
    /// The history keeps everything from earlier tasks. On error the
    /// history holds every message appended before the failure; the
    /// failing turn appends nothing.
    pub async fn run_task(
        &mut self,
        task: &Task,
        observer: &dyn ConversationObserver,
    ) -> Result<TaskOutcome, EngineError> {
        // A previous task may have stopped or failed in any phase
        self.phase = EnginePhase::Idle;

        info!("Starting task {}", task.name());
        let prompt = self.history.begin_task(task.render()).clone();
        let first_sequence = prompt.sequence();
        self.logger.log(ConversationEvent::task_started(
            self.history.task_count() - 1,
            task.name(),
            prompt.content(),
        ));
        self.logger.log(ConversationEvent::message(&prompt));
        observer.on_message(&prompt);

        let mut turns = 0;
        loop {
            if self.cancellation_token.is_cancelled() {
                warn!("Task {} cancelled after {} turns", task.name(), turns);
                return Err(self.error(EngineErrorKind::Cancelled));
            }

            let record = self.take_turn(observer).await?;
            turns += 1;

            self.transition(EnginePhase::Appending);
            let message = self.history.append(record.draft).clone();
            info!(
                "#{} {}: {}",
                message.sequence(),
                message.source(),
                one_line(message.content(), 80)
            );
            self.logger.log(ConversationEvent::message(&message));
            observer.on_message(&message);

            self.transition(EnginePhase::Evaluating);
            if let Some(ambiguity) = self.termination.ambiguity(&self.history) {
                warn!("{}", ambiguity);
            }
            if let Some(reason) = self.termination.should_stop(&self.history) {
                self.transition(EnginePhase::Terminated);
                info!("Task {} stopped: {}", task.name(), reason);
                self.logger.log(ConversationEvent::termination(&reason));
                observer.on_termination(&reason);
                return Ok(TaskOutcome {
                    task: task.name().to_string(),
                    reason,
                    first_sequence,
                    messages_appended: self.history.len() - first_sequence,
                    turns,
                });
            }
        }
    }

    /// Selecting and Executing for one turn
    async fn take_turn(
        &mut self,
        observer: &dyn ConversationObserver,
    ) -> Result<TurnRecord, EngineError> {
        self.transition(EnginePhase::Selecting);
        let selection = match self.selector.select(&self.history).await {
            Ok(selection) => selection,
            Err(e) => return Err(self.error(e.into())),
        };
        debug!("{} selected by {}", selection.speaker, selection.method);
        self.logger.log(ConversationEvent::speaker_selected(
            selection.speaker.as_str(),
            selection.method.as_str(),
        ));
        observer.on_speaker_selected(&selection);

        self.transition(EnginePhase::Executing);
        let Some(participant) = self.roster.get(&selection.speaker) else {
            return Err(self.error(
                SelectionError::UnknownParticipant(selection.speaker.to_string()).into(),
            ));
        };
        let visible = self.history.window(self.params.history_window);
        let record = match self.turn.run(participant, visible).await {
            Ok(record) => record,
            Err(e) => return Err(self.error(e.into())),
        };

        if let Some(result) = record.tool_result() {
            self.logger
                .log(ConversationEvent::tool_result(record.speaker.as_str(), result));
            observer.on_tool_result(&record.speaker, result);
        }
        Ok(record)
    }

    fn transition(&mut self, next: EnginePhase) {
        debug_assert!(
            self.phase.can_transition_to(next),
            "illegal phase transition {} -> {}",
            self.phase,
            next
        );
        self.phase = next;
    }

    fn error(&self, kind: EngineErrorKind) -> EngineError {
        EngineError {
            phase: self.phase,
            kind,
            history_len: self.history.len(),
            last_message: self.history.last().cloned(),
        }
    }
}
