//! Participant turn: act, then reflect.
//!
//! A turn runs at most two generations. The first may request a single
//! capability; its result is fed back on a private scratch context (never
//! the shared history) and the participant is asked again for its final
//! text. Participants that do not reflect report the tool summary instead.
//!
//! ```text
//! generate ──▶ Text ─────────────────────────────────────────────▶ draft
//!    │
//!    └────▶ ToolCall ──▶ invoke ──┬─ reflect ──▶ generate ──▶ Text ─▶ draft
//!                                 └─ no reflect ──────────────────▶ summary
//! ```

use crate::ports::decision_backend::{BackendError, DecisionBackend};
use crate::use_cases::invoke_capability::CapabilityInvoker;
use crate::use_cases::shared::generate_with_timeout;
use crew_domain::{
    ContextMessage, Generation, GenerationContext, Message, MessageDraft, MessageStatus,
    Participant, ParticipantId, Requester, ToolCall, ToolError, ToolResult,
    tool::ISSUE_REPORTED_KEY,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// One explicit step of a turn
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum TurnStep {
    /// A capability was requested and invoked
    Invoke { call: ToolCall, result: ToolResult },
    /// The final message text was produced
    Finalize {
        /// Whether the text came from a reflection generation (as opposed
        /// to a direct answer or the tool summary)
        reflected: bool,
    },
}

/// Everything that happened in one turn
#[derive(Debug, Clone, PartialEq)]
pub struct TurnRecord {
    pub speaker: ParticipantId,
    pub steps: Vec<TurnStep>,
    /// The message to append
    pub draft: MessageDraft,
}

impl TurnRecord {
    /// The tool result of this turn, if a capability was invoked
    pub fn tool_result(&self) -> Option<&ToolResult> {
        self.steps.iter().find_map(|step| match step {
            TurnStep::Invoke { result, .. } => Some(result),
            TurnStep::Finalize { .. } => None,
        })
    }
}

/// Executes participant turns against the shared backend
pub struct ParticipantTurn {
    backend: Arc<dyn DecisionBackend>,
    invoker: CapabilityInvoker,
    timeout: Option<Duration>,
}

impl ParticipantTurn {
    pub fn new(backend: Arc<dyn DecisionBackend>, invoker: CapabilityInvoker) -> Self {
        Self {
            backend,
            invoker,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run one turn for `participant`, who sees `visible` as the history.
    pub async fn run(
        &self,
        participant: &Participant,
        visible: &[Message],
    ) -> Result<TurnRecord, BackendError> {
        let speaker = participant.id().clone();
        let tools = participant
            .tools()
            .sorted()
            .into_iter()
            .cloned()
            .collect();
        let mut context = GenerationContext::new(
            Requester::Participant(speaker.clone()),
            participant.system_prompt(),
        )
        .with_history(visible)
        .with_tools(tools);

        let call = match self.generate(&context).await? {
            Generation::Text { content, status } => {
                debug!("{} answered directly", speaker);
                return Ok(TurnRecord {
                    draft: MessageDraft::from_participant(speaker.clone(), content)
                        .with_status(status.unwrap_or_default()),
                    speaker,
                    steps: vec![TurnStep::Finalize { reflected: false }],
                });
            }
            Generation::ToolCall(call) => call,
        };

        let result = if participant.has_tools() {
            self.invoker.invoke(participant, &call).await
        } else {
            warn!("{} has no tools but requested {}", speaker, call.tool_name);
            ToolResult::failure(
                &call.tool_name,
                ToolError::not_found(&call.tool_name)
                    .with_details(format!("{} has no tools", speaker)),
            )
        };
        let summary = result.summary();
        let mut steps = vec![TurnStep::Invoke {
            call: call.clone(),
            result: result.clone(),
        }];

        let (content, status, reflected) = if participant.reflects_on_tool_use() {
            context.push(ContextMessage::tool_request(call.clone()));
            context.push(ContextMessage::tool_result(call.id.clone(), summary.clone()));
            // Only one invocation per turn: nothing more is offered
            context.tools.clear();

            match self.generate(&context).await? {
                Generation::Text { content, status } => (content, status, true),
                Generation::ToolCall(extra) => {
                    warn!(
                        "{} requested {} while reflecting; using the tool summary",
                        speaker, extra.tool_name
                    );
                    (summary, None, false)
                }
            }
        } else {
            (summary, None, false)
        };
        steps.push(TurnStep::Finalize { reflected });

        let mut draft = MessageDraft::from_participant(speaker.clone(), content)
            .with_status(status.unwrap_or(MessageStatus::Continue));
        if let Some(issue) = result.reported_issue() {
            let marker = format!("{}: {}", ISSUE_REPORTED_KEY, issue);
            if !draft.content.contains(&marker) {
                draft.content = format!("{}\n\n{}", draft.content.trim_end(), marker);
            }
            draft = draft.with_issue(issue);
        }

        Ok(TurnRecord {
            speaker,
            steps,
            draft,
        })
    }

    async fn generate(&self, context: &GenerationContext) -> Result<Generation, BackendError> {
        generate_with_timeout(self.backend.as_ref(), context, self.timeout).await
    }
}
