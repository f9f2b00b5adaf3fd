//! Stop predicates
//!
//! Each condition is a pure function of the full history: nothing is
//! remembered between calls, so evaluating the same history twice always
//! gives the same answer.

use crate::conversation::history::History;
use crate::conversation::message::MessageStatus;
use serde::{Deserialize, Serialize};

/// Keyword the leader ends with when every task is complete
pub const TERMINATE_KEYWORD: &str = "TERMINATE";
/// Keyword the leader ends with when handing an unresolved issue upward
pub const ESCALATE_KEYWORD: &str = "ESCALATE";

/// Precedence class of a condition; lower fires first when several match
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConditionKind {
    Status,
    Keyword,
    Count,
}

/// Why a run stopped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TerminationReason {
    /// The last message carried a final structured status
    Status { status: MessageStatus },
    /// The last message mentioned a stop keyword
    Keyword {
        keyword: String,
        outcome: MessageStatus,
    },
    /// The message-count safety bound was reached
    MaxMessages { limit: usize, count: usize },
}

impl TerminationReason {
    /// The outcome this reason signals; `None` for the count bound.
    pub fn outcome(&self) -> Option<MessageStatus> {
        match self {
            TerminationReason::Status { status } => Some(*status),
            TerminationReason::Keyword { outcome, .. } => Some(*outcome),
            TerminationReason::MaxMessages { .. } => None,
        }
    }

    pub fn is_escalation(&self) -> bool {
        self.outcome() == Some(MessageStatus::Escalate)
    }

    pub fn is_limit(&self) -> bool {
        matches!(self, TerminationReason::MaxMessages { .. })
    }
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::Status { status } => write!(f, "Status '{}' reported", status),
            TerminationReason::Keyword { keyword, .. } => write!(f, "{}", keyword),
            TerminationReason::MaxMessages { limit, count } => write!(
                f,
                "Maximum number of messages {} reached, current message count: {}",
                limit, count
            ),
        }
    }
}

/// A stateless stop predicate over the history
pub trait TerminationCondition: std::fmt::Debug + Send + Sync {
    /// Return a reason when the run should stop after the latest append.
    fn check(&self, history: &History) -> Option<TerminationReason>;

    /// Precedence class used when several conditions fire together.
    fn kind(&self) -> ConditionKind;

    /// Keyword this condition scans for, if it is a keyword condition.
    fn keyword(&self) -> Option<&str> {
        None
    }
}

/// Stops when the most recent message contains `keyword` verbatim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMention {
    keyword: String,
    outcome: MessageStatus,
}

impl TextMention {
    /// A keyword signalling successful completion.
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            outcome: MessageStatus::Success,
        }
    }

    /// A keyword signalling escalation.
    pub fn escalate(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            outcome: MessageStatus::Escalate,
        }
    }
}

impl TerminationCondition for TextMention {
    fn check(&self, history: &History) -> Option<TerminationReason> {
        let last = history.last()?;
        last.content()
            .contains(&self.keyword)
            .then(|| TerminationReason::Keyword {
                keyword: self.keyword.clone(),
                outcome: self.outcome,
            })
    }

    fn kind(&self) -> ConditionKind {
        ConditionKind::Keyword
    }

    fn keyword(&self) -> Option<&str> {
        Some(&self.keyword)
    }
}

/// Which messages count toward a [`MaxMessages`] limit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountScope {
    /// Every message since the first task of the run
    #[default]
    Run,
    /// Messages since the latest task prompt, inclusive
    Task,
}

/// Stops when the number of messages reaches `limit`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaxMessages {
    limit: usize,
    scope: CountScope,
}

impl MaxMessages {
    /// Limit over the whole run. A limit of zero is treated as one.
    pub fn new(limit: usize) -> Self {
        Self {
            limit: limit.max(1),
            scope: CountScope::Run,
        }
    }

    pub fn with_scope(mut self, scope: CountScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl TerminationCondition for MaxMessages {
    fn check(&self, history: &History) -> Option<TerminationReason> {
        let count = match self.scope {
            CountScope::Run => history.len(),
            CountScope::Task => history.current_task().len(),
        };
        (count >= self.limit).then_some(TerminationReason::MaxMessages {
            limit: self.limit,
            count,
        })
    }

    fn kind(&self) -> ConditionKind {
        ConditionKind::Count
    }
}

/// Stops when the most recent message carries a final [`MessageStatus`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusSignal;

impl TerminationCondition for StatusSignal {
    fn check(&self, history: &History) -> Option<TerminationReason> {
        let status = history.last()?.status();
        status
            .is_final()
            .then_some(TerminationReason::Status { status })
    }

    fn kind(&self) -> ConditionKind {
        ConditionKind::Status
    }
}
