//! Engine parameters — turn loop control.
//!
//! [`EngineParams`] groups the static parameters that control the turn loop
//! in [`ConversationEngine`](crate::use_cases::run_conversation::ConversationEngine).
//! These are application-layer concerns, not domain policy.

use crew_domain::{
    CountScope, MaxMessages, StatusSignal, TerminationEvaluator, TextMention,
    termination::{ESCALATE_KEYWORD, TERMINATE_KEYWORD},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Turn loop control parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineParams {
    /// Message-count safety bound.
    pub max_messages: usize,
    /// Which messages count toward `max_messages`.
    pub count_scope: CountScope,
    /// Whether the fallback strategy may pick the previous speaker again.
    pub allow_repeated_speaker: bool,
    /// Number of most recent messages shown to participants and the
    /// selector. `None` shows the whole history.
    pub history_window: Option<usize>,
    /// Timeout applied to every decision backend call.
    pub backend_timeout: Option<Duration>,
    /// Keywords signalling successful completion, in registration order.
    pub success_keywords: Vec<String>,
    /// Keywords signalling escalation, in registration order.
    pub escalate_keywords: Vec<String>,
    /// Whether a structured final status on a message stops the task.
    pub use_status: bool,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            max_messages: 6,
            count_scope: CountScope::Run,
            allow_repeated_speaker: true,
            history_window: None,
            backend_timeout: None,
            success_keywords: vec![TERMINATE_KEYWORD.to_string()],
            escalate_keywords: vec![ESCALATE_KEYWORD.to_string()],
            use_status: true,
        }
    }
}

impl EngineParams {
    // ==================== Builder Methods ====================

    pub fn with_max_messages(mut self, max: usize) -> Self {
        self.max_messages = max;
        self
    }

    pub fn with_count_scope(mut self, scope: CountScope) -> Self {
        self.count_scope = scope;
        self
    }

    pub fn with_allow_repeated_speaker(mut self, allow: bool) -> Self {
        self.allow_repeated_speaker = allow;
        self
    }

    pub fn with_history_window(mut self, window: Option<usize>) -> Self {
        self.history_window = window;
        self
    }

    pub fn with_backend_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.backend_timeout = timeout;
        self
    }

    pub fn with_success_keywords(mut self, keywords: Vec<String>) -> Self {
        self.success_keywords = keywords;
        self
    }

    pub fn with_escalate_keywords(mut self, keywords: Vec<String>) -> Self {
        self.escalate_keywords = keywords;
        self
    }

    pub fn with_use_status(mut self, use_status: bool) -> Self {
        self.use_status = use_status;
        self
    }

    /// Build the stop conditions these parameters describe.
    ///
    /// Registration order is status, success keywords, the count bound,
    /// then escalate keywords. Precedence between kinds is fixed by the
    /// evaluator; the order only breaks ties between keywords.
    pub fn termination(&self) -> TerminationEvaluator {
        let mut evaluator = TerminationEvaluator::new();
        if self.use_status {
            evaluator = evaluator.with(StatusSignal);
        }
        for keyword in &self.success_keywords {
            evaluator = evaluator.with(TextMention::new(keyword.clone()));
        }
        evaluator = evaluator.with(MaxMessages::new(self.max_messages).with_scope(self.count_scope));
        for keyword in &self.escalate_keywords {
            evaluator = evaluator.with(TextMention::escalate(keyword.clone()));
        }
        evaluator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = EngineParams::default();
        assert_eq!(params.max_messages, 6);
        assert_eq!(params.count_scope, CountScope::Run);
        assert!(params.allow_repeated_speaker);
        assert!(params.history_window.is_none());
        assert!(params.backend_timeout.is_none());
        assert_eq!(params.termination().len(), 4);
    }

    #[test]
    fn test_builder() {
        let params = EngineParams::default()
            .with_max_messages(10)
            .with_history_window(Some(8))
            .with_backend_timeout(Some(Duration::from_secs(30)))
            .with_use_status(false)
            .with_escalate_keywords(vec![]);

        assert_eq!(params.max_messages, 10);
        assert_eq!(params.history_window, Some(8));
        assert_eq!(params.backend_timeout, Some(Duration::from_secs(30)));
        // TERMINATE + count bound
        assert_eq!(params.termination().len(), 2);
    }
}
