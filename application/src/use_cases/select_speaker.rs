//! Turn selection.
//!
//! [`TurnSelector`] applies the leader override rule first and asks the
//! pluggable [`SelectionStrategy`] only when the leader spoke last.
//! [`ModelSelectionStrategy`] is the strategy that asks the decision
//! backend, using the selector prompt.

use crate::ports::decision_backend::{BackendError, DecisionBackend};
use crate::ports::selection_strategy::{SelectionError, SelectionStrategy};
use crate::use_cases::shared::generate_with_timeout;
use async_trait::async_trait;
use crew_domain::selection::candidates;
use crew_domain::{
    ContextMessage, Generation, GenerationContext, History, LeaderOverride, ParticipantId,
    Requester, Roster, Selection, SelectionMethod, SelectorPrompt, SpeakerDecision,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Chooses who speaks next
pub struct TurnSelector {
    roster: Arc<Roster>,
    strategy: Arc<dyn SelectionStrategy>,
    allow_repeated_speaker: bool,
}

impl TurnSelector {
    pub fn new(roster: Arc<Roster>, strategy: Arc<dyn SelectionStrategy>) -> Self {
        Self {
            roster,
            strategy,
            allow_repeated_speaker: true,
        }
    }

    pub fn with_allow_repeated_speaker(mut self, allow: bool) -> Self {
        self.allow_repeated_speaker = allow;
        self
    }

    /// Pick the next speaker for `history`.
    ///
    /// The override rule can never be bypassed by the strategy: the leader
    /// is returned without consulting it whenever the last message did not
    /// come from the leader.
    pub async fn select(&self, history: &History) -> Result<Selection, SelectionError> {
        if let SpeakerDecision::Speaker(leader) = LeaderOverride::apply(&self.roster, history) {
            debug!("override: {} takes the floor", leader);
            return Ok(Selection::new(leader, SelectionMethod::Override));
        }

        let candidates = candidates(&self.roster, history, self.allow_repeated_speaker);
        let choice = self
            .strategy
            .select(&self.roster, &candidates, history)
            .await?;

        match choice {
            None => self.fallback(&candidates),
            Some(id) if !self.roster.contains(&id) => {
                Err(SelectionError::UnknownParticipant(id.to_string()))
            }
            Some(id) if !candidates.contains(&id) => {
                Err(SelectionError::NotACandidate(id.to_string()))
            }
            Some(id) => {
                debug!("{} picked {}", self.strategy.name(), id);
                Ok(Selection::new(id, SelectionMethod::Strategy))
            }
        }
    }

    /// The strategy had no answer: the leader if it is still a candidate,
    /// otherwise the first remaining candidate in roster order.
    fn fallback(&self, candidates: &[ParticipantId]) -> Result<Selection, SelectionError> {
        let leader = self.roster.leader();
        if candidates.contains(leader) {
            debug!("{} had no choice; falling back to the leader", self.strategy.name());
            return Ok(Selection::new(leader.clone(), SelectionMethod::DefaultLeader));
        }
        let first = candidates.first().ok_or(SelectionError::NoCandidates)?;
        debug!(
            "{} had no choice and {} may not repeat; falling back to {}",
            self.strategy.name(),
            leader,
            first
        );
        Ok(Selection::new(first.clone(), SelectionMethod::FirstCandidate))
    }
}

// ==================== Model Selection Strategy ====================

/// Asks the decision backend to name the next speaker
///
/// The earliest candidate name mentioned in the reply wins. A reply that
/// names no candidate yields `None`.
pub struct ModelSelectionStrategy {
    backend: Arc<dyn DecisionBackend>,
    prompt: SelectorPrompt,
    history_window: Option<usize>,
    timeout: Option<Duration>,
}

impl ModelSelectionStrategy {
    pub fn new(backend: Arc<dyn DecisionBackend>) -> Self {
        Self {
            backend,
            prompt: SelectorPrompt::default(),
            history_window: None,
            timeout: None,
        }
    }

    pub fn with_prompt(mut self, prompt: SelectorPrompt) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn with_history_window(mut self, window: Option<usize>) -> Self {
        self.history_window = window;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Position of the first whole-word mention of each candidate; the
    /// smallest wins. Longer names win ties so `Robot2` beats `Robot`.
    fn earliest_mention(reply: &str, candidates: &[ParticipantId]) -> Option<ParticipantId> {
        candidates
            .iter()
            .filter_map(|id| Self::find_word(reply, id.as_str()).map(|pos| (pos, id)))
            .min_by(|(a_pos, a), (b_pos, b)| {
                a_pos
                    .cmp(b_pos)
                    .then_with(|| b.as_str().len().cmp(&a.as_str().len()))
            })
            .map(|(_, id)| id.clone())
    }

    fn find_word(haystack: &str, word: &str) -> Option<usize> {
        let is_word_char = |c: char| c.is_alphanumeric() || c == '_';
        haystack.match_indices(word).map(|(pos, _)| pos).find(|&pos| {
            let before = haystack[..pos].chars().next_back();
            let after = haystack[pos + word.len()..].chars().next();
            !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
        })
    }
}

#[async_trait]
impl SelectionStrategy for ModelSelectionStrategy {
    async fn select(
        &self,
        roster: &Roster,
        candidates: &[ParticipantId],
        history: &History,
    ) -> Result<Option<ParticipantId>, SelectionError> {
        let prompt = self
            .prompt
            .render(roster, history.window(self.history_window), candidates);
        let context = GenerationContext::new(Requester::Selector, "")
            .with_message(ContextMessage::user(prompt));

        match generate_with_timeout(self.backend.as_ref(), &context, self.timeout).await? {
            Generation::Text { content, .. } => Ok(Self::earliest_mention(&content, candidates)),
            Generation::ToolCall(call) => Err(SelectionError::Backend(
                BackendError::MalformedResponse(format!(
                    "selector requested tool {}",
                    call.tool_name
                )),
            )),
        }
    }

    fn name(&self) -> &'static str {
        "model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crew_domain::{MessageDraft, Participant};
    use std::sync::Mutex;

    // ==================== Test Doubles ====================

    /// Always answers with a fixed id and counts how often it is asked
    struct FixedStrategy {
        answer: Option<&'static str>,
        calls: Mutex<usize>,
    }

    impl FixedStrategy {
        fn new(answer: Option<&'static str>) -> Arc<Self> {
            Arc::new(Self {
                answer,
                calls: Mutex::new(0),
            })
        }
    }

    #[async_trait]
    impl SelectionStrategy for FixedStrategy {
        async fn select(
            &self,
            _roster: &Roster,
            _candidates: &[ParticipantId],
            _history: &History,
        ) -> Result<Option<ParticipantId>, SelectionError> {
            *self.calls.lock().unwrap() += 1;
            Ok(self.answer.map(|name| ParticipantId::try_new(name).unwrap()))
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    struct TextBackend(&'static str);

    #[async_trait]
    impl DecisionBackend for TextBackend {
        async fn generate(&self, _context: &GenerationContext) -> Result<Generation, BackendError> {
            Ok(Generation::text(self.0))
        }
    }

    fn id(name: &str) -> ParticipantId {
        ParticipantId::try_new(name).unwrap()
    }

    fn roster() -> Arc<Roster> {
        Arc::new(
            Roster::new(
                vec![
                    Participant::new(id("Planner"), "Plans"),
                    Participant::new(id("A"), "Does A"),
                    Participant::new(id("B"), "Does B"),
                ],
                id("Planner"),
            )
            .unwrap(),
        )
    }

    fn after_leader() -> History {
        let mut history = History::new();
        history.begin_task("task");
        history.append(MessageDraft::from_participant(id("Planner"), "1. A : work"));
        history
    }

    // ==================== TurnSelector ====================

    #[tokio::test]
    async fn test_override_skips_strategy() {
        let strategy = FixedStrategy::new(Some("B"));
        let selector = TurnSelector::new(roster(), strategy.clone());

        let mut history = History::new();
        history.begin_task("task");
        let selection = selector.select(&history).await.unwrap();

        assert_eq!(selection, Selection::new(id("Planner"), SelectionMethod::Override));
        assert_eq!(*strategy.calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_strategy_used_after_leader() {
        let selector = TurnSelector::new(roster(), FixedStrategy::new(Some("A")));
        let selection = selector.select(&after_leader()).await.unwrap();
        assert_eq!(selection, Selection::new(id("A"), SelectionMethod::Strategy));
    }

    #[tokio::test]
    async fn test_no_choice_defaults_to_leader() {
        let selector = TurnSelector::new(roster(), FixedStrategy::new(None));
        let selection = selector.select(&after_leader()).await.unwrap();
        assert_eq!(selection.speaker, id("Planner"));
        assert_eq!(selection.method, SelectionMethod::DefaultLeader);
    }

    #[tokio::test]
    async fn test_no_choice_skips_leader_when_repeats_disallowed() {
        let selector = TurnSelector::new(roster(), FixedStrategy::new(None))
            .with_allow_repeated_speaker(false);
        let selection = selector.select(&after_leader()).await.unwrap();
        assert_eq!(selection, Selection::new(id("A"), SelectionMethod::FirstCandidate));
    }

    #[tokio::test]
    async fn test_no_candidates_is_fatal() {
        let solo = Arc::new(
            Roster::new(vec![Participant::new(id("Planner"), "Plans")], id("Planner")).unwrap(),
        );
        let selector = TurnSelector::new(solo, FixedStrategy::new(None))
            .with_allow_repeated_speaker(false);

        let mut history = History::new();
        history.begin_task("task");
        history.append(MessageDraft::from_participant(id("Planner"), "plan"));
        let err = selector.select(&history).await.unwrap_err();
        assert_eq!(err, SelectionError::NoCandidates);
    }

    #[tokio::test]
    async fn test_unknown_participant_is_fatal() {
        let selector = TurnSelector::new(roster(), FixedStrategy::new(Some("Ghost")));
        let err = selector.select(&after_leader()).await.unwrap_err();
        assert_eq!(err, SelectionError::UnknownParticipant("Ghost".to_string()));
    }

    #[tokio::test]
    async fn test_repeated_speaker_rejected_when_disallowed() {
        let selector = TurnSelector::new(roster(), FixedStrategy::new(Some("Planner")))
            .with_allow_repeated_speaker(false);
        let err = selector.select(&after_leader()).await.unwrap_err();
        assert_eq!(err, SelectionError::NotACandidate("Planner".to_string()));
    }

    // ==================== ModelSelectionStrategy ====================

    #[tokio::test]
    async fn test_model_strategy_picks_earliest_mention() {
        let strategy = ModelSelectionStrategy::new(Arc::new(TextBackend("B should go, not A")));
        let roster = roster();
        let candidates: Vec<ParticipantId> = roster.ids().cloned().collect();

        let choice = strategy
            .select(&roster, &candidates, &after_leader())
            .await
            .unwrap();
        assert_eq!(choice, Some(id("B")));
    }

    #[tokio::test]
    async fn test_model_strategy_without_mention() {
        let strategy = ModelSelectionStrategy::new(Arc::new(TextBackend("nobody")));
        let roster = roster();
        let choice = strategy
            .select(&roster, &[id("A"), id("B")], &after_leader())
            .await
            .unwrap();
        assert!(choice.is_none());
    }

    #[test]
    fn test_earliest_mention_requires_whole_words() {
        let candidates = vec![id("Robot"), id("Robot2")];
        assert_eq!(
            ModelSelectionStrategy::earliest_mention("Robot2 next", &candidates),
            Some(id("Robot2"))
        );
        assert_eq!(
            ModelSelectionStrategy::earliest_mention("RobotX, then Robot", &candidates),
            Some(id("Robot"))
        );
        assert_eq!(ModelSelectionStrategy::earliest_mention("Robots", &candidates), None);
    }
}
