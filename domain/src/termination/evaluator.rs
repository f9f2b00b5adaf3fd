//! OR-combinator over stop predicates
//!
//! The evaluator runs strictly after a message has been appended. The first
//! matching condition wins, ordered by [`ConditionKind`] (status, then
//! keywords, then the count bound) and by registration order inside a kind.

use super::condition::{
    ConditionKind, MaxMessages, StatusSignal, TerminationCondition, TerminationReason, TextMention,
};
use crate::conversation::history::History;
use std::ops::BitOr;

/// Several stop keywords matched the same message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminationAmbiguity {
    /// Sequence number of the message that matched
    pub sequence: usize,
    /// Every keyword that matched, in registration order
    pub keywords: Vec<String>,
}

impl std::fmt::Display for TerminationAmbiguity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "message #{} matches several stop keywords: {}",
            self.sequence,
            self.keywords.join(", ")
        )
    }
}

/// Composes independent [`TerminationCondition`]s with logical OR
#[derive(Debug, Default)]
pub struct TerminationEvaluator {
    conditions: Vec<Box<dyn TerminationCondition>>,
}

impl TerminationEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition (builder pattern)
    pub fn with(mut self, condition: impl TerminationCondition + 'static) -> Self {
        self.conditions.push(Box::new(condition));
        self
    }

    pub fn push(&mut self, condition: Box<dyn TerminationCondition>) {
        self.conditions.push(condition);
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Return the reason of the highest-precedence condition that fires.
    pub fn should_stop(&self, history: &History) -> Option<TerminationReason> {
        self.conditions
            .iter()
            .enumerate()
            .filter_map(|(index, condition)| {
                condition
                    .check(history)
                    .map(|reason| ((condition.kind(), index), reason))
            })
            .min_by_key(|(rank, _)| *rank)
            .map(|(_, reason)| reason)
    }

    /// Report when more than one keyword condition matches the last message.
    pub fn ambiguity(&self, history: &History) -> Option<TerminationAmbiguity> {
        let last = history.last()?;
        let keywords: Vec<String> = self
            .conditions
            .iter()
            .filter(|c| c.kind() == ConditionKind::Keyword && c.check(history).is_some())
            .filter_map(|c| c.keyword().map(str::to_string))
            .collect();

        (keywords.len() > 1).then(|| TerminationAmbiguity {
            sequence: last.sequence(),
            keywords,
        })
    }
}

impl<C: TerminationCondition + 'static> BitOr<C> for TerminationEvaluator {
    type Output = TerminationEvaluator;

    fn bitor(self, rhs: C) -> Self::Output {
        self.with(rhs)
    }
}

impl<C: TerminationCondition + 'static> BitOr<C> for TextMention {
    type Output = TerminationEvaluator;

    fn bitor(self, rhs: C) -> Self::Output {
        TerminationEvaluator::new().with(self).with(rhs)
    }
}

impl<C: TerminationCondition + 'static> BitOr<C> for MaxMessages {
    type Output = TerminationEvaluator;

    fn bitor(self, rhs: C) -> Self::Output {
        TerminationEvaluator::new().with(self).with(rhs)
    }
}

impl<C: TerminationCondition + 'static> BitOr<C> for StatusSignal {
    type Output = TerminationEvaluator;

    fn bitor(self, rhs: C) -> Self::Output {
        TerminationEvaluator::new().with(self).with(rhs)
    }
}
