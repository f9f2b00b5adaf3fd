//! Termination domain.
//!
//! Stop predicates ([`TextMention`], [`MaxMessages`], [`StatusSignal`]) and
//! the [`TerminationEvaluator`] that ORs them together. Conditions compose
//! with `|`:
//!
//! ```
//! use crew_domain::termination::{MaxMessages, TextMention};
//!
//! let evaluator = TextMention::new("TERMINATE")
//!     | MaxMessages::new(6)
//!     | TextMention::escalate("ESCALATE");
//! assert_eq!(evaluator.len(), 3);
//! ```

pub mod condition;
pub mod evaluator;

pub use condition::{
    ConditionKind, CountScope, ESCALATE_KEYWORD, MaxMessages, StatusSignal, TERMINATE_KEYWORD,
    TerminationCondition, TerminationReason, TextMention,
};
pub use evaluator::{TerminationAmbiguity, TerminationEvaluator};
