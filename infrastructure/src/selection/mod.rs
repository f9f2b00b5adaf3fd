//! Deterministic selection strategies
//!
//! Neither strategy calls a backend, which makes them suitable for offline
//! runs and for pinning down a conversation in tests. The model-backed
//! strategy lives in the application layer.

mod delegation;
mod round_robin;

pub use delegation::{Assignment, DelegationStrategy, parse_assignments};
pub use round_robin::RoundRobinStrategy;
