//! Decision backend port
//!
//! Defines the interface for whatever produces participant replies and
//! selector answers: a hosted chat model, a scripted stand-in, or a stub.

use async_trait::async_trait;
use crew_domain::session::{Generation, GenerationContext};
use thiserror::Error;

/// Errors that can occur during a generation call
///
/// Every variant is fatal to the current turn. The engine does not retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("Backend timed out")]
    Timeout,

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

/// Source of model decisions
///
/// One instance is injected into the engine and shared by every participant
/// and the model-backed selection strategy. Implementations (adapters) live
/// in the infrastructure layer.
#[async_trait]
pub trait DecisionBackend: Send + Sync {
    /// Produce the next generation for the given context
    async fn generate(&self, context: &GenerationContext) -> Result<Generation, BackendError>;

    /// Short name used in logs
    fn name(&self) -> &str {
        "backend"
    }
}
