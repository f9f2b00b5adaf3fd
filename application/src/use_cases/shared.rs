//! Shared utilities for use cases.
//!
//! Timeout-aware backend calls used by both the participant turn and the
//! model-backed selection strategy.

use crate::ports::decision_backend::{BackendError, DecisionBackend};
use crew_domain::session::{Generation, GenerationContext};
use std::time::Duration;
use tracing::warn;

/// Call the backend, failing with [`BackendError::Timeout`] when `timeout`
/// elapses first.
pub(crate) async fn generate_with_timeout(
    backend: &dyn DecisionBackend,
    context: &GenerationContext,
    timeout: Option<Duration>,
) -> Result<Generation, BackendError> {
    match timeout {
        Some(limit) => match tokio::time::timeout(limit, backend.generate(context)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    "{} did not answer for {} within {:?}",
                    backend.name(),
                    context.requester,
                    limit
                );
                Err(BackendError::Timeout)
            }
        },
        None => backend.generate(context).await,
    }
}
