//! Run-boundary hooks
//!
//! Fired once before the first task and once after the last one, whatever
//! the outcome. Adapters map them onto telemetry (tracing spans, metrics).

/// Callbacks around a whole multi-task run
pub trait RunHooks: Send + Sync {
    fn on_run_start(&self, task_count: usize);

    /// `summary` is a one-line human-readable description of the outcome.
    fn on_run_end(&self, success: bool, summary: &str);
}

/// No-op hooks
pub struct NoRunHooks;

impl RunHooks for NoRunHooks {
    fn on_run_start(&self, _task_count: usize) {}
    fn on_run_end(&self, _success: bool, _summary: &str) {}
}
