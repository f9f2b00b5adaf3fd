//! Run hooks that report run boundaries through `tracing`.

use crew_application::ports::run_hooks::RunHooks;
use std::sync::Mutex;
use std::time::Instant;
use tracing::{info, warn};

/// Emits one event when a run starts and one when it ends, with the
/// elapsed wall-clock time.
#[derive(Default)]
pub struct TracingRunHooks {
    started: Mutex<Option<Instant>>,
}

impl TracingRunHooks {
    pub fn new() -> Self {
        Self::default()
    }

    fn elapsed_ms(&self) -> Option<u128> {
        self.started
            .lock()
            .ok()
            .and_then(|started| started.map(|s| s.elapsed().as_millis()))
    }
}

impl RunHooks for TracingRunHooks {
    fn on_run_start(&self, task_count: usize) {
        if let Ok(mut started) = self.started.lock() {
            *started = Some(Instant::now());
        }
        info!(task_count, "Run started");
    }

    fn on_run_end(&self, success: bool, summary: &str) {
        let elapsed_ms = self.elapsed_ms().unwrap_or_default();
        if success {
            info!(elapsed_ms, %summary, "Run finished");
        } else {
            warn!(elapsed_ms, %summary, "Run failed");
        }
    }
}
