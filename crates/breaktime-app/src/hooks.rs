//! Fire-and-forget execution of break lifecycle hooks.

use std::sync::Arc;

use breaktime_core::BreakKind;
use breaktime_hooks::{HookContext, HookExecutor, HookKind};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

/// Runs hook scripts on the blocking pool and logs their outcome.
#[derive(Debug, Clone)]
pub struct HookRunner {
    executor: Arc<HookExecutor>,
}

impl HookRunner {
    /// Runner over `executor`.
    #[must_use]
    pub fn new(executor: HookExecutor) -> Self {
        Self {
            executor: Arc::new(executor),
        }
    }

    /// Runner that never executes anything.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(HookExecutor::disabled())
    }

    /// Start `hook` for a break of `kind` lasting `duration_secs`.
    ///
    /// Returns immediately. A missing script is expected and only traced; any
    /// other failure is logged as a warning. Must be called inside a tokio runtime.
    pub fn fire(&self, hook: HookKind, kind: BreakKind, duration_secs: f64) -> JoinHandle<()> {
        let executor = Arc::clone(&self.executor);
        let context = HookContext::new(hook, kind, duration_secs);
        let name = hook.script_name();
        tokio::task::spawn_blocking(move || match executor.run(hook, &context) {
            Ok(result) if result.skipped => trace!(hook = name, "hook disabled"),
            Ok(_) => debug!(hook = name, %kind, "hook finished"),
            Err(err) if err.is_not_found() => trace!(hook = name, "no hook script"),
            Err(err) => warn!(hook = name, %kind, error = %err, "hook failed"),
        })
    }
}

impl Default for HookRunner {
    fn default() -> Self {
        Self::disabled()
    }
}
