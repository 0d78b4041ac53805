//! End-of-break notification: terminal bell plus the `break-complete` hook.

use std::io::Write;

use breaktime_core::{NotificationSink, SchedulerSnapshot};
use breaktime_hooks::HookKind;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::hooks::HookRunner;

const BELL: &[u8] = b"\x07";

/// [`NotificationSink`] that rings the terminal bell and runs `break-complete`.
///
/// Never fails: a bell that cannot be written is logged and ignored.
pub struct HookNotifier {
    hooks: HookRunner,
    bell: bool,
    snapshots: watch::Receiver<SchedulerSnapshot>,
}

impl HookNotifier {
    /// Notifier using `hooks`; rings the bell when `bell` is set.
    #[must_use]
    pub const fn new(
        hooks: HookRunner,
        bell: bool,
        snapshots: watch::Receiver<SchedulerSnapshot>,
    ) -> Self {
        Self {
            hooks,
            bell,
            snapshots,
        }
    }
}

impl NotificationSink for HookNotifier {
    fn notify_break_ending(&mut self) {
        let (kind, duration) = {
            let snapshot = self.snapshots.borrow();
            let kind = snapshot.state.active_kind;
            (kind, snapshot.config.track(kind).duration_secs)
        };
        info!(%kind, "break complete");

        if self.bell {
            let mut stderr = std::io::stderr();
            if let Err(err) = stderr.write_all(BELL).and_then(|()| stderr.flush()) {
                debug!(error = %err, "could not ring terminal bell");
            }
        }
        self.hooks.fire(HookKind::BreakComplete, kind, duration);
    }
}
