//! [`BreakSurface`] that forwards overlay changes to the presentation layer.

use breaktime_core::{BreakKind, BreakSurface, SchedulerSnapshot};
use breaktime_hooks::HookKind;
use tokio::sync::{mpsc, watch};
use tracing::info;

use crate::hooks::HookRunner;

/// Overlay change delivered to the UI or the headless watcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationEvent {
    /// Show the break overlay.
    Show(BreakKind),
    /// Hide the break overlay.
    Dismiss,
}

/// Sends [`PresentationEvent`]s and runs the `break-start` and `break-end` hooks.
///
/// Break durations for hook context come from the last published snapshot,
/// which always carries the current configuration.
pub struct ChannelSurface {
    events: Option<mpsc::UnboundedSender<PresentationEvent>>,
    hooks: HookRunner,
    snapshots: watch::Receiver<SchedulerSnapshot>,
    showing: Option<BreakKind>,
}

impl ChannelSurface {
    /// Surface publishing to `events` (if any) and running `hooks`.
    #[must_use]
    pub const fn new(
        events: Option<mpsc::UnboundedSender<PresentationEvent>>,
        hooks: HookRunner,
        snapshots: watch::Receiver<SchedulerSnapshot>,
    ) -> Self {
        Self {
            events,
            hooks,
            snapshots,
            showing: None,
        }
    }

    fn emit(&mut self, event: PresentationEvent) {
        let closed = self
            .events
            .as_ref()
            .is_some_and(|events| events.send(event).is_err());
        if closed {
            // Presenter went away; keep scheduling without it.
            self.events = None;
        }
    }

    fn duration_of(&self, kind: BreakKind) -> f64 {
        self.snapshots.borrow().config.track(kind).duration_secs
    }
}

impl BreakSurface for ChannelSurface {
    fn show_break_surface(&mut self, kind: BreakKind) {
        let duration = self.duration_of(kind);
        info!(%kind, duration_secs = duration, "break started");
        self.showing = Some(kind);
        self.emit(PresentationEvent::Show(kind));
        self.hooks.fire(HookKind::BreakStart, kind, duration);
    }

    fn dismiss_break_surface(&mut self) {
        let Some(kind) = self.showing.take() else {
            return;
        };
        info!(%kind, "break ended");
        self.emit(PresentationEvent::Dismiss);
        self.hooks
            .fire(HookKind::BreakEnd, kind, self.duration_of(kind));
    }
}
