//! [`TimerDriver`] backed by tokio interval tasks.

use std::collections::HashMap;
use std::time::Duration;

use breaktime_core::{TimerDriver, TimerKind};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// One timer firing, tagged with the generation it was scheduled under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFiring {
    /// Which timer fired.
    pub timer: TimerKind,
    /// Schedule generation; stale once the timer is cancelled or rescheduled.
    pub generation: u64,
}

struct Armed {
    generation: u64,
    task: JoinHandle<()>,
}

/// Spawns one interval task per scheduled timer and forwards firings over a channel.
///
/// Aborting a task does not retract firings already queued in the channel, so
/// the receiver must drop any firing for which [`TokioTimers::is_current`] is false.
/// Must be used from inside a tokio runtime.
pub struct TokioTimers {
    firings: mpsc::UnboundedSender<TimerFiring>,
    armed: HashMap<TimerKind, Armed>,
    next_generation: u64,
}

impl TokioTimers {
    /// Timers that deliver firings to `firings`.
    #[must_use]
    pub fn new(firings: mpsc::UnboundedSender<TimerFiring>) -> Self {
        Self {
            firings,
            armed: HashMap::new(),
            next_generation: 0,
        }
    }

    /// Whether `firing` belongs to the live schedule of its timer.
    #[must_use]
    pub fn is_current(&self, firing: TimerFiring) -> bool {
        self.armed
            .get(&firing.timer)
            .is_some_and(|armed| armed.generation == firing.generation)
    }

    /// Whether `timer` is scheduled.
    #[must_use]
    pub fn is_scheduled(&self, timer: TimerKind) -> bool {
        self.armed.contains_key(&timer)
    }
}

impl TimerDriver for TokioTimers {
    fn schedule(&mut self, timer: TimerKind, period: Duration) {
        self.cancel(timer);
        self.next_generation += 1;
        let generation = self.next_generation;
        let firings = self.firings.clone();

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if firings.send(TimerFiring { timer, generation }).is_err() {
                    break;
                }
            }
        });
        self.armed.insert(timer, Armed { generation, task });
    }

    fn cancel(&mut self, timer: TimerKind) {
        if let Some(armed) = self.armed.remove(&timer) {
            armed.task.abort();
        }
    }
}

impl Drop for TokioTimers {
    fn drop(&mut self) {
        for armed in self.armed.values() {
            armed.task.abort();
        }
    }
}
