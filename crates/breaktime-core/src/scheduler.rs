use std::time::Duration;

use crate::format::{countdown_progress, format_time};
use crate::kind::BreakKind;
use crate::settings::{SchedulerConfig, SettingsStore};

/// Period of the work clock.
pub const WORK_TICK_PERIOD: Duration = Duration::from_secs(1);
/// Countdown tick rate.
pub const COUNTDOWN_TICKS_PER_SEC: u64 = 60;
/// Period of the countdown clock.
pub const COUNTDOWN_TICK_PERIOD: Duration =
    Duration::from_nanos(1_000_000_000 / COUNTDOWN_TICKS_PER_SEC);
/// Seconds removed from the countdown per countdown tick.
pub const COUNTDOWN_STEP_SECS: f64 = 1.0 / 60.0;

// Absorbs float drift from repeated 1/60 steps so a break of `d` seconds
// ends after exactly `60 * d` ticks.
const COUNTDOWN_EPSILON: f64 = 1e-6;

/// The two periodic activities owned by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// 1 Hz clock accumulating work time.
    Work,
    /// 60 Hz clock depleting the break countdown.
    Countdown,
}

impl TimerKind {
    /// Firing period for this timer.
    #[must_use]
    pub const fn period(self) -> Duration {
        match self {
            Self::Work => WORK_TICK_PERIOD,
            Self::Countdown => COUNTDOWN_TICK_PERIOD,
        }
    }
}

/// Cancellable periodic timers.
///
/// The scheduler always calls [`TimerDriver::cancel`] before
/// [`TimerDriver::schedule`] for the same kind, and never leaves both kinds
/// scheduled at once.
pub trait TimerDriver {
    /// Start firing `timer` every `period` until cancelled.
    fn schedule(&mut self, timer: TimerKind, period: Duration);
    /// Stop `timer`. Cancelling an idle timer is a no-op.
    fn cancel(&mut self, timer: TimerKind);
}

/// Presentation hooks for the full-screen break overlay.
pub trait BreakSurface {
    /// A break of `kind` has started.
    fn show_break_surface(&mut self, kind: BreakKind);
    /// The active break has ended or was skipped.
    fn dismiss_break_surface(&mut self);
}

/// Receives the end-of-countdown cue. Fire-and-forget: failures stay inside the sink.
pub trait NotificationSink {
    /// The countdown of the active break reached zero.
    fn notify_break_ending(&mut self);
}

/// Surface used when nothing is rendered.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSurface;

impl BreakSurface for NoSurface {
    fn show_break_surface(&mut self, _kind: BreakKind) {}
    fn dismiss_break_surface(&mut self) {}
}

/// Sink that ignores notifications.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSink;

impl NotificationSink for SilentSink {
    fn notify_break_ending(&mut self) {}
}

/// Raw scheduler state. Times are in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SchedulerState {
    /// The work clock is wanted.
    pub running: bool,
    /// A break overlay should be shown.
    pub on_break: bool,
    /// Break in progress, or the last one triggered.
    pub active_kind: BreakKind,
    /// Work time since the last eye reset.
    pub eye_elapsed: f64,
    /// Work time since the last stretch reset.
    pub stretch_elapsed: f64,
    /// Time left in the active break. Only meaningful while `on_break`.
    pub countdown_remaining: f64,
}

impl SchedulerState {
    /// Accumulated work time for a track.
    #[must_use]
    pub const fn elapsed(&self, kind: BreakKind) -> f64 {
        match kind {
            BreakKind::Eye => self.eye_elapsed,
            BreakKind::Stretch => self.stretch_elapsed,
        }
    }

    /// Seconds of work left before the track is due, never negative.
    #[must_use]
    pub fn seconds_until_next(&self, kind: BreakKind, config: &SchedulerConfig) -> f64 {
        (config.track(kind).interval_secs - self.elapsed(kind)).max(0.0)
    }

    /// `M:SS` until the track is due.
    #[must_use]
    pub fn time_until_next(&self, kind: BreakKind, config: &SchedulerConfig) -> String {
        format_time(self.seconds_until_next(kind, config))
    }

    /// `M:SS` of the countdown, rounded up to whole seconds.
    #[must_use]
    pub fn countdown_text(&self) -> String {
        format_time(self.countdown_remaining.ceil())
    }

    /// Remaining fraction of the active break in `[0, 1]`.
    #[must_use]
    pub fn countdown_progress(&self, config: &SchedulerConfig) -> f64 {
        countdown_progress(
            self.countdown_remaining,
            config.track(self.active_kind).duration_secs,
        )
    }
}

/// Immutable view handed to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulerSnapshot {
    /// Raw state.
    pub state: SchedulerState,
    /// Configuration resolved at snapshot time.
    pub config: SchedulerConfig,
    /// `M:SS` until the next eye break.
    pub time_until_eye: String,
    /// `M:SS` until the next stretch break.
    pub time_until_stretch: String,
    /// `M:SS` left in the active break.
    pub countdown_text: String,
    /// Remaining fraction of the active break.
    pub countdown_progress: f64,
}

impl SchedulerSnapshot {
    /// Build a snapshot from state and resolved configuration.
    #[must_use]
    pub fn new(state: SchedulerState, config: SchedulerConfig) -> Self {
        Self {
            time_until_eye: state.time_until_next(BreakKind::Eye, &config),
            time_until_stretch: state.time_until_next(BreakKind::Stretch, &config),
            countdown_text: state.countdown_text(),
            countdown_progress: state.countdown_progress(&config),
            state,
            config,
        }
    }

    /// `M:SS` until the given track is due.
    #[must_use]
    pub fn time_until(&self, kind: BreakKind) -> &str {
        match kind {
            BreakKind::Eye => &self.time_until_eye,
            BreakKind::Stretch => &self.time_until_stretch,
        }
    }

    /// Status lines for a menu or status bar.
    #[must_use]
    pub fn status_lines(&self) -> Vec<String> {
        if self.state.on_break {
            return vec![format!(
                "{} break: {} left",
                self.state.active_kind.label(),
                self.countdown_text
            )];
        }
        if !self.state.running {
            return vec!["Paused".to_owned()];
        }
        let mut lines = Vec::with_capacity(2);
        if self.config.eye.enabled {
            lines.push(format!("Eye break in {}", self.time_until_eye));
        }
        if self.config.stretch.enabled {
            lines.push(format!("Stretch in {}", self.time_until_stretch));
        }
        if lines.is_empty() {
            lines.push("All breaks disabled".to_owned());
        }
        lines
    }
}

/// Break-scheduling state machine.
///
/// Owns the state, reads configuration from `S` on every decision, and drives
/// the work and countdown timers through `T`.
pub struct Scheduler<S, T> {
    settings: S,
    timers: T,
    surface: Box<dyn BreakSurface + Send>,
    sink: Box<dyn NotificationSink + Send>,
    state: SchedulerState,
}

impl<S: SettingsStore, T: TimerDriver> Scheduler<S, T> {
    /// Create a stopped scheduler with no surface and a silent sink.
    #[must_use]
    pub fn new(settings: S, timers: T) -> Self {
        Self {
            settings,
            timers,
            surface: Box::new(NoSurface),
            sink: Box::new(SilentSink),
            state: SchedulerState::default(),
        }
    }

    /// Attach the presentation surface.
    #[must_use]
    pub fn with_surface(mut self, surface: Box<dyn BreakSurface + Send>) -> Self {
        self.surface = surface;
        self
    }

    /// Attach the end-of-break notification sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Box<dyn NotificationSink + Send>) -> Self {
        self.sink = sink;
        self
    }

    /// Current raw state.
    #[must_use]
    pub const fn state(&self) -> &SchedulerState {
        &self.state
    }

    /// Configuration as currently stored.
    #[must_use]
    pub fn config(&self) -> SchedulerConfig {
        SchedulerConfig::resolve(&self.settings)
    }

    /// State plus derived display values.
    #[must_use]
    pub fn snapshot(&self) -> SchedulerSnapshot {
        SchedulerSnapshot::new(self.state, self.config())
    }

    /// Settings store.
    #[must_use]
    pub const fn settings(&self) -> &S {
        &self.settings
    }

    /// Mutable settings store. Changes apply on the next decision.
    pub const fn settings_mut(&mut self) -> &mut S {
        &mut self.settings
    }

    /// Timer driver.
    #[must_use]
    pub const fn timers(&self) -> &T {
        &self.timers
    }

    /// Begin a fresh work session.
    pub fn start(&mut self) {
        self.state.running = true;
        self.state.eye_elapsed = 0.0;
        self.state.stretch_elapsed = 0.0;
        self.timers.cancel(TimerKind::Work);
        if !self.state.on_break {
            self.timers.schedule(TimerKind::Work, TimerKind::Work.period());
        }
    }

    /// Stop accumulating work time. A break in progress keeps counting down.
    pub fn pause(&mut self) {
        self.state.running = false;
        self.timers.cancel(TimerKind::Work);
    }

    /// End the active break now. No-op when not on a break.
    pub fn skip_break(&mut self) {
        self.end_break();
    }

    /// Dispatch a timer firing.
    pub fn on_timer(&mut self, timer: TimerKind) {
        match timer {
            TimerKind::Work => self.tick(),
            TimerKind::Countdown => self.countdown_tick(),
        }
    }

    /// Advance the work clock by one second and trigger a break when one is due.
    pub fn tick(&mut self) {
        if !self.state.running || self.state.on_break {
            return;
        }
        self.state.eye_elapsed += 1.0;
        self.state.stretch_elapsed += 1.0;

        let config = self.config();
        let due = BreakKind::BY_PRIORITY.into_iter().find(|&kind| {
            let track = config.track(kind);
            track.enabled && self.state.elapsed(kind) >= track.interval_secs
        });
        if let Some(kind) = due {
            self.trigger_break(kind);
        }
    }

    /// Enter a break of `kind`, restarting the countdown if one is already running.
    pub fn trigger_break(&mut self, kind: BreakKind) {
        self.timers.cancel(TimerKind::Work);

        self.state.active_kind = kind;
        self.state.on_break = true;
        self.state.countdown_remaining = self.config().track(kind).duration_secs;

        self.surface.show_break_surface(kind);

        self.timers.cancel(TimerKind::Countdown);
        self.timers
            .schedule(TimerKind::Countdown, TimerKind::Countdown.period());
    }

    /// Deplete the countdown by one step; ends the break at zero.
    pub fn countdown_tick(&mut self) {
        if !self.state.on_break {
            return;
        }
        self.state.countdown_remaining -= COUNTDOWN_STEP_SECS;
        if self.state.countdown_remaining <= COUNTDOWN_EPSILON {
            self.state.countdown_remaining = 0.0;
            self.sink.notify_break_ending();
            self.end_break();
        }
    }

    /// Leave the active break. No-op when not on a break.
    ///
    /// An eye break resets only the eye clock; a stretch break also counts as
    /// eye rest and resets both.
    pub fn end_break(&mut self) {
        if !self.state.on_break {
            return;
        }
        self.timers.cancel(TimerKind::Countdown);
        self.state.on_break = false;

        self.surface.dismiss_break_surface();

        match self.state.active_kind {
            BreakKind::Eye => self.state.eye_elapsed = 0.0,
            BreakKind::Stretch => {
                self.state.eye_elapsed = 0.0;
                self.state.stretch_elapsed = 0.0;
            }
        }

        if self.state.running {
            self.timers.cancel(TimerKind::Work);
            self.timers.schedule(TimerKind::Work, TimerKind::Work.period());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{MemorySettings, SettingKey, SettingValue};
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Show(BreakKind),
        Dismiss,
        Notify,
    }

    type CallLog = Arc<Mutex<Vec<Call>>>;

    struct RecordingSurface(CallLog);

    impl BreakSurface for RecordingSurface {
        fn show_break_surface(&mut self, kind: BreakKind) {
            push(&self.0, Call::Show(kind));
        }

        fn dismiss_break_surface(&mut self) {
            push(&self.0, Call::Dismiss);
        }
    }

    struct RecordingSink(CallLog);

    impl NotificationSink for RecordingSink {
        fn notify_break_ending(&mut self) {
            push(&self.0, Call::Notify);
        }
    }

    fn push(log: &CallLog, call: Call) {
        log.lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(call);
    }

    fn calls(log: &CallLog) -> Vec<Call> {
        log.lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Timer driver that panics if both timers are ever scheduled together.
    #[derive(Default)]
    struct ExclusiveTimers {
        active: HashSet<TimerKind>,
        schedules: Vec<TimerKind>,
    }

    impl ExclusiveTimers {
        fn is_active(&self, timer: TimerKind) -> bool {
            self.active.contains(&timer)
        }
    }

    impl TimerDriver for ExclusiveTimers {
        fn schedule(&mut self, timer: TimerKind, period: Duration) {
            assert_eq!(period, timer.period());
            assert!(
                self.active.insert(timer),
                "{timer:?} scheduled without cancelling first"
            );
            assert!(
                self.active.len() == 1,
                "work and countdown timers scheduled together"
            );
            self.schedules.push(timer);
        }

        fn cancel(&mut self, timer: TimerKind) {
            self.active.remove(&timer);
        }
    }

    fn test_settings() -> MemorySettings {
        MemorySettings::new()
            .with(SettingKey::EyeBreakInterval, SettingValue::Seconds(5.0))
            .with(SettingKey::EyeBreakDuration, SettingValue::Seconds(2.0))
            .with(SettingKey::StretchBreakInterval, SettingValue::Seconds(10.0))
            .with(SettingKey::StretchBreakDuration, SettingValue::Seconds(3.0))
    }

    fn scheduler_with(settings: MemorySettings) -> Scheduler<MemorySettings, ExclusiveTimers> {
        Scheduler::new(settings, ExclusiveTimers::default())
    }

    fn recording_scheduler() -> (Scheduler<MemorySettings, ExclusiveTimers>, CallLog) {
        let log = CallLog::default();
        let scheduler = scheduler_with(test_settings())
            .with_surface(Box::new(RecordingSurface(Arc::clone(&log))))
            .with_sink(Box::new(RecordingSink(Arc::clone(&log))));
        (scheduler, log)
    }

    fn set(scheduler: &mut Scheduler<MemorySettings, ExclusiveTimers>, key: SettingKey, value: SettingValue) {
        if let Err(err) = scheduler.settings_mut().set(key, value) {
            panic!("memory store rejected {key}: {err}");
        }
    }

    fn tick_n(scheduler: &mut Scheduler<MemorySettings, ExclusiveTimers>, n: usize) {
        for _ in 0..n {
            scheduler.tick();
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= 0.01,
            "expected {expected} ± 0.01, got {actual}"
        );
    }

    #[test]
    fn initial_state_is_idle() {
        let scheduler = scheduler_with(test_settings());
        let state = scheduler.state();
        assert!(!state.running);
        assert!(!state.on_break);
        assert_close(state.eye_elapsed, 0.0);
        assert_close(state.stretch_elapsed, 0.0);
        assert_close(state.countdown_remaining, 0.0);
        assert!(scheduler.timers().schedules.is_empty());
    }

    #[test]
    fn start_runs_work_clock_and_resets_elapsed() {
        let mut scheduler = scheduler_with(test_settings());
        scheduler.start();
        tick_n(&mut scheduler, 3);
        scheduler.start();
        assert!(scheduler.state().running);
        assert_close(scheduler.state().eye_elapsed, 0.0);
        assert_close(scheduler.state().stretch_elapsed, 0.0);
        assert!(scheduler.timers().is_active(TimerKind::Work));
    }

    #[test]
    fn pause_stops_work_clock() {
        let mut scheduler = scheduler_with(test_settings());
        scheduler.start();
        scheduler.pause();
        assert!(!scheduler.state().running);
        assert!(!scheduler.timers().is_active(TimerKind::Work));
    }

    #[test]
    fn tick_increments_both_tracks() {
        let mut scheduler = scheduler_with(test_settings());
        scheduler.start();
        scheduler.tick();
        assert_close(scheduler.state().eye_elapsed, 1.0);
        assert_close(scheduler.state().stretch_elapsed, 1.0);
    }

    #[test]
    fn tick_is_ignored_while_paused() {
        let mut scheduler = scheduler_with(test_settings());
        scheduler.start();
        scheduler.pause();
        scheduler.tick();
        assert_close(scheduler.state().eye_elapsed, 0.0);
    }

    #[test]
    fn tick_is_ignored_during_break() {
        let mut scheduler = scheduler_with(test_settings());
        scheduler.start();
        tick_n(&mut scheduler, 2);
        scheduler.trigger_break(BreakKind::Eye);
        let before = *scheduler.state();
        tick_n(&mut scheduler, 4);
        assert_close(scheduler.state().eye_elapsed, before.eye_elapsed);
        assert_close(scheduler.state().stretch_elapsed, before.stretch_elapsed);
    }

    #[test]
    fn eye_break_triggers_after_interval() {
        let mut scheduler = scheduler_with(test_settings());
        scheduler.start();
        tick_n(&mut scheduler, 4);
        assert!(!scheduler.state().on_break);
        scheduler.tick();
        let state = scheduler.state();
        assert!(state.on_break);
        assert_eq!(state.active_kind, BreakKind::Eye);
        assert_close(state.countdown_remaining, 2.0);
        assert!(scheduler.timers().is_active(TimerKind::Countdown));
        assert!(!scheduler.timers().is_active(TimerKind::Work));
    }

    #[test]
    fn stretch_wins_when_both_are_due() {
        let mut scheduler = scheduler_with(test_settings());
        set(&mut scheduler, SettingKey::EyeBreakInterval, SettingValue::Seconds(10.0));
        scheduler.start();
        tick_n(&mut scheduler, 10);
        assert!(scheduler.state().on_break);
        assert_eq!(scheduler.state().active_kind, BreakKind::Stretch);
    }

    #[test]
    fn earliest_interval_wins_for_any_configuration() {
        for (eye, stretch) in [(3_u8, 7_u8), (7, 3), (4, 4), (1, 1), (12, 5)] {
            let mut scheduler = scheduler_with(
                MemorySettings::new()
                    .with(SettingKey::EyeBreakInterval, SettingValue::Seconds(f64::from(eye)))
                    .with(
                        SettingKey::StretchBreakInterval,
                        SettingValue::Seconds(f64::from(stretch)),
                    ),
            );
            scheduler.start();
            tick_n(&mut scheduler, usize::from(eye.min(stretch)));
            let expected = if stretch <= eye {
                BreakKind::Stretch
            } else {
                BreakKind::Eye
            };
            assert!(scheduler.state().on_break, "no break for ({eye}, {stretch})");
            assert_eq!(scheduler.state().active_kind, expected, "({eye}, {stretch})");
        }
    }

    #[test]
    fn trigger_break_sets_duration_per_kind() {
        let mut scheduler = scheduler_with(test_settings());
        scheduler.start();
        scheduler.trigger_break(BreakKind::Eye);
        assert_close(scheduler.state().countdown_remaining, 2.0);
        assert_close(scheduler.snapshot().countdown_progress, 1.0);

        scheduler.skip_break();
        scheduler.trigger_break(BreakKind::Stretch);
        assert_eq!(scheduler.state().active_kind, BreakKind::Stretch);
        assert_close(scheduler.state().countdown_remaining, 3.0);
        assert_close(scheduler.snapshot().countdown_progress, 1.0);
    }

    #[test]
    fn trigger_break_works_while_stopped() {
        let (mut scheduler, log) = recording_scheduler();
        scheduler.trigger_break(BreakKind::Stretch);
        assert!(scheduler.state().on_break);
        scheduler.skip_break();
        assert!(!scheduler.state().on_break);
        assert!(!scheduler.timers().is_active(TimerKind::Work));
        assert_eq!(calls(&log), vec![Call::Show(BreakKind::Stretch), Call::Dismiss]);
    }

    #[test]
    fn retrigger_restarts_countdown_for_new_kind() {
        let mut scheduler = scheduler_with(test_settings());
        scheduler.trigger_break(BreakKind::Eye);
        for _ in 0..30 {
            scheduler.countdown_tick();
        }
        scheduler.trigger_break(BreakKind::Stretch);
        assert_eq!(scheduler.state().active_kind, BreakKind::Stretch);
        assert_close(scheduler.state().countdown_remaining, 3.0);
        assert!(scheduler.timers().is_active(TimerKind::Countdown));
    }

    #[test]
    fn skip_break_ends_break_and_resumes_work_clock() {
        let (mut scheduler, log) = recording_scheduler();
        scheduler.start();
        scheduler.trigger_break(BreakKind::Eye);
        scheduler.skip_break();
        assert!(!scheduler.state().on_break);
        assert!(scheduler.timers().is_active(TimerKind::Work));
        assert!(!scheduler.timers().is_active(TimerKind::Countdown));
        assert_eq!(calls(&log), vec![Call::Show(BreakKind::Eye), Call::Dismiss]);
    }

    #[test]
    fn skip_and_end_are_ignored_when_not_on_break() {
        let (mut scheduler, log) = recording_scheduler();
        scheduler.start();
        tick_n(&mut scheduler, 2);
        scheduler.skip_break();
        scheduler.end_break();
        assert_close(scheduler.state().eye_elapsed, 2.0);
        assert!(calls(&log).is_empty());
    }

    #[test]
    fn eye_break_resets_only_eye_clock() {
        let mut scheduler = scheduler_with(test_settings());
        scheduler.start();
        scheduler.state.eye_elapsed = 100.0;
        scheduler.state.stretch_elapsed = 200.0;
        scheduler.trigger_break(BreakKind::Eye);
        scheduler.end_break();
        assert_close(scheduler.state().eye_elapsed, 0.0);
        assert_close(scheduler.state().stretch_elapsed, 200.0);
    }

    #[test]
    fn stretch_break_resets_both_clocks() {
        let mut scheduler = scheduler_with(test_settings());
        scheduler.start();
        scheduler.state.eye_elapsed = 100.0;
        scheduler.state.stretch_elapsed = 200.0;
        scheduler.trigger_break(BreakKind::Stretch);
        scheduler.end_break();
        assert_close(scheduler.state().eye_elapsed, 0.0);
        assert_close(scheduler.state().stretch_elapsed, 0.0);
    }

    #[test]
    fn disabled_eye_never_triggers() {
        let mut scheduler = scheduler_with(test_settings());
        set(&mut scheduler, SettingKey::EyeBreakEnabled, SettingValue::Flag(false));
        scheduler.start();
        tick_n(&mut scheduler, 9);
        assert!(!scheduler.state().on_break);
        assert!(scheduler.state().eye_elapsed > 5.0);
        scheduler.tick();
        assert!(scheduler.state().on_break);
        assert_eq!(scheduler.state().active_kind, BreakKind::Stretch);
    }

    #[test]
    fn disabled_stretch_never_triggers() {
        let mut scheduler = scheduler_with(test_settings());
        set(&mut scheduler, SettingKey::StretchBreakEnabled, SettingValue::Flag(false));
        set(&mut scheduler, SettingKey::EyeBreakEnabled, SettingValue::Flag(false));
        scheduler.start();
        tick_n(&mut scheduler, 50);
        assert!(!scheduler.state().on_break);
        assert_close(scheduler.state().stretch_elapsed, 50.0);
    }

    #[test]
    fn disabled_stretch_leaves_eye_break() {
        let mut scheduler = scheduler_with(test_settings());
        set(&mut scheduler, SettingKey::StretchBreakEnabled, SettingValue::Flag(false));
        scheduler.start();
        tick_n(&mut scheduler, 5);
        assert!(scheduler.state().on_break);
        assert_eq!(scheduler.state().active_kind, BreakKind::Eye);
    }

    #[test]
    fn countdown_runs_to_zero_then_notifies_and_ends() {
        let (mut scheduler, log) = recording_scheduler();
        scheduler.start();
        tick_n(&mut scheduler, 5);
        assert!(scheduler.state().on_break);

        let steps = 2 * COUNTDOWN_TICKS_PER_SEC;
        for _ in 1..steps {
            scheduler.countdown_tick();
        }
        assert!(scheduler.state().on_break, "ended before {steps} steps");
        scheduler.countdown_tick();
        assert!(!scheduler.state().on_break);
        assert_close(scheduler.state().countdown_remaining, 0.0);
        assert!(scheduler.timers().is_active(TimerKind::Work));
        assert_eq!(
            calls(&log),
            vec![Call::Show(BreakKind::Eye), Call::Notify, Call::Dismiss]
        );
    }

    #[test]
    fn countdown_tick_is_ignored_when_not_on_break() {
        let (mut scheduler, log) = recording_scheduler();
        scheduler.countdown_tick();
        assert!(calls(&log).is_empty());
        assert_close(scheduler.state().countdown_remaining, 0.0);
    }

    #[test]
    fn pause_during_break_lets_countdown_finish_without_resuming() {
        let mut scheduler = scheduler_with(test_settings());
        scheduler.start();
        scheduler.trigger_break(BreakKind::Eye);
        scheduler.pause();
        assert!(scheduler.state().on_break);
        assert!(scheduler.timers().is_active(TimerKind::Countdown));
        for _ in 0..(2 * COUNTDOWN_TICKS_PER_SEC) {
            scheduler.countdown_tick();
        }
        assert!(!scheduler.state().on_break);
        assert!(!scheduler.timers().is_active(TimerKind::Work));
    }

    #[test]
    fn start_during_break_defers_work_clock() {
        let mut scheduler = scheduler_with(test_settings());
        scheduler.trigger_break(BreakKind::Eye);
        scheduler.start();
        assert!(scheduler.state().running);
        assert!(!scheduler.timers().is_active(TimerKind::Work));
        scheduler.skip_break();
        assert!(scheduler.timers().is_active(TimerKind::Work));
    }

    #[test]
    fn on_timer_dispatches_by_kind() {
        let mut scheduler = scheduler_with(test_settings());
        scheduler.start();
        scheduler.on_timer(TimerKind::Work);
        assert_close(scheduler.state().eye_elapsed, 1.0);
        scheduler.trigger_break(BreakKind::Eye);
        scheduler.on_timer(TimerKind::Countdown);
        assert_close(scheduler.state().countdown_remaining, 2.0 - COUNTDOWN_STEP_SECS);
    }

    #[test]
    fn countdown_text_rounds_up() {
        let mut scheduler = scheduler_with(test_settings());
        scheduler.start();
        scheduler.trigger_break(BreakKind::Eye);
        scheduler.state.countdown_remaining = 5.3;
        assert_eq!(scheduler.snapshot().countdown_text, "0:06");
        scheduler.state.countdown_remaining = 5.0;
        assert_eq!(scheduler.snapshot().countdown_text, "0:05");
    }

    #[test]
    fn countdown_progress_endpoints_and_midpoint() {
        let mut scheduler = scheduler_with(test_settings());
        set(&mut scheduler, SettingKey::EyeBreakDuration, SettingValue::Seconds(20.0));
        scheduler.start();
        scheduler.trigger_break(BreakKind::Eye);
        assert_close(scheduler.snapshot().countdown_progress, 1.0);
        scheduler.state.countdown_remaining = 10.0;
        assert_close(scheduler.snapshot().countdown_progress, 0.5);
        scheduler.state.countdown_remaining = 0.0;
        assert_close(scheduler.snapshot().countdown_progress, 0.0);
    }

    #[test]
    fn time_until_next_break_strings() {
        let mut scheduler = scheduler_with(test_settings());
        set(&mut scheduler, SettingKey::EyeBreakInterval, SettingValue::Seconds(120.0));
        set(&mut scheduler, SettingKey::StretchBreakInterval, SettingValue::Seconds(3600.0));
        scheduler.state.stretch_elapsed = 60.0;
        let snapshot = scheduler.snapshot();
        assert_eq!(snapshot.time_until_eye, "2:00");
        assert_eq!(snapshot.time_until_stretch, "59:00");
        assert_eq!(snapshot.time_until(BreakKind::Stretch), "59:00");
    }

    #[test]
    fn time_until_next_never_goes_negative() {
        let mut scheduler = scheduler_with(test_settings());
        set(&mut scheduler, SettingKey::EyeBreakEnabled, SettingValue::Flag(false));
        scheduler.state.eye_elapsed = 500.0;
        assert_eq!(scheduler.snapshot().time_until_eye, "0:00");
    }

    #[test]
    fn settings_changes_apply_without_restart() {
        let mut scheduler = scheduler_with(test_settings());
        scheduler.start();
        tick_n(&mut scheduler, 3);
        set(&mut scheduler, SettingKey::EyeBreakInterval, SettingValue::Seconds(4.0));
        scheduler.tick();
        assert!(scheduler.state().on_break);
        assert_eq!(scheduler.state().active_kind, BreakKind::Eye);
    }

    #[test]
    fn status_lines_follow_state() {
        let mut scheduler = scheduler_with(test_settings());
        assert_eq!(scheduler.snapshot().status_lines(), vec!["Paused"]);

        scheduler.start();
        assert_eq!(
            scheduler.snapshot().status_lines(),
            vec!["Eye break in 0:05", "Stretch in 0:10"]
        );

        set(&mut scheduler, SettingKey::EyeBreakEnabled, SettingValue::Flag(false));
        assert_eq!(scheduler.snapshot().status_lines(), vec!["Stretch in 0:10"]);

        scheduler.trigger_break(BreakKind::Stretch);
        assert_eq!(
            scheduler.snapshot().status_lines(),
            vec!["Stretch break: 0:03 left"]
        );
    }

    #[test]
    fn long_session_never_overlaps_timers() {
        let (mut scheduler, log) = recording_scheduler();
        scheduler.start();
        for second in 0..40 {
            if scheduler.state().on_break {
                while scheduler.state().on_break {
                    scheduler.countdown_tick();
                }
            } else {
                scheduler.tick();
            }
            if second == 17 {
                scheduler.pause();
                scheduler.start();
            }
        }
        let shows = calls(&log)
            .iter()
            .filter(|call| matches!(call, Call::Show(_)))
            .count();
        let notifies = calls(&log)
            .iter()
            .filter(|call| **call == Call::Notify)
            .count();
        assert!(shows >= 3);
        assert!(notifies >= shows - 1);
    }
}
