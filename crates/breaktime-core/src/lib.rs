//! Break scheduling state machine, settings model and display formatting for breaktime.

/// Display conversions.
pub mod format;
/// Break kinds.
pub mod kind;
/// Work/break scheduler.
pub mod scheduler;
/// Setting keys, values and resolved configuration.
pub mod settings;

pub use crate::format::{countdown_progress, format_minutes, format_time};
pub use crate::kind::BreakKind;
pub use crate::scheduler::{
    BreakSurface, NotificationSink, Scheduler, SchedulerSnapshot, SchedulerState, TimerDriver,
    TimerKind,
};
pub use crate::settings::{
    MemorySettings, SchedulerConfig, SettingKey, SettingValue, SettingsError, SettingsStore,
    TrackConfig,
};
