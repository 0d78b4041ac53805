//! Application layer for breaktime.
//!
//! Wires the core scheduler to real time and real storage: a TOML-backed
//! settings store, tokio timers, and a service task that owns the scheduler
//! and publishes snapshots for the terminal UI and the headless watcher.

pub mod hooks;
pub mod notify;
pub mod service;
pub mod settings_file;
pub mod surface;
pub mod timers;

// Re-exports for convenience
pub use hooks::HookRunner;
pub use notify::HookNotifier;
pub use service::{BreakHandle, BreakService, ServiceError, ServiceOptions};
pub use settings_file::SettingsFile;
pub use surface::{ChannelSurface, PresentationEvent};
pub use timers::{TimerFiring, TokioTimers};
