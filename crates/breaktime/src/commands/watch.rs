//! `breaktime watch`: run the scheduler without a UI and log each break.

use std::future::Future;
use std::io;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use breaktime_app::{BreakService, PresentationEvent, ServiceOptions};
use breaktime_core::{SettingsStore, format_time};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::info;

use crate::config::Config;
use crate::messages;

const STATUS_PERIOD: Duration = Duration::from_secs(60);

/// Watch until Ctrl-C.
pub fn run<S>(settings: S, config: &Config, base_dir: &Path) -> Result<()>
where
    S: SettingsStore + Send + 'static,
{
    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    let options = ServiceOptions {
        hooks: config.hook_runner(base_dir),
        bell: config.notify.bell,
        ..ServiceOptions::default()
    };
    let breaks = runtime.block_on(watch_until(settings, options, tokio::signal::ctrl_c()))?;
    info!(breaks, "stopped watching");
    Ok(())
}

/// Start a break service and drive it until `shutdown` resolves.
/// Returns how many breaks started.
async fn watch_until<S, F>(settings: S, mut options: ServiceOptions, shutdown: F) -> Result<usize>
where
    S: SettingsStore + Send + 'static,
    F: Future<Output = io::Result<()>>,
{
    let (presenter, mut events) = mpsc::unbounded_channel();
    options.presenter = Some(presenter);
    options.autostart = true;
    let (handle, task) = BreakService::spawn(settings, options);
    info!("watching for breaks; press Ctrl-C to stop");

    let mut status = tokio::time::interval(STATUS_PERIOD);
    status.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut breaks = 0_usize;
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = &mut shutdown => {
                result.context("failed to wait for Ctrl-C")?;
                break;
            }
            Some(event) = events.recv() => match event {
                PresentationEvent::Show(kind) => {
                    let duration = handle.snapshot().config.track(kind).duration_secs;
                    info!(
                        %kind,
                        duration = %format_time(duration),
                        "{}: {}",
                        messages::break_title(kind),
                        messages::pick(kind, breaks),
                    );
                    breaks += 1;
                }
                PresentationEvent::Dismiss => info!("break over, back to work"),
            },
            _ = status.tick() => {
                for line in handle.snapshot().status_lines() {
                    info!("{line}");
                }
            }
        }
    }

    handle.shutdown();
    task.await.context("break service task failed")?;
    Ok(breaks)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use breaktime_core::{MemorySettings, SettingKey, SettingValue};

    #[tokio::test(start_paused = true)]
    async fn counts_breaks_until_shutdown() {
        let settings = MemorySettings::new()
            .with(SettingKey::EyeBreakInterval, SettingValue::Seconds(3.0))
            .with(SettingKey::EyeBreakDuration, SettingValue::Seconds(1.0))
            .with(SettingKey::StretchBreakEnabled, SettingValue::Flag(false));
        let shutdown = async {
            tokio::time::sleep(Duration::from_millis(9500)).await;
            Ok(())
        };

        // Watching starts the work clock without being asked.
        // Breaks start at 3 s and 7 s; the next would be at 11 s.
        let breaks = watch_until(settings, ServiceOptions::default(), shutdown)
            .await
            .unwrap();
        assert_eq!(breaks, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_error_is_reported() {
        let shutdown = async { Err(io::Error::other("no signal handler")) };
        let result = watch_until(MemorySettings::new(), ServiceOptions::default(), shutdown).await;
        assert!(result.is_err());
    }
}
