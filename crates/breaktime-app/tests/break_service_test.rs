//! End-to-end tests for the break service on a paused tokio clock.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::time::Duration;

use breaktime_app::{BreakHandle, BreakService, PresentationEvent, ServiceOptions, SettingsFile};
use breaktime_core::{BreakKind, MemorySettings, SettingKey, SettingValue, SettingsStore};
use tempfile::TempDir;
use tokio::sync::mpsc;
use tokio::time::{Instant, timeout};

const PATIENCE: Duration = Duration::from_secs(600);

fn quick_settings() -> MemorySettings {
    MemorySettings::new()
        .with(SettingKey::EyeBreakInterval, SettingValue::Seconds(3.0))
        .with(SettingKey::EyeBreakDuration, SettingValue::Seconds(1.0))
        .with(SettingKey::StretchBreakInterval, SettingValue::Seconds(8.0))
        .with(SettingKey::StretchBreakDuration, SettingValue::Seconds(2.0))
}

fn spawn_with_presenter(
    settings: MemorySettings,
    autostart: bool,
) -> (BreakHandle, mpsc::UnboundedReceiver<PresentationEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let options = ServiceOptions {
        presenter: Some(tx),
        autostart,
        ..ServiceOptions::default()
    };
    let (handle, _task) = BreakService::spawn(settings, options);
    (handle, rx)
}

async fn next_event(events: &mut mpsc::UnboundedReceiver<PresentationEvent>) -> PresentationEvent {
    timeout(PATIENCE, events.recv())
        .await
        .expect("presentation event in time")
        .expect("presenter channel open")
}

#[tokio::test(start_paused = true)]
async fn eye_break_runs_its_full_cycle() {
    let started = Instant::now();
    let (handle, mut events) = spawn_with_presenter(quick_settings(), true);

    assert_eq!(next_event(&mut events).await, PresentationEvent::Show(BreakKind::Eye));
    assert_eq!(started.elapsed().as_secs(), 3);

    let mut snapshots = handle.subscribe();
    let on_break = snapshots
        .wait_for(|snapshot| snapshot.state.on_break)
        .await
        .expect("service alive")
        .clone();
    assert_eq!(on_break.state.active_kind, BreakKind::Eye);
    assert_eq!(on_break.countdown_text, "0:01");
    assert!((on_break.countdown_progress - 1.0).abs() < 0.01);

    assert_eq!(next_event(&mut events).await, PresentationEvent::Dismiss);
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(3990), "{elapsed:?}");
    assert!(elapsed <= Duration::from_millis(4050), "{elapsed:?}");

    let after = snapshots
        .wait_for(|snapshot| !snapshot.state.on_break)
        .await
        .expect("service alive")
        .clone();
    assert!(after.state.running);
    assert_eq!(after.time_until_eye, "0:03");
    handle.shutdown();
}

#[tokio::test(start_paused = true)]
async fn stretch_break_resets_both_clocks() {
    let settings = quick_settings()
        .with(SettingKey::EyeBreakEnabled, SettingValue::Flag(false));
    let started = Instant::now();
    let (handle, mut events) = spawn_with_presenter(settings, true);

    assert_eq!(
        next_event(&mut events).await,
        PresentationEvent::Show(BreakKind::Stretch)
    );
    assert_eq!(started.elapsed().as_secs(), 8);
    assert_eq!(next_event(&mut events).await, PresentationEvent::Dismiss);

    let snapshot = handle
        .subscribe()
        .wait_for(|snapshot| !snapshot.state.on_break)
        .await
        .expect("service alive")
        .clone();
    assert_eq!(snapshot.time_until_stretch, "0:08");
    assert!(snapshot.state.eye_elapsed < 0.5);
    handle.shutdown();
}

#[tokio::test(start_paused = true)]
async fn manual_break_and_skip_while_stopped() {
    let (handle, mut events) = spawn_with_presenter(quick_settings(), false);

    handle.trigger_break(BreakKind::Stretch).unwrap();
    assert_eq!(
        next_event(&mut events).await,
        PresentationEvent::Show(BreakKind::Stretch)
    );
    handle.skip_break().unwrap();
    assert_eq!(next_event(&mut events).await, PresentationEvent::Dismiss);

    let snapshot = handle
        .subscribe()
        .wait_for(|snapshot| !snapshot.state.on_break)
        .await
        .expect("service alive")
        .clone();
    assert!(!snapshot.state.running);
    assert_eq!(snapshot.status_lines(), vec!["Paused"]);
    handle.shutdown();
}

#[tokio::test(start_paused = true)]
async fn restarting_resets_the_work_clock() {
    let started = Instant::now();
    let (handle, mut events) = spawn_with_presenter(quick_settings(), true);

    for _ in 0..3 {
        tokio::time::sleep(Duration::from_millis(2500)).await;
        handle.pause().unwrap();
        handle.start().unwrap();
    }

    assert_eq!(next_event(&mut events).await, PresentationEvent::Show(BreakKind::Eye));
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(10_500), "{elapsed:?}");
    assert!(elapsed <= Duration::from_millis(10_600), "{elapsed:?}");
    handle.shutdown();
}

#[tokio::test(start_paused = true)]
async fn retrigger_during_break_dismisses_once() {
    let (handle, mut events) = spawn_with_presenter(quick_settings(), false);

    handle.trigger_break(BreakKind::Eye).unwrap();
    handle.trigger_break(BreakKind::Eye).unwrap();
    handle.trigger_break(BreakKind::Stretch).unwrap();

    assert_eq!(next_event(&mut events).await, PresentationEvent::Show(BreakKind::Eye));
    assert_eq!(next_event(&mut events).await, PresentationEvent::Show(BreakKind::Eye));
    assert_eq!(
        next_event(&mut events).await,
        PresentationEvent::Show(BreakKind::Stretch)
    );
    let started = Instant::now();
    assert_eq!(next_event(&mut events).await, PresentationEvent::Dismiss);
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(1990), "{elapsed:?}");
    assert!(elapsed <= Duration::from_millis(2050), "{elapsed:?}");

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(events.try_recv().is_err());
    handle.shutdown();
}

#[tokio::test(start_paused = true)]
async fn setting_changes_apply_to_the_running_session() {
    let started = Instant::now();
    let (handle, mut events) = spawn_with_presenter(quick_settings(), false);

    handle
        .set_setting(SettingKey::EyeBreakInterval, SettingValue::Seconds(1.0))
        .await
        .unwrap();
    handle.start().unwrap();
    assert_eq!(next_event(&mut events).await, PresentationEvent::Show(BreakKind::Eye));
    assert_eq!(started.elapsed().as_secs(), 1);

    handle.reset_setting(SettingKey::EyeBreakInterval).await.unwrap();
    let restored = handle
        .subscribe()
        .wait_for(|snapshot| (snapshot.config.eye.interval_secs - 1200.0).abs() < f64::EPSILON)
        .await
        .is_ok();
    assert!(restored);
    handle.shutdown();
}

#[tokio::test(start_paused = true)]
async fn settings_written_through_the_service_reach_disk() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("settings.toml");
    let store = SettingsFile::open(&path).unwrap();
    let (handle, task) = BreakService::spawn(store, ServiceOptions::default());

    handle
        .set_setting(SettingKey::StretchBreakDuration, SettingValue::Seconds(120.0))
        .await
        .unwrap();
    handle.shutdown();
    task.await.unwrap();

    let reopened = SettingsFile::open(&path).unwrap();
    assert_eq!(
        reopened.get(SettingKey::StretchBreakDuration),
        Some(SettingValue::Seconds(120.0))
    );
}
