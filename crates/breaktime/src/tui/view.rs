use std::time::{Duration, Instant};

use anyhow::Result;
use breaktime_app::{BreakHandle, PresentationEvent};
use breaktime_core::{BreakKind, SchedulerSnapshot, SettingKey, SettingValue};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
};
use tokio::sync::mpsc;

use super::constants::UI_MESSAGE_TTL_SECS;
use super::settings_form::FIELDS;
use crate::config::{KeyBindingsConfig, ViewType};
use crate::messages;

/// What the UI needs from the break service.
///
/// Implemented for [`BreakHandle`]; tests drive a scheduler directly.
pub(super) trait BreakControl {
    fn start(&self) -> Result<()>;
    fn pause(&self) -> Result<()>;
    fn skip_break(&self) -> Result<()>;
    fn trigger_break(&self, kind: BreakKind) -> Result<()>;
    fn set_setting(&self, key: SettingKey, value: SettingValue) -> Result<()>;
    fn reset_setting(&self, key: SettingKey) -> Result<()>;
    fn snapshot(&self) -> SchedulerSnapshot;
}

impl BreakControl for BreakHandle {
    fn start(&self) -> Result<()> {
        Ok(Self::start(self)?)
    }

    fn pause(&self) -> Result<()> {
        Ok(Self::pause(self)?)
    }

    fn skip_break(&self) -> Result<()> {
        Ok(Self::skip_break(self)?)
    }

    fn trigger_break(&self, kind: BreakKind) -> Result<()> {
        Ok(Self::trigger_break(self, kind)?)
    }

    // The UI runs on a plain thread, so waiting for the reply is fine.
    fn set_setting(&self, key: SettingKey, value: SettingValue) -> Result<()> {
        Ok(self.set_setting_blocking(key, value)?)
    }

    fn reset_setting(&self, key: SettingKey) -> Result<()> {
        Ok(self.reset_setting_blocking(key)?)
    }

    fn snapshot(&self) -> SchedulerSnapshot {
        Self::snapshot(self)
    }
}

/// Which screen receives keys when no break is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Focus {
    Main,
    Settings,
}

/// The break overlay currently on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct BreakOverlay {
    pub(super) kind: BreakKind,
    pub(super) message: &'static str,
}

pub(super) struct Ui<C: BreakControl> {
    pub(super) control: C,
    pub(super) snapshot: SchedulerSnapshot,
    events: Option<mpsc::UnboundedReceiver<PresentationEvent>>,
    pub(super) overlay: Option<BreakOverlay>,
    pub(super) focus: Focus,
    pub(super) settings_cursor: usize,
    rotation: usize,
    pub(super) message: Option<Message>,
    pub(super) should_quit: bool,
    /// Keybindings configuration.
    pub(super) keybindings: KeyBindingsConfig,
}

impl<C: BreakControl> Ui<C> {
    pub(super) const FOOTER_HEIGHT: u16 = 3;

    pub(super) fn new(
        control: C,
        events: Option<mpsc::UnboundedReceiver<PresentationEvent>>,
        keybindings: KeyBindingsConfig,
    ) -> Self {
        let snapshot = control.snapshot();
        Self {
            control,
            snapshot,
            events,
            overlay: None,
            focus: Focus::Main,
            settings_cursor: 0,
            rotation: 0,
            message: None,
            should_quit: false,
            keybindings,
        }
    }

    /// Keybinding context for the next key press.
    pub(super) const fn view(&self) -> ViewType {
        if self.overlay.is_some() {
            return ViewType::Break;
        }
        match self.focus {
            Focus::Main => ViewType::Main,
            Focus::Settings => ViewType::Settings,
        }
    }

    pub(super) const fn selected_field(&self) -> usize {
        if self.settings_cursor < FIELDS.len() {
            self.settings_cursor
        } else {
            FIELDS.len() - 1
        }
    }

    pub(super) fn draw(&self, f: &mut Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(Self::FOOTER_HEIGHT)])
            .split(f.area());

        self.draw_status(f, chunks[0]);
        self.draw_footer(f, chunks[1]);

        if self.focus == Focus::Settings {
            self.draw_settings_popup(f);
        }
        if let Some(overlay) = self.overlay {
            self.draw_break_overlay(f, overlay);
        }
    }

    pub(super) fn info(&mut self, message: impl Into<String>) {
        self.message = Some(Message::info(message));
    }

    pub(super) fn error(&mut self, message: impl Into<String>) {
        self.message = Some(Message::error(message));
    }

    /// Pull overlay events and the latest snapshot from the service.
    pub(super) fn refresh(&mut self) {
        let mut pending = Vec::new();
        if let Some(events) = self.events.as_mut() {
            while let Ok(event) = events.try_recv() {
                pending.push(event);
            }
        }
        for event in pending {
            self.apply_event(event);
        }
        self.snapshot = self.control.snapshot();
    }

    fn apply_event(&mut self, event: PresentationEvent) {
        match event {
            PresentationEvent::Show(kind) => {
                self.overlay = Some(BreakOverlay {
                    kind,
                    message: messages::pick(kind, self.rotation),
                });
                self.rotation = self.rotation.wrapping_add(1);
            }
            PresentationEvent::Dismiss => self.overlay = None,
        }
    }

    pub(super) fn tick(&mut self) {
        if let Some(msg) = &self.message
            && msg.is_expired(Duration::from_secs(UI_MESSAGE_TTL_SECS))
        {
            self.message = None;
        }
        self.refresh();
    }
}

pub(super) struct Message {
    pub(super) text: String,
    pub(super) level: MessageLevel,
    created_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum MessageLevel {
    Info,
    Error,
}

impl Message {
    fn info(text: impl Into<String>) -> Self {
        Self::new(text, MessageLevel::Info)
    }

    fn error(text: impl Into<String>) -> Self {
        Self::new(text, MessageLevel::Error)
    }

    fn new(text: impl Into<String>, level: MessageLevel) -> Self {
        Self {
            text: text.into(),
            level,
            created_at: Instant::now(),
        }
    }

    pub(super) fn style(&self) -> Style {
        match self.level {
            MessageLevel::Info => Style::default().fg(Color::Green),
            MessageLevel::Error => Style::default().fg(Color::Red),
        }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.created_at.elapsed() >= ttl
    }
}
