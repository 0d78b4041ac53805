use breaktime_core::BreakKind;
use crossterm::event::KeyEvent;

use super::super::view::{BreakControl, Focus, Ui};
use super::HandlerResult;
use crate::config::{Action, ViewType};

impl<C: BreakControl> Ui<C> {
    pub(in crate::tui) fn handle_main_key(&mut self, key: &KeyEvent) -> HandlerResult {
        let Some(action) = self.keybindings.action_for(ViewType::Main, key) else {
            return Ok(());
        };

        match action {
            Action::Quit => self.should_quit = true,
            Action::Start => {
                let restarting = self.snapshot.state.running;
                self.control.start()?;
                self.info(if restarting {
                    "Work timers restarted"
                } else {
                    "Break reminders started"
                });
            }
            Action::Pause => {
                if self.snapshot.state.running {
                    self.control.pause()?;
                    self.info("Paused");
                }
            }
            Action::TakeEyeBreak => self.control.trigger_break(BreakKind::Eye)?,
            Action::TakeStretchBreak => self.control.trigger_break(BreakKind::Stretch)?,
            Action::OpenSettings => {
                self.focus = Focus::Settings;
                self.message = None;
            }
            _ => {}
        }
        Ok(())
    }
}
