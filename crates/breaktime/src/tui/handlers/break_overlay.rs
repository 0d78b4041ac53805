use crossterm::event::KeyEvent;

use super::super::view::{BreakControl, Ui};
use super::HandlerResult;
use crate::config::{Action, ViewType};

impl<C: BreakControl> Ui<C> {
    pub(in crate::tui) fn handle_break_key(&mut self, key: &KeyEvent) -> HandlerResult {
        match self.keybindings.action_for(ViewType::Break, key) {
            Some(Action::Skip) => self.control.skip_break()?,
            Some(Action::Quit) => self.should_quit = true,
            _ => {}
        }
        Ok(())
    }
}
