use anyhow::Result;
use crossterm::event::{KeyEvent, KeyEventKind};

use super::view::{BreakControl, Ui};
use crate::config::ViewType;

pub(super) mod break_overlay;
pub(super) mod main_view;
pub(super) mod settings;

impl<C: BreakControl> Ui<C> {
    /// Route a key press to the active view. Service failures become footer errors.
    pub(in crate::tui) fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        // Pick up a break that began since the last tick before choosing a view.
        self.refresh();
        let result = match self.view() {
            ViewType::Main => self.handle_main_key(&key),
            ViewType::Settings => self.handle_settings_key(&key),
            ViewType::Break => self.handle_break_key(&key),
        };
        if let Err(err) = result {
            self.error(format!("{err:#}"));
        }
        self.refresh();
    }
}

pub(super) type HandlerResult = Result<()>;
