use crossterm::event::KeyEvent;

use super::super::settings_form::{FIELDS, StepDirection};
use super::super::view::{BreakControl, Focus, Ui};
use super::HandlerResult;
use crate::config::{Action, ViewType};

impl<C: BreakControl> Ui<C> {
    pub(in crate::tui) fn handle_settings_key(&mut self, key: &KeyEvent) -> HandlerResult {
        let Some(action) = self.keybindings.action_for(ViewType::Settings, key) else {
            return Ok(());
        };

        match action {
            Action::Close => self.focus = Focus::Main,
            Action::Down => self.settings_cursor = (self.selected_field() + 1).min(FIELDS.len() - 1),
            Action::Up => self.settings_cursor = self.selected_field().saturating_sub(1),
            Action::Increase => self.step_selected(StepDirection::Up)?,
            Action::Decrease => self.step_selected(StepDirection::Down)?,
            Action::Toggle => self.toggle_selected()?,
            Action::Reset => self.reset_selected()?,
            _ => {}
        }
        Ok(())
    }

    /// Whether the selected row may change; reports why not in the footer.
    fn selected_is_editable(&mut self) -> bool {
        let field = FIELDS[self.selected_field()];
        if field.is_editable(&self.snapshot.config) {
            return true;
        }
        self.error(format!("Enable {} breaks to edit this", field.track.as_str()));
        false
    }

    fn step_selected(&mut self, direction: StepDirection) -> HandlerResult {
        if !self.selected_is_editable() {
            return Ok(());
        }
        let field = FIELDS[self.selected_field()];
        if let Some(value) = field.stepped(&self.snapshot.config, direction) {
            self.control.set_setting(field.key, value)?;
        }
        Ok(())
    }

    fn toggle_selected(&mut self) -> HandlerResult {
        let field = FIELDS[self.selected_field()];
        if let Some(value) = field.toggled(&self.snapshot.config) {
            self.control.set_setting(field.key, value)?;
        }
        Ok(())
    }

    fn reset_selected(&mut self) -> HandlerResult {
        if !self.selected_is_editable() {
            return Ok(());
        }
        let field = FIELDS[self.selected_field()];
        self.control.reset_setting(field.key)?;
        self.info(format!("{} restored to default", field.key));
        Ok(())
    }
}
