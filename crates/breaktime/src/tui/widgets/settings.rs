use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use super::super::constants::{
    SETTINGS_HIGHLIGHT_SYMBOL, SETTINGS_POPUP_HEIGHT, SETTINGS_POPUP_WIDTH,
};
use super::super::settings_form::FIELDS;
use super::super::view::{BreakControl, Ui};
use super::util::fixed_rect;
use crate::config::ViewType;

const LABEL_WIDTH: usize = 30;

impl<C: BreakControl> Ui<C> {
    pub(in crate::tui) fn draw_settings_popup(&self, f: &mut Frame<'_>) {
        let popup_area = fixed_rect(SETTINGS_POPUP_WIDTH, SETTINGS_POPUP_HEIGHT, f.area());
        let block = Block::default()
            .title(" Settings ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .style(Style::default().bg(Color::Black));

        f.render_widget(Clear, popup_area);
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(inner);

        let config = &self.snapshot.config;
        let items: Vec<ListItem<'_>> = FIELDS
            .iter()
            .map(|field| {
                let style = if field.is_editable(config) {
                    Style::default()
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                ListItem::new(Line::from(vec![
                    Span::raw(format!("{:<LABEL_WIDTH$}", field.label)),
                    Span::raw(field.display(config)),
                ]))
                .style(style)
            })
            .collect();

        let list = List::new(items)
            .highlight_style(Style::default().add_modifier(Modifier::BOLD))
            .highlight_symbol(SETTINGS_HIGHLIGHT_SYMBOL);
        let mut state = ListState::default();
        state.select(Some(self.selected_field()));
        f.render_stateful_widget(list, rows[0], &mut state);

        let help = Paragraph::new(self.keybindings.generate_help_text(ViewType::Settings))
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(help, rows[1]);
    }
}
