use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
};

use super::super::constants::BREAK_POPUP_PERCENT;
use super::super::view::{BreakControl, BreakOverlay, Ui};
use super::util::{centered_rect, kind_color};
use crate::config::ViewType;
use crate::messages;

impl<C: BreakControl> Ui<C> {
    pub(in crate::tui) fn draw_break_overlay(&self, f: &mut Frame<'_>, overlay: BreakOverlay) {
        let popup_area = centered_rect(BREAK_POPUP_PERCENT, f.area());
        let color = kind_color(overlay.kind);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .style(Style::default().bg(Color::Black));

        f.render_widget(Clear, popup_area);
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(2),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        let title = Paragraph::new(messages::break_title(overlay.kind))
            .alignment(Alignment::Center)
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD));
        f.render_widget(title, rows[1]);

        let message = Paragraph::new(overlay.message)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(message, rows[3]);

        let countdown = Gauge::default()
            .gauge_style(Style::default().fg(color).bg(Color::DarkGray))
            .ratio(self.snapshot.countdown_progress.clamp(0.0, 1.0))
            .label(self.snapshot.countdown_text.clone());
        f.render_widget(countdown, middle_band(rows[5]));

        let hint = Paragraph::new(self.keybindings.generate_help_text(ViewType::Break))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        f.render_widget(hint, rows[7]);
    }
}

/// Center 60% of a row, so the countdown bar does not touch the border.
const fn middle_band(row: Rect) -> Rect {
    let width = row.width / 5 * 3;
    Rect {
        x: row.x + (row.width - width) / 2,
        width,
        ..row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn middle_band_is_centered() {
        let band = middle_band(Rect::new(4, 7, 62, 1));
        assert_eq!(band, Rect::new(4 + 13, 7, 36, 1));
    }

    #[test]
    fn middle_band_handles_widest_row() {
        let band = middle_band(Rect::new(0, 0, u16::MAX, 1));
        assert_eq!(band.width, 39_321);
        assert_eq!(band.x, (u16::MAX - 39_321) / 2);
    }
}
