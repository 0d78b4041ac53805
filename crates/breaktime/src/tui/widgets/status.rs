use breaktime_core::{BreakKind, SchedulerSnapshot};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
};

use super::super::view::{BreakControl, Message, Ui};
use super::util::{kind_color, truncate_with_ellipsis};
use crate::config::ViewType;

const GAUGE_HEIGHT: u16 = 1;

impl<C: BreakControl> Ui<C> {
    pub(in crate::tui) fn draw_status(&self, f: &mut Frame<'_>, area: Rect) {
        let block = Block::default().title(" breaktime ").borders(Borders::ALL);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let lines = self.status_text_lines();
        let tracks = self.visible_tracks();
        let text_height = u16::try_from(lines.len()).unwrap_or(u16::MAX).saturating_add(1);
        let mut constraints = vec![Constraint::Length(text_height)];
        constraints.extend(tracks.iter().map(|_| Constraint::Length(GAUGE_HEIGHT + 1)));
        constraints.push(Constraint::Min(0));
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        f.render_widget(Paragraph::new(lines), rows[0]);

        for (row, kind) in rows.iter().skip(1).zip(tracks) {
            let gauge = Gauge::default()
                .gauge_style(Style::default().fg(kind_color(kind)))
                .ratio(work_ratio(&self.snapshot, kind))
                .label(format!("{:<8} {}", kind.label(), self.snapshot.time_until(kind)));
            let area = Rect {
                height: GAUGE_HEIGHT,
                ..*row
            };
            f.render_widget(gauge, area);
        }
    }

    fn status_text_lines(&self) -> Vec<Line<'static>> {
        let state = &self.snapshot.state;
        let (marker, text, color) = if state.on_break {
            ("●", "On a break", kind_color(state.active_kind))
        } else if state.running {
            ("●", "Running", Color::Green)
        } else {
            ("○", "Stopped", Color::DarkGray)
        };
        let mut lines = vec![Line::from(Span::styled(
            format!("{marker} {text}"),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))];
        lines.extend(self.snapshot.status_lines().into_iter().map(Line::from));
        lines
    }

    /// Tracks that get a progress bar: enabled ones, while work time accumulates.
    fn visible_tracks(&self) -> Vec<BreakKind> {
        let state = &self.snapshot.state;
        if !state.running || state.on_break {
            return Vec::new();
        }
        BreakKind::BY_PRIORITY
            .into_iter()
            .filter(|&kind| self.snapshot.config.track(kind).enabled)
            .collect()
    }

    pub(in crate::tui) fn draw_footer(&self, f: &mut Frame<'_>, area: Rect) {
        let width = usize::from(area.width.saturating_sub(2));
        let text = self.footer_text();
        let style = self
            .message
            .as_ref()
            .map_or_else(|| Style::default().fg(Color::DarkGray), Message::style);
        let footer = Paragraph::new(truncate_with_ellipsis(&text, width).into_owned())
            .style(style)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(footer, area);
    }

    /// The pending message, or key help for the active view.
    pub(in crate::tui) fn footer_text(&self) -> String {
        if let Some(message) = &self.message {
            return message.text.clone();
        }
        match self.view() {
            ViewType::Main => self.keybindings.main_help_text(self.snapshot.state.running),
            view => self.keybindings.generate_help_text(view),
        }
    }
}

/// Share of the interval already worked, in `[0, 1]`.
const fn work_ratio(snapshot: &SchedulerSnapshot, kind: BreakKind) -> f64 {
    let interval = snapshot.config.track(kind).interval_secs;
    if interval <= 0.0 {
        return 0.0;
    }
    (snapshot.state.elapsed(kind) / interval).clamp(0.0, 1.0)
}
