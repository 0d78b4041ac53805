use std::borrow::Cow;

use breaktime_core::BreakKind;
use ratatui::{layout::Rect, style::Color};
use unicode_segmentation::UnicodeSegmentation;

pub(in crate::tui) fn truncate_with_ellipsis(input: &str, max_graphemes: usize) -> Cow<'_, str> {
    const ELLIPSIS: &str = "...";
    const ELLIPSIS_GRAPHEMES: usize = 3;

    if max_graphemes == 0 {
        return Cow::Owned(String::new());
    }
    if input.graphemes(true).count() <= max_graphemes {
        return Cow::Borrowed(input);
    }
    if max_graphemes <= ELLIPSIS_GRAPHEMES {
        return Cow::Owned(input.graphemes(true).take(max_graphemes).collect());
    }

    let mut truncated: String = input
        .graphemes(true)
        .take(max_graphemes - ELLIPSIS_GRAPHEMES)
        .collect();
    truncated.push_str(ELLIPSIS);
    Cow::Owned(truncated)
}

/// `percent` of `area` in both directions, centered.
pub(in crate::tui) const fn centered_rect(percent: u16, area: Rect) -> Rect {
    let width = area.width * percent / 100;
    let height = area.height * percent / 100;
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// A `width` x `height` box centered in `area`, shrunk to fit.
pub(in crate::tui) fn fixed_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

pub(in crate::tui) const fn kind_color(kind: BreakKind) -> Color {
    match kind {
        BreakKind::Eye => Color::Cyan,
        BreakKind::Stretch => Color::LightYellow,
    }
}
