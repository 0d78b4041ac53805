//! Shared constants for the TUI to keep layout and timing in sync.

/// Interval in milliseconds between UI ticks/redraws.
pub const TUI_TICK_RATE_MS: u64 = 100;
/// Time-to-live in seconds for transient status messages.
pub const UI_MESSAGE_TTL_SECS: u64 = 5;
/// Width/height percentage of the break overlay.
pub const BREAK_POPUP_PERCENT: u16 = 80;
/// Preferred width of the settings popup.
pub const SETTINGS_POPUP_WIDTH: u16 = 56;
/// Preferred height of the settings popup.
pub const SETTINGS_POPUP_HEIGHT: u16 = 12;
/// Highlight symbol shown beside the selected settings row.
pub const SETTINGS_HIGHLIGHT_SYMBOL: &str = "▶ ";
