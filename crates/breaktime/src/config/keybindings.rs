//! Keybindings for the terminal UI.

use std::collections::HashMap;

use anyhow::{Context, Result, anyhow, bail};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};

macro_rules! vec_of_strings {
    ($($s:expr),* $(,)?) => {
        vec![$($s.to_string()),*]
    };
}

/// Keybindings for every TUI view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindingsConfig {
    /// Status screen.
    pub main: MainKeyBindings,
    /// Settings editor.
    pub settings: SettingsKeyBindings,
    /// Break overlay.
    pub break_overlay: BreakKeyBindings,
}

/// Keybindings for the status screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MainKeyBindings {
    /// Quit the application.
    pub quit: Vec<String>,
    /// Start (or restart) a work session.
    pub start: Vec<String>,
    /// Pause the work clock.
    pub pause: Vec<String>,
    /// Take an eye break now.
    pub take_eye_break: Vec<String>,
    /// Take a stretch break now.
    pub take_stretch_break: Vec<String>,
    /// Open the settings editor.
    pub open_settings: Vec<String>,
}

/// Keybindings for the settings editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsKeyBindings {
    /// Close the editor.
    pub close: Vec<String>,
    /// Next field.
    pub down: Vec<String>,
    /// Previous field.
    pub up: Vec<String>,
    /// Step the selected value up.
    pub increase: Vec<String>,
    /// Step the selected value down.
    pub decrease: Vec<String>,
    /// Flip an on/off field.
    pub toggle: Vec<String>,
    /// Restore the selected field's default.
    pub reset: Vec<String>,
}

/// Keybindings for the break overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakKeyBindings {
    /// End the break early.
    pub skip: Vec<String>,
    /// Quit the application.
    pub quit: Vec<String>,
}

impl Default for MainKeyBindings {
    fn default() -> Self {
        Self {
            quit: vec_of_strings!["q", "Q", "Ctrl+c"],
            start: vec_of_strings!["s", "S"],
            pause: vec_of_strings!["p", "P"],
            take_eye_break: vec_of_strings!["e", "E"],
            take_stretch_break: vec_of_strings!["t", "T"],
            open_settings: vec_of_strings!["o", "O"],
        }
    }
}

impl Default for SettingsKeyBindings {
    fn default() -> Self {
        Self {
            close: vec_of_strings!["q", "Esc"],
            down: vec_of_strings!["j", "Down"],
            up: vec_of_strings!["k", "Up"],
            increase: vec_of_strings!["l", "Right", "+"],
            decrease: vec_of_strings!["h", "Left", "-"],
            toggle: vec_of_strings!["Enter", "Space"],
            reset: vec_of_strings!["r", "R"],
        }
    }
}

impl Default for BreakKeyBindings {
    fn default() -> Self {
        Self {
            skip: vec_of_strings!["Enter", "s", "S", "Esc"],
            quit: vec_of_strings!["Ctrl+c"],
        }
    }
}

/// View type for keybinding context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewType {
    /// Status screen.
    Main,
    /// Settings editor.
    Settings,
    /// Break overlay.
    Break,
}

impl ViewType {
    /// Every view.
    pub const ALL: [Self; 3] = [Self::Main, Self::Settings, Self::Break];

    /// Table name in the config file.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Settings => "settings",
            Self::Break => "break_overlay",
        }
    }
}

/// Action that can be performed in a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Quit the application.
    Quit,

    // Main
    /// Start a work session.
    Start,
    /// Pause the work clock.
    Pause,
    /// Take an eye break now.
    TakeEyeBreak,
    /// Take a stretch break now.
    TakeStretchBreak,
    /// Open the settings editor.
    OpenSettings,

    // Settings
    /// Close the editor.
    Close,
    /// Next field.
    Down,
    /// Previous field.
    Up,
    /// Step up.
    Increase,
    /// Step down.
    Decrease,
    /// Flip a flag.
    Toggle,
    /// Restore the default.
    Reset,

    // Break
    /// End the break early.
    Skip,
}

impl Action {
    /// Field name in the config file.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Quit => "quit",
            Self::Start => "start",
            Self::Pause => "pause",
            Self::TakeEyeBreak => "take_eye_break",
            Self::TakeStretchBreak => "take_stretch_break",
            Self::OpenSettings => "open_settings",
            Self::Close => "close",
            Self::Down => "down",
            Self::Up => "up",
            Self::Increase => "increase",
            Self::Decrease => "decrease",
            Self::Toggle => "toggle",
            Self::Reset => "reset",
            Self::Skip => "skip",
        }
    }
}

/// Parse a key string into a `KeyEvent`.
///
/// # Examples
/// - "j" -> `KeyCode::Char('j')`
/// - "Space" -> `KeyCode::Char(' ')`
/// - "Ctrl+c" -> `KeyCode::Char('c')` with CONTROL modifier
pub fn parse_key(s: &str) -> Result<KeyEvent> {
    if s == "+" {
        return Ok(KeyEvent::new(KeyCode::Char('+'), KeyModifiers::NONE));
    }

    let parts: Vec<&str> = s.split('+').collect();
    let (key_part, modifier_parts) = parts
        .split_last()
        .ok_or_else(|| anyhow!("Empty key string"))?;

    let mut modifiers = KeyModifiers::NONE;
    for &modifier in modifier_parts {
        match modifier {
            "Ctrl" | "Control" => modifiers |= KeyModifiers::CONTROL,
            "Alt" => modifiers |= KeyModifiers::ALT,
            "Shift" => modifiers |= KeyModifiers::SHIFT,
            other => bail!("Unknown modifier: {other}"),
        }
    }

    Ok(KeyEvent::new(parse_key_code(key_part)?, modifiers))
}

fn parse_key_code(s: &str) -> Result<KeyCode> {
    match s {
        "Enter" => Ok(KeyCode::Enter),
        "Esc" => Ok(KeyCode::Esc),
        "Space" => Ok(KeyCode::Char(' ')),
        "Backspace" => Ok(KeyCode::Backspace),
        "Left" => Ok(KeyCode::Left),
        "Right" => Ok(KeyCode::Right),
        "Up" => Ok(KeyCode::Up),
        "Down" => Ok(KeyCode::Down),
        "Home" => Ok(KeyCode::Home),
        "End" => Ok(KeyCode::End),
        "PageUp" => Ok(KeyCode::PageUp),
        "PageDown" => Ok(KeyCode::PageDown),
        "Tab" => Ok(KeyCode::Tab),
        "Delete" => Ok(KeyCode::Delete),
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(ch), None) => Ok(KeyCode::Char(ch)),
                _ => bail!("Unknown key: {other}"),
            }
        }
    }
}

impl KeyBindingsConfig {
    /// Actions of `view` paired with their configured keys.
    fn bindings(&self, view: ViewType) -> Vec<(Action, &[String])> {
        match view {
            ViewType::Main => vec![
                (Action::Quit, self.main.quit.as_slice()),
                (Action::Start, self.main.start.as_slice()),
                (Action::Pause, self.main.pause.as_slice()),
                (Action::TakeEyeBreak, self.main.take_eye_break.as_slice()),
                (Action::TakeStretchBreak, self.main.take_stretch_break.as_slice()),
                (Action::OpenSettings, self.main.open_settings.as_slice()),
            ],
            ViewType::Settings => vec![
                (Action::Close, self.settings.close.as_slice()),
                (Action::Down, self.settings.down.as_slice()),
                (Action::Up, self.settings.up.as_slice()),
                (Action::Increase, self.settings.increase.as_slice()),
                (Action::Decrease, self.settings.decrease.as_slice()),
                (Action::Toggle, self.settings.toggle.as_slice()),
                (Action::Reset, self.settings.reset.as_slice()),
            ],
            ViewType::Break => vec![
                (Action::Skip, self.break_overlay.skip.as_slice()),
                (Action::Quit, self.break_overlay.quit.as_slice()),
            ],
        }
    }

    fn get_keys(&self, view: ViewType, action: Action) -> &[String] {
        self.bindings(view)
            .into_iter()
            .find_map(|(candidate, keys)| (candidate == action).then_some(keys))
            .unwrap_or(&[])
    }

    /// Validate the keybindings.
    ///
    /// Checks for:
    /// - Empty key bindings
    /// - Invalid key expressions
    /// - Key conflicts within each view
    pub fn validate(&self) -> Result<()> {
        for view in ViewType::ALL {
            let mut owners: HashMap<(KeyCode, KeyModifiers), Action> = HashMap::new();
            for (action, keys) in self.bindings(view) {
                let field = format!("{}.{}", view.name(), action.name());
                if keys.is_empty() {
                    bail!("{field} must have at least one key binding");
                }
                for key in keys {
                    let parsed =
                        parse_key(key).with_context(|| format!("Invalid key '{key}' in {field}"))?;
                    let slot = (parsed.code, normalized_modifiers(&parsed));
                    match owners.get(&slot) {
                        Some(owner) if *owner != action => bail!(
                            "Key '{key}' is bound to both {} and {} in {}",
                            owner.name(),
                            action.name(),
                            view.name()
                        ),
                        _ => {
                            owners.insert(slot, action);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Help line for a view.
    pub fn generate_help_text(&self, view: ViewType) -> String {
        match view {
            ViewType::Main => self.main_help_text(true),
            ViewType::Settings => format!(
                "{}:move {}:adjust {}:toggle {}:default {}:close",
                format_key_pair(&self.settings.down, &self.settings.up),
                format_key_pair(&self.settings.decrease, &self.settings.increase),
                format_first_key(&self.settings.toggle),
                format_first_key(&self.settings.reset),
                format_first_key(&self.settings.close),
            ),
            ViewType::Break => format!(
                "{}:skip break",
                format_first_key(&self.break_overlay.skip)
            ),
        }
    }

    /// Help line for the status screen. A stopped session only offers Start.
    pub fn main_help_text(&self, running: bool) -> String {
        let session = if running {
            format!(
                "{}:pause {}:restart",
                format_first_key(&self.main.pause),
                format_first_key(&self.main.start)
            )
        } else {
            format!("{}:start", format_first_key(&self.main.start))
        };
        format!(
            "{session} {}:eye break {}:stretch {}:settings {}:quit",
            format_first_key(&self.main.take_eye_break),
            format_first_key(&self.main.take_stretch_break),
            format_first_key(&self.main.open_settings),
            format_first_key(&self.main.quit),
        )
    }

    /// Check if a key event matches a configured action in a view.
    ///
    /// Shift is ignored for character keys, since terminals report `Q` with
    /// the shift modifier set.
    pub fn matches(&self, view: ViewType, action: Action, key: &KeyEvent) -> bool {
        self.get_keys(view, action)
            .iter()
            .filter_map(|key_str| parse_key(key_str).ok())
            .any(|expected| key_event_matches(&expected, key))
    }

    /// First action of `view` bound to `key`.
    pub fn action_for(&self, view: ViewType, key: &KeyEvent) -> Option<Action> {
        self.bindings(view)
            .into_iter()
            .map(|(action, _)| action)
            .find(|action| self.matches(view, *action, key))
    }
}

fn normalized_modifiers(key: &KeyEvent) -> KeyModifiers {
    match key.code {
        KeyCode::Char(_) => key.modifiers.difference(KeyModifiers::SHIFT),
        _ => key.modifiers,
    }
}

fn key_event_matches(expected: &KeyEvent, actual: &KeyEvent) -> bool {
    expected.code == actual.code && normalized_modifiers(expected) == normalized_modifiers(actual)
}

fn format_first_key(keys: &[String]) -> String {
    keys.first()
        .map_or_else(|| "?".to_string(), |key| format_key_display(key))
}

fn format_key_pair(first: &[String], second: &[String]) -> String {
    format!("{}/{}", format_first_key(first), format_first_key(second))
}

fn format_key_display(key: &str) -> String {
    match key {
        "Enter" => "↵".to_string(),
        "Space" => "␣".to_string(),
        "Backspace" => "BS".to_string(),
        "Delete" => "Del".to_string(),
        "Up" => "↑".to_string(),
        "Down" => "↓".to_string(),
        "Left" => "←".to_string(),
        "Right" => "→".to_string(),
        "PageUp" => "PgUp".to_string(),
        "PageDown" => "PgDn".to_string(),
        other if other.starts_with("Ctrl+") || other.starts_with("Alt+") => {
            other.replacen('+', "-", 1)
        }
        other => other.to_string(),
    }
}
