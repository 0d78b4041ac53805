use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::kind::BreakKind;

/// Default seconds between eye breaks.
pub const DEFAULT_EYE_INTERVAL_SECS: f64 = 20.0 * 60.0;
/// Default eye break length in seconds.
pub const DEFAULT_EYE_DURATION_SECS: f64 = 20.0;
/// Default seconds between stretch breaks.
pub const DEFAULT_STRETCH_INTERVAL_SECS: f64 = 60.0 * 60.0;
/// Default stretch break length in seconds.
pub const DEFAULT_STRETCH_DURATION_SECS: f64 = 5.0 * 60.0;

/// Names of the six persisted scalars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingKey {
    /// Seconds of work before an eye break.
    EyeBreakInterval,
    /// Length of an eye break in seconds.
    EyeBreakDuration,
    /// Seconds of work before a stretch break.
    StretchBreakInterval,
    /// Length of a stretch break in seconds.
    StretchBreakDuration,
    /// Whether eye breaks trigger at all.
    EyeBreakEnabled,
    /// Whether stretch breaks trigger at all.
    StretchBreakEnabled,
}

impl SettingKey {
    /// All keys in display order.
    pub const ALL: [Self; 6] = [
        Self::EyeBreakEnabled,
        Self::EyeBreakInterval,
        Self::EyeBreakDuration,
        Self::StretchBreakEnabled,
        Self::StretchBreakInterval,
        Self::StretchBreakDuration,
    ];

    /// Key name used by the settings file and the CLI.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EyeBreakInterval => "eye_break_interval",
            Self::EyeBreakDuration => "eye_break_duration",
            Self::StretchBreakInterval => "stretch_break_interval",
            Self::StretchBreakDuration => "stretch_break_duration",
            Self::EyeBreakEnabled => "eye_break_enabled",
            Self::StretchBreakEnabled => "stretch_break_enabled",
        }
    }

    /// Interval key for a break track.
    #[must_use]
    pub const fn interval(kind: BreakKind) -> Self {
        match kind {
            BreakKind::Eye => Self::EyeBreakInterval,
            BreakKind::Stretch => Self::StretchBreakInterval,
        }
    }

    /// Duration key for a break track.
    #[must_use]
    pub const fn duration(kind: BreakKind) -> Self {
        match kind {
            BreakKind::Eye => Self::EyeBreakDuration,
            BreakKind::Stretch => Self::StretchBreakDuration,
        }
    }

    /// Enabled-flag key for a break track.
    #[must_use]
    pub const fn enabled(kind: BreakKind) -> Self {
        match kind {
            BreakKind::Eye => Self::EyeBreakEnabled,
            BreakKind::Stretch => Self::StretchBreakEnabled,
        }
    }

    /// True for the four keys holding seconds.
    #[must_use]
    pub const fn is_seconds(self) -> bool {
        !self.is_flag()
    }

    /// True for the two enabled flags.
    #[must_use]
    pub const fn is_flag(self) -> bool {
        matches!(self, Self::EyeBreakEnabled | Self::StretchBreakEnabled)
    }

    /// Value used when nothing valid is stored.
    #[must_use]
    pub const fn default_value(self) -> SettingValue {
        match self {
            Self::EyeBreakInterval => SettingValue::Seconds(DEFAULT_EYE_INTERVAL_SECS),
            Self::EyeBreakDuration => SettingValue::Seconds(DEFAULT_EYE_DURATION_SECS),
            Self::StretchBreakInterval => SettingValue::Seconds(DEFAULT_STRETCH_INTERVAL_SECS),
            Self::StretchBreakDuration => SettingValue::Seconds(DEFAULT_STRETCH_DURATION_SECS),
            Self::EyeBreakEnabled | Self::StretchBreakEnabled => SettingValue::Flag(true),
        }
    }

    /// Parse a user-supplied string into a value of the right shape for this key.
    ///
    /// Seconds accept a plain number or a `s`/`m`/`h` suffix (`90`, `90s`, `20m`, `1h`).
    /// Flags accept `true/false`, `on/off`, `yes/no`, `1/0`.
    ///
    /// # Errors
    /// Returns [`SettingsError::InvalidValue`] when the input does not parse.
    pub fn parse_value(self, input: &str) -> Result<SettingValue, SettingsError> {
        let invalid = || SettingsError::InvalidValue {
            key: self,
            value: input.to_owned(),
        };
        if self.is_flag() {
            parse_flag(input).map(SettingValue::Flag).ok_or_else(invalid)
        } else {
            parse_seconds(input)
                .map(SettingValue::Seconds)
                .ok_or_else(invalid)
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == wanted)
            .ok_or_else(|| SettingsError::UnknownKey(s.to_owned()))
    }
}

/// A stored scalar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    /// A duration in seconds.
    Seconds(f64),
    /// An on/off switch.
    Flag(bool),
}

impl SettingValue {
    /// Seconds if this value holds a usable (finite, strictly positive) duration.
    #[must_use]
    pub fn positive_seconds(self) -> Option<f64> {
        match self {
            Self::Seconds(secs) if secs.is_finite() && secs > 0.0 => Some(secs),
            _ => None,
        }
    }

    /// The flag, if this value holds one.
    #[must_use]
    pub const fn flag(self) -> Option<bool> {
        match self {
            Self::Flag(on) => Some(on),
            Self::Seconds(_) => None,
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seconds(secs) => write!(f, "{secs}"),
            Self::Flag(on) => write!(f, "{on}"),
        }
    }
}

/// Errors raised by settings parsing and persistence.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The key name is not one of the six known settings.
    #[error("unknown setting '{0}'")]
    UnknownKey(String),

    /// The value does not fit the key.
    #[error("invalid value '{value}' for {key}")]
    InvalidValue {
        /// Target key.
        key: SettingKey,
        /// Raw user input.
        value: String,
    },

    /// The backing store could not persist the change.
    #[error("failed to persist settings: {0}")]
    Persist(String),
}

/// Key-value access to persisted settings.
///
/// Implementations store raw values; default substitution happens in
/// [`SchedulerConfig::resolve`], never in the store.
pub trait SettingsStore {
    /// Read the raw stored value, if any.
    fn get(&self, key: SettingKey) -> Option<SettingValue>;

    /// Store a value.
    ///
    /// # Errors
    /// Returns [`SettingsError::Persist`] when the backing storage fails.
    fn set(&mut self, key: SettingKey, value: SettingValue) -> Result<(), SettingsError>;

    /// Forget a stored value so the default applies again.
    ///
    /// # Errors
    /// Returns [`SettingsError::Persist`] when the backing storage fails.
    fn remove(&mut self, key: SettingKey) -> Result<(), SettingsError>;
}

impl<S: SettingsStore + ?Sized> SettingsStore for Box<S> {
    fn get(&self, key: SettingKey) -> Option<SettingValue> {
        (**self).get(key)
    }

    fn set(&mut self, key: SettingKey, value: SettingValue) -> Result<(), SettingsError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: SettingKey) -> Result<(), SettingsError> {
        (**self).remove(key)
    }
}

/// In-memory store. Used by tests and ephemeral sessions.
#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    values: HashMap<SettingKey, SettingValue>,
}

impl MemorySettings {
    /// Empty store (every key resolves to its default).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper for tests and fixtures.
    #[must_use]
    pub fn with(mut self, key: SettingKey, value: SettingValue) -> Self {
        self.values.insert(key, value);
        self
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: SettingKey) -> Option<SettingValue> {
        self.values.get(&key).copied()
    }

    fn set(&mut self, key: SettingKey, value: SettingValue) -> Result<(), SettingsError> {
        self.values.insert(key, value);
        Ok(())
    }

    fn remove(&mut self, key: SettingKey) -> Result<(), SettingsError> {
        self.values.remove(&key);
        Ok(())
    }
}

/// Settings for one break track after default substitution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrackConfig {
    /// Seconds of work before the break is due.
    pub interval_secs: f64,
    /// Break length in seconds.
    pub duration_secs: f64,
    /// Whether the track triggers at all.
    pub enabled: bool,
}

/// Resolved scheduler configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SchedulerConfig {
    /// Eye track.
    pub eye: TrackConfig,
    /// Stretch track.
    pub stretch: TrackConfig,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::resolve(&MemorySettings::new())
    }
}

impl SchedulerConfig {
    /// Read every key from `store`, substituting defaults for anything missing,
    /// non-positive, non-finite, or of the wrong type.
    #[must_use]
    pub fn resolve<S: SettingsStore + ?Sized>(store: &S) -> Self {
        Self {
            eye: resolve_track(store, BreakKind::Eye),
            stretch: resolve_track(store, BreakKind::Stretch),
        }
    }

    /// Settings for one track.
    #[must_use]
    pub const fn track(&self, kind: BreakKind) -> &TrackConfig {
        match kind {
            BreakKind::Eye => &self.eye,
            BreakKind::Stretch => &self.stretch,
        }
    }

    /// The resolved value of a single key.
    #[must_use]
    pub const fn value(&self, key: SettingKey) -> SettingValue {
        match key {
            SettingKey::EyeBreakInterval => SettingValue::Seconds(self.eye.interval_secs),
            SettingKey::EyeBreakDuration => SettingValue::Seconds(self.eye.duration_secs),
            SettingKey::StretchBreakInterval => SettingValue::Seconds(self.stretch.interval_secs),
            SettingKey::StretchBreakDuration => SettingValue::Seconds(self.stretch.duration_secs),
            SettingKey::EyeBreakEnabled => SettingValue::Flag(self.eye.enabled),
            SettingKey::StretchBreakEnabled => SettingValue::Flag(self.stretch.enabled),
        }
    }
}

fn resolve_track<S: SettingsStore + ?Sized>(store: &S, kind: BreakKind) -> TrackConfig {
    TrackConfig {
        interval_secs: resolve_seconds(store, SettingKey::interval(kind)),
        duration_secs: resolve_seconds(store, SettingKey::duration(kind)),
        enabled: resolve_flag(store, SettingKey::enabled(kind)),
    }
}

fn resolve_seconds<S: SettingsStore + ?Sized>(store: &S, key: SettingKey) -> f64 {
    store
        .get(key)
        .and_then(SettingValue::positive_seconds)
        .or_else(|| key.default_value().positive_seconds())
        .unwrap_or_default()
}

fn resolve_flag<S: SettingsStore + ?Sized>(store: &S, key: SettingKey) -> bool {
    store
        .get(key)
        .and_then(SettingValue::flag)
        .or_else(|| key.default_value().flag())
        .unwrap_or(true)
}

fn parse_flag(input: &str) -> Option<bool> {
    match input.trim().to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Some(true),
        "false" | "off" | "no" | "0" => Some(false),
        _ => None,
    }
}

fn parse_seconds(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    let (number, scale) = match trimmed.char_indices().last()? {
        (idx, 's') => (&trimmed[..idx], 1.0),
        (idx, 'm') => (&trimmed[..idx], 60.0),
        (idx, 'h') => (&trimmed[..idx], 3600.0),
        _ => (trimmed, 1.0),
    };
    let value: f64 = number.trim().parse().ok()?;
    value.is_finite().then_some(value * scale)
}
