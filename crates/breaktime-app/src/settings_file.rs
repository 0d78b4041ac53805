//! TOML file implementation of [`SettingsStore`].

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use breaktime_core::{SettingKey, SettingValue, SettingsError, SettingsStore};
use tracing::warn;

/// File name used under the breaktime config directory.
pub const SETTINGS_FILE: &str = "settings.toml";

/// Settings kept in memory and written through to a TOML file on every change.
///
/// The file is a flat table keyed by setting name. Durations are stored in
/// seconds; string values such as `"20m"` are accepted on load so the file
/// can be edited by hand.
#[derive(Debug, Clone)]
pub struct SettingsFile {
    path: PathBuf,
    values: BTreeMap<SettingKey, SettingValue>,
}

impl SettingsFile {
    /// Load the store at `path`. A missing file yields an empty store.
    ///
    /// Unknown keys and values of the wrong shape are skipped with a warning.
    ///
    /// # Errors
    /// Returns an error when the file exists but cannot be read or is not valid TOML.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            return Ok(Self {
                path,
                values: BTreeMap::new(),
            });
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let table: toml::Table = toml::from_str(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        let mut values = BTreeMap::new();
        for (name, raw) in table {
            let Ok(key) = name.parse::<SettingKey>() else {
                warn!(key = %name, file = %path.display(), "ignoring unknown setting");
                continue;
            };
            match value_from_toml(key, &raw) {
                Some(value) => {
                    values.insert(key, value);
                }
                None => warn!(%key, value = %raw, "ignoring malformed setting"),
            }
        }
        Ok(Self { path, values })
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), SettingsError> {
        let table: toml::Table = self
            .values
            .iter()
            .map(|(key, value)| (key.as_str().to_owned(), value_to_toml(*value)))
            .collect();
        let body = toml::to_string(&table).map_err(|err| SettingsError::Persist(err.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| persist_error(parent, &err))?;
        }
        fs::write(&self.path, body).map_err(|err| persist_error(&self.path, &err))
    }
}

impl SettingsStore for SettingsFile {
    fn get(&self, key: SettingKey) -> Option<SettingValue> {
        self.values.get(&key).copied()
    }

    fn set(&mut self, key: SettingKey, value: SettingValue) -> Result<(), SettingsError> {
        let previous = self.values.insert(key, value);
        self.persist().inspect_err(|_| {
            match previous {
                Some(old) => self.values.insert(key, old),
                None => self.values.remove(&key),
            };
        })
    }

    fn remove(&mut self, key: SettingKey) -> Result<(), SettingsError> {
        let Some(previous) = self.values.remove(&key) else {
            return Ok(());
        };
        self.persist().inspect_err(|_| {
            self.values.insert(key, previous);
        })
    }
}

fn persist_error(path: &Path, err: &std::io::Error) -> SettingsError {
    SettingsError::Persist(format!("{}: {err}", path.display()))
}

#[allow(clippy::cast_precision_loss)]
fn value_from_toml(key: SettingKey, raw: &toml::Value) -> Option<SettingValue> {
    match raw {
        toml::Value::Integer(secs) if key.is_seconds() => Some(SettingValue::Seconds(*secs as f64)),
        toml::Value::Float(secs) if key.is_seconds() => Some(SettingValue::Seconds(*secs)),
        toml::Value::Boolean(on) if key.is_flag() => Some(SettingValue::Flag(*on)),
        toml::Value::String(text) => key.parse_value(text).ok(),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn value_to_toml(value: SettingValue) -> toml::Value {
    match value {
        SettingValue::Seconds(secs) if secs.fract().abs() < f64::EPSILON && secs.abs() < 1e15 => {
            toml::Value::Integer(secs as i64)
        }
        SettingValue::Seconds(secs) => toml::Value::Float(secs),
        SettingValue::Flag(on) => toml::Value::Boolean(on),
    }
}
