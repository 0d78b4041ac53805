//! `breaktime settings ...`

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result, bail};
use breaktime_core::{SchedulerConfig, SettingKey, SettingValue, SettingsStore, format_minutes};
use clap::Subcommand;

/// Settings subcommands.
#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// Show every setting with its effective value.
    List {
        /// Print the effective configuration as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the effective value of one setting.
    Get {
        /// Setting name, e.g. `eye_break_interval`.
        key: String,
    },

    /// Store a setting. Durations accept `90`, `90s`, `20m` or `1h`.
    Set {
        /// Setting name.
        key: String,
        /// New value.
        value: String,
    },

    /// Forget a stored setting so its default applies again.
    Reset {
        /// Setting name.
        key: String,
    },

    /// Print where settings are stored.
    Path,
}

/// Run a settings subcommand against `store`, writing results to `out`.
///
/// `location` is the settings file, or `None` for an in-memory store.
pub fn run<S: SettingsStore>(
    command: SettingsCommand,
    store: &mut S,
    location: Option<&Path>,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        SettingsCommand::List { json } => list(&*store, json, out),
        SettingsCommand::Get { key } => {
            let key: SettingKey = key.parse()?;
            let value = SchedulerConfig::resolve(&*store).value(key);
            writeln!(out, "{value}")?;
            Ok(())
        }
        SettingsCommand::Set { key, value } => {
            let key: SettingKey = key.parse()?;
            let parsed = key.parse_value(&value)?;
            if key.is_seconds() && parsed.positive_seconds().is_none() {
                bail!("{key} must be a positive duration, got '{value}'");
            }
            store
                .set(key, parsed)
                .with_context(|| format!("failed to store {key}"))?;
            writeln!(out, "{key} = {}", describe(parsed))?;
            Ok(())
        }
        SettingsCommand::Reset { key } => {
            let key: SettingKey = key.parse()?;
            store
                .remove(key)
                .with_context(|| format!("failed to reset {key}"))?;
            writeln!(out, "{key} reset to {}", describe(key.default_value()))?;
            Ok(())
        }
        SettingsCommand::Path => {
            match location {
                Some(path) => writeln!(out, "{}", path.display())?,
                None => writeln!(out, "(in memory, --ephemeral)")?,
            }
            Ok(())
        }
    }
}

fn list<S: SettingsStore>(store: &S, json: bool, out: &mut impl Write) -> Result<()> {
    let config = SchedulerConfig::resolve(store);
    if json {
        serde_json::to_writer_pretty(&mut *out, &config).context("failed to serialize settings")?;
        writeln!(out)?;
        return Ok(());
    }

    for key in SettingKey::ALL {
        let effective = config.value(key);
        let source = match store.get(key) {
            Some(stored) if stored == effective => "set",
            Some(_) => "invalid, using default",
            None => "default",
        };
        writeln!(out, "{:<24} {:<10} {source}", key.as_str(), describe(effective))?;
    }
    Ok(())
}

fn describe(value: SettingValue) -> String {
    match value {
        SettingValue::Seconds(secs) => format_minutes(secs),
        SettingValue::Flag(true) => "on".to_owned(),
        SettingValue::Flag(false) => "off".to_owned(),
    }
}
