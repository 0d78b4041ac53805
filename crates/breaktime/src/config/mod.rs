//! Configuration for the breaktime binary.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use breaktime_app::HookRunner;
use breaktime_app::settings_file::SETTINGS_FILE;
use breaktime_hooks::{HookExecutor, HooksConfig};
use serde::{Deserialize, Serialize};

pub mod keybindings;

pub use keybindings::{Action, KeyBindingsConfig, ViewType};

const APP_DIR: &str = "breaktime";
const CONFIG_FILE: &str = "config.toml";

/// Top-level configuration for breaktime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// TUI configuration.
    pub tui: TuiConfig,
    /// Hook scripts.
    pub hooks: HooksConfig,
    /// End-of-break cue.
    pub notify: NotifyConfig,
}

/// TUI-specific configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Keybindings configuration.
    pub keybindings: KeyBindingsConfig,
}

/// How the end of a break is announced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifyConfig {
    /// Ring the terminal bell when a break countdown completes.
    pub bell: bool,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self { bell: true }
    }
}

impl Config {
    /// Hook runner for scripts under `base_dir`.
    pub fn hook_runner(&self, base_dir: &Path) -> HookRunner {
        HookRunner::new(HookExecutor::new(self.hooks.clone(), base_dir.to_path_buf()))
    }
}

/// Locations of the config file and the settings store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    /// `config.toml` (keybindings, hooks, notify).
    pub config: PathBuf,
    /// `settings.toml` (break intervals and durations).
    pub settings: PathBuf,
}

impl ConfigPaths {
    /// Apply command-line overrides on top of the default locations.
    pub fn resolve(settings: Option<PathBuf>, config: Option<PathBuf>) -> Result<Self> {
        Self::resolve_in(default_config_dir(), settings, config)
    }

    fn resolve_in(
        dir: Option<PathBuf>,
        settings: Option<PathBuf>,
        config: Option<PathBuf>,
    ) -> Result<Self> {
        let under_dir = |file: &str| {
            dir.as_ref().map(|dir| dir.join(file)).ok_or_else(|| {
                anyhow!("could not determine the config directory; pass --config and --settings")
            })
        };
        let config = match config {
            Some(path) => path,
            None => under_dir(CONFIG_FILE)?,
        };
        let settings = match settings {
            Some(path) => path,
            None => under_dir(SETTINGS_FILE)?,
        };
        Ok(Self { config, settings })
    }

    /// Directory hook paths are resolved against: the config file's parent.
    pub fn base_dir(&self) -> PathBuf {
        self.config
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }
}

/// `~/.config/breaktime` on Linux, `~/Library/Application Support/breaktime` on macOS.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR))
}

/// Generate the default configuration as a commented TOML string.
pub fn generate_default_config_toml() -> Result<String> {
    let toml_str = toml::to_string_pretty(&Config::default())
        .context("Failed to serialize the default configuration")?;

    let header = r#"# breaktime configuration
#
# [tui.keybindings.*]
# Each action can have multiple key bindings. Actions left out keep their
# default keys.
#
# Supported key formats:
# - Single characters: "j", "k", "+", "1"
# - Special keys: "Enter", "Esc", "Space", "Tab", "Backspace", "Delete"
# - Arrow keys: "Up", "Down", "Left", "Right"
# - Modified keys: "Ctrl+c", "Alt+k", "Shift+Up"
#
# [hooks]
# Executable scripts named break-start, break-end and break-complete in
# hooks_dir (relative to this file) receive a JSON context on stdin.
# List script names under `disabled` to turn individual hooks off.
#
# [notify]
# bell rings the terminal bell when a break countdown finishes.

"#;

    Ok(format!("{header}{toml_str}"))
}

/// Load configuration from a TOML file.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_config(path: &Path) -> Result<Option<Config>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    Ok(Some(config))
}

/// Load and validate `path`, falling back to defaults when it does not exist.
pub fn load_or_default(path: &Path) -> Result<Config> {
    let config = load_config(path)?.unwrap_or_default();
    config
        .tui
        .keybindings
        .validate()
        .with_context(|| format!("Invalid keybindings in {}", path.display()))?;
    Ok(config)
}

/// Write a commented default configuration file to `path`.
pub fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force && !confirm_overwrite(path)? {
        println!("Aborted.");
        return Ok(());
    }

    write_default_config(path)?;

    println!("✓ Wrote configuration file: {}", path.display());
    println!();
    println!("Edit it to customize keybindings, hooks and the bell.");
    println!("Restart breaktime to apply changes.");
    Ok(())
}

fn write_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let content = generate_default_config_toml()?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))
}

fn confirm_overwrite(path: &Path) -> Result<bool> {
    print!("File already exists: {}\nOverwrite? [y/N]: ", path.display());
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
}
