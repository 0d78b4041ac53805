//! CLI entry point for breaktime.

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use breaktime_app::SettingsFile;
use breaktime_core::{MemorySettings, SettingsStore};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

use commands::settings::SettingsCommand;
use config::ConfigPaths;

mod commands;
mod config;
mod messages;
mod tui;

/// Eye-rest and stretch break reminders for the terminal.
#[derive(Parser, Debug)]
#[command(
    name = "breaktime",
    version,
    about = "breaktime: 20-minute eye breaks and hourly stretch breaks, in your terminal"
)]
struct Cli {
    /// Settings file (defaults to <config dir>/breaktime/settings.toml).
    #[arg(long, global = true, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Keep settings in memory for this session only.
    #[arg(long, global = true, conflicts_with = "settings")]
    ephemeral: bool,

    /// Configuration file for keybindings and hooks.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Launch the interactive terminal UI (the default).
    Tui,

    /// Run without a UI, logging breaks until Ctrl-C.
    Watch,

    /// Inspect or change break settings.
    Settings {
        #[command(subcommand)]
        action: SettingsCommand,
    },

    /// Write a commented default configuration file.
    InitConfig {
        /// Where to write (defaults to the active config path).
        #[arg(long)]
        output: Option<PathBuf>,
        /// Overwrite without asking.
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let Cli {
        settings,
        ephemeral,
        config,
        cmd,
    } = Cli::parse();
    let cmd = cmd.unwrap_or(Command::Tui);

    if should_install_tracing(&cmd) {
        install_tracing();
    }

    let paths = ConfigPaths::resolve(settings, config)?;
    execute_command(&paths, ephemeral, cmd)
}

fn execute_command(paths: &ConfigPaths, ephemeral: bool, command: Command) -> Result<()> {
    match command {
        Command::InitConfig { output, force } => {
            config::init_config(output.as_deref().unwrap_or(&paths.config), force)
        }

        Command::Settings { action } => {
            let mut store = open_settings(paths, ephemeral)?;
            let location = (!ephemeral).then_some(paths.settings.as_path());
            commands::settings::run(action, &mut store, location, &mut io::stdout().lock())
        }

        Command::Watch => {
            let app_config = config::load_or_default(&paths.config)?;
            commands::watch::run(open_settings(paths, ephemeral)?, &app_config, &paths.base_dir())
        }

        Command::Tui => {
            let app_config = config::load_or_default(&paths.config)?;
            tui::run(open_settings(paths, ephemeral)?, app_config, &paths.base_dir())
        }
    }
}

fn open_settings(paths: &ConfigPaths, ephemeral: bool) -> Result<Box<dyn SettingsStore + Send>> {
    if ephemeral {
        return Ok(Box::new(MemorySettings::new()));
    }
    Ok(Box::new(SettingsFile::open(&paths.settings)?))
}

const fn should_install_tracing(cmd: &Command) -> bool {
    !matches!(cmd, Command::Tui)
}

fn install_tracing() {
    // RUST_LOG overrides; INFO otherwise. Logs go to stderr so command output stays clean.
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .compact()
        .try_init();
}
