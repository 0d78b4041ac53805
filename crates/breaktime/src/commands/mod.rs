//! Non-interactive subcommands.

pub mod settings;
pub mod watch;
