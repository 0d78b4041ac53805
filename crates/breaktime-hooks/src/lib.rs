//! Hook execution for breaktime
//!
//! User scripts named after break lifecycle events (`break-start`,
//! `break-end`, `break-complete`) are run with a JSON description of the
//! break on stdin. Every hook is fire-and-forget: a failing script is
//! reported to the caller but never changes scheduling.

mod config;
mod error;
mod executor;
mod types;

pub use config::HooksConfig;
pub use error::{HookError, Result};
pub use executor::HookExecutor;
pub use types::{HookContext, HookKind, HookResult};
