//! Hook errors

use std::io;

/// Shorthand for hook results.
pub type Result<T> = std::result::Result<T, HookError>;

/// Why a break hook did not run to a clean exit.
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    /// The script could not be spawned or waited on
    #[error("could not run hook script: {0}")]
    ExecutionFailed(String),

    /// The script was killed after the configured timeout
    #[error("hook script killed after {0}s")]
    Timeout(u64),

    /// The script exited with a non-zero status
    #[error("{hook} hook exited with status {code}: {stderr}")]
    Failed {
        /// Script name
        hook: &'static str,
        /// Exit status
        code: i32,
        /// Captured stderr
        stderr: String,
    },

    /// Writing the context to the script failed
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The context could not be serialized
    #[error("could not encode hook context: {0}")]
    Json(#[from] serde_json::Error),

    /// No executable with the hook's name in the hooks directory
    #[error("no hook script {0}")]
    NotFound(String),
}

impl HookError {
    /// Missing scripts are the normal case for users who never wrote one.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
