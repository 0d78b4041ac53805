//! Hook types and context

use breaktime_core::BreakKind;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Points in the break lifecycle where a script may run
///
/// For a break that runs to completion the order is `BreakStart`,
/// `BreakComplete`, `BreakEnd`. A skipped break fires only `BreakStart` and
/// `BreakEnd`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookKind {
    /// A break overlay was shown
    BreakStart,

    /// The break overlay was dismissed, by completion or skip
    BreakEnd,

    /// The countdown reached zero
    ///
    /// # Use Cases
    /// - Play a chime (`afplay /System/Library/Sounds/Glass.aiff`)
    /// - Post a desktop notification
    BreakComplete,
}

impl HookKind {
    /// All hook kinds, in lifecycle order
    pub const ALL: [Self; 3] = [Self::BreakStart, Self::BreakComplete, Self::BreakEnd];

    /// Returns the script name for this hook kind
    #[must_use]
    pub const fn script_name(self) -> &'static str {
        match self {
            Self::BreakStart => "break-start",
            Self::BreakEnd => "break-end",
            Self::BreakComplete => "break-complete",
        }
    }
}

/// JSON document written to the script's stdin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookContext {
    /// Script name of the hook being run
    pub hook: String,
    /// Kind of break
    pub kind: BreakKind,
    /// Configured break length in seconds
    pub duration_secs: f64,
    /// RFC 3339 time the hook was fired
    pub timestamp: String,
}

impl HookContext {
    /// Context stamped with the current UTC time
    #[must_use]
    pub fn new(hook: HookKind, kind: BreakKind, duration_secs: f64) -> Self {
        Self::at(hook, kind, duration_secs, OffsetDateTime::now_utc())
    }

    /// Context stamped with `ts`
    #[must_use]
    pub fn at(hook: HookKind, kind: BreakKind, duration_secs: f64, ts: OffsetDateTime) -> Self {
        Self {
            hook: hook.script_name().to_owned(),
            kind,
            duration_secs,
            timestamp: ts.format(&Rfc3339).unwrap_or_else(|_| ts.to_string()),
        }
    }
}

/// Result from hook execution
#[derive(Debug, Clone, Default)]
pub struct HookResult {
    /// Exit code from the hook script
    pub exit_code: i32,
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
    /// The script was not run because the hook is disabled
    pub skipped: bool,
}

impl HookResult {
    /// Result for a hook that was not run
    #[must_use]
    pub fn skipped() -> Self {
        Self {
            skipped: true,
            ..Self::default()
        }
    }

    /// Returns true if the hook execution was successful
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}
