use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The two independent break tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakKind {
    /// Short rest for the eyes (20-20-20 rule).
    #[default]
    Eye,
    /// Longer break to stand up and move.
    Stretch,
}

impl BreakKind {
    /// Every kind, in priority order (highest first).
    pub const BY_PRIORITY: [Self; 2] = [Self::Stretch, Self::Eye];

    /// String representation used in configuration files and hook payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eye => "eye",
            Self::Stretch => "stretch",
        }
    }

    /// Capitalized label for status lines.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Eye => "Eye",
            Self::Stretch => "Stretch",
        }
    }
}

impl fmt::Display for BreakKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a break kind name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown break kind '{0}' (expected 'eye' or 'stretch')")]
pub struct ParseBreakKindError(String);

impl FromStr for BreakKind {
    type Err = ParseBreakKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "eye" => Ok(Self::Eye),
            "stretch" => Ok(Self::Stretch),
            other => Err(ParseBreakKindError(other.to_owned())),
        }
    }
}
