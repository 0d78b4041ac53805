//! Hook configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for hook execution, read from the `[hooks]` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HooksConfig {
    /// Whether hooks are enabled
    pub enabled: bool,

    /// Script names that must not run, e.g. `"break-end"`
    pub disabled: Vec<String>,

    /// Timeout in seconds for a single script
    pub timeout: u64,

    /// Directory containing hook scripts, relative to the config directory
    pub hooks_dir: PathBuf,
}

impl Default for HooksConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            disabled: Vec::new(),
            timeout: 10,
            hooks_dir: PathBuf::from("hooks"),
        }
    }
}

impl HooksConfig {
    /// Check if a specific hook is enabled
    #[must_use]
    pub fn is_hook_enabled(&self, hook_name: &str) -> bool {
        self.enabled && !self.disabled.iter().any(|name| name == hook_name)
    }
}
