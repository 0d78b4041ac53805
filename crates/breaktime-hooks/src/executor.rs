//! Hook execution logic

use crate::{HookContext, HookError, HookKind, HookResult, HooksConfig, Result};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Output, Stdio};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Executor for running hook scripts
#[derive(Debug, Clone)]
pub struct HookExecutor {
    config: HooksConfig,
    base_dir: PathBuf,
}

impl HookExecutor {
    /// Create a new hook executor
    ///
    /// `base_dir` is the directory `hooks_dir` is resolved against, normally
    /// `<config_dir>/breaktime`.
    #[must_use]
    pub const fn new(config: HooksConfig, base_dir: PathBuf) -> Self {
        Self { config, base_dir }
    }

    /// Executor that never runs anything
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(
            HooksConfig {
                enabled: false,
                ..HooksConfig::default()
            },
            PathBuf::new(),
        )
    }

    /// Directory scripts are looked up in
    #[must_use]
    pub fn hooks_dir(&self) -> PathBuf {
        self.base_dir.join(&self.config.hooks_dir)
    }

    /// Execute a hook script
    ///
    /// A disabled hook returns [`HookResult::skipped`]. A non-zero exit is
    /// reported in the result, not as an error; use
    /// [`HookExecutor::run`] to treat it as one.
    ///
    /// # Errors
    ///
    /// Returns an error if the script is missing, cannot be spawned, or
    /// exceeds the configured timeout.
    pub fn execute(&self, kind: HookKind, context: &HookContext) -> Result<HookResult> {
        let hook_name = kind.script_name();
        if !self.config.is_hook_enabled(hook_name) {
            return Ok(HookResult::skipped());
        }

        let script_path = self.find_hook_script(hook_name)?;
        let input_json = serde_json::to_string(context)?;
        self.execute_script(&script_path, &input_json)
    }

    /// Execute a hook script and fail on a non-zero exit code
    ///
    /// # Errors
    ///
    /// Everything [`HookExecutor::execute`] returns, plus
    /// [`HookError::Failed`] for a non-zero exit.
    pub fn run(&self, kind: HookKind, context: &HookContext) -> Result<HookResult> {
        let result = self.execute(kind, context)?;
        if result.is_success() {
            Ok(result)
        } else {
            Err(HookError::Failed {
                hook: kind.script_name(),
                code: result.exit_code,
                stderr: result.stderr,
            })
        }
    }

    fn find_hook_script(&self, hook_name: &str) -> Result<PathBuf> {
        let hooks_dir = self.hooks_dir();
        let script_path = hooks_dir.join(hook_name);
        if script_path.is_file() {
            Ok(script_path)
        } else {
            Err(HookError::NotFound(format!(
                "{hook_name} in {}",
                hooks_dir.display()
            )))
        }
    }

    fn execute_script(&self, script_path: &Path, input_json: &str) -> Result<HookResult> {
        let mut child = Command::new(script_path)
            .current_dir(&self.base_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| HookError::ExecutionFailed(format!("{}: {err}", script_path.display())))?;

        if let Some(mut stdin) = child.stdin.take() {
            // Scripts that ignore stdin may exit before we finish writing.
            match stdin.write_all(input_json.as_bytes()) {
                Err(err) if err.kind() == ErrorKind::BrokenPipe => {}
                other => other?,
            }
        }

        let output = wait_with_timeout(&mut child, Duration::from_secs(self.config.timeout))?;

        Ok(HookResult {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            skipped: false,
        })
    }
}

/// Wait for a child process, killing it once `timeout` elapses
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<Output> {
    let start = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                return Ok(Output {
                    status,
                    stdout: drain(child.stdout.take()),
                    stderr: drain(child.stderr.take()),
                });
            }
            Ok(None) => {
                if start.elapsed() >= timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(HookError::Timeout(timeout.as_secs()));
                }
                std::thread::sleep(POLL_INTERVAL);
            }
            Err(err) => return Err(HookError::ExecutionFailed(err.to_string())),
        }
    }
}

fn drain(pipe: Option<impl Read>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut buf);
    }
    buf
}
