use async_trait::async_trait;
use std::time::Duration;

use crate::error::RunnerError;

use super::CommandSpec;

/// Output from a process execution.
///
/// Carries everything a caller needs to classify the outcome: both captured
/// streams, the exit code, and whether the run was cut short by a timeout.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    /// Standard output from the process
    pub stdout: Vec<u8>,
    /// Standard error from the process
    pub stderr: Vec<u8>,
    /// Exit code from the process (None if terminated by signal)
    pub exit_code: Option<i32>,
    /// Whether the execution timed out
    pub timed_out: bool,
}

impl ProcessOutput {
    /// Create a new `ProcessOutput` with the given values.
    #[must_use]
    pub fn new(stdout: Vec<u8>, stderr: Vec<u8>, exit_code: Option<i32>, timed_out: bool) -> Self {
        Self {
            stdout,
            stderr,
            exit_code,
            timed_out,
        }
    }

    /// Get stdout as a UTF-8 string, lossy conversion.
    #[must_use]
    pub fn stdout_string(&self) -> String {
        String::from_utf8_lossy(&self.stdout).to_string()
    }

    /// Get stderr as a UTF-8 string, lossy conversion.
    #[must_use]
    pub fn stderr_string(&self) -> String {
        String::from_utf8_lossy(&self.stderr).to_string()
    }

    /// Check if the process exited successfully (exit code 0).
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == Some(0) && !self.timed_out
    }
}

/// Trait for process execution.
///
/// Implementations MUST use argv-style APIs only (no shell string
/// evaluation). [`CommandSpec`] ensures arguments are passed as discrete
/// elements, preventing shell injection.
///
/// # Returns
///
/// * `Ok(ProcessOutput)` — the process completed (possibly with non-zero
///   exit code; classifying that is the caller's concern)
/// * `Err(RunnerError::Timeout)` — the process exceeded the timeout
/// * `Err(RunnerError::*)` — the process could not be launched or read
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Execute a command with the given timeout.
    async fn run(&self, cmd: &CommandSpec, timeout: Duration) -> Result<ProcessOutput, RunnerError>;
}
