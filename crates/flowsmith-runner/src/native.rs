//! Native process execution via Tokio

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;

use crate::command_spec::CommandSpec;
use crate::error::RunnerError;
use crate::process::{ProcessOutput, ProcessRunner};

/// Executes commands directly on the host through `tokio::process`.
///
/// The child is spawned with piped stdout/stderr and `kill_on_drop`, so a
/// timeout both abandons and terminates it — no orphaned curl hanging on a
/// dead engine connection.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeRunner;

impl NativeRunner {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessRunner for NativeRunner {
    async fn run(&self, cmd: &CommandSpec, timeout: Duration) -> Result<ProcessOutput, RunnerError> {
        let mut command = cmd.to_tokio_command();
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = command.spawn().map_err(|e| RunnerError::SpawnFailed {
            program: cmd.program.to_string_lossy().into_owned(),
            reason: e.to_string(),
        })?;

        match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => Ok(ProcessOutput::new(
                output.stdout,
                output.stderr,
                output.status.code(),
                false,
            )),
            Ok(Err(e)) => Err(RunnerError::Io {
                reason: e.to_string(),
            }),
            // Dropping the wait future kills the child (kill_on_drop)
            Err(_elapsed) => Err(RunnerError::Timeout {
                timeout_seconds: timeout.as_secs(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[cfg(unix)]
    async fn test_native_runner_captures_stdout() {
        let cmd = CommandSpec::new("echo").arg("hello");
        let output = NativeRunner::new()
            .run(&cmd, Duration::from_secs(10))
            .await
            .unwrap();

        assert!(output.success());
        assert_eq!(output.stdout_string().trim(), "hello");
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn test_native_runner_nonzero_exit() {
        let cmd = CommandSpec::new("false");
        let output = NativeRunner::new()
            .run(&cmd, Duration::from_secs(10))
            .await
            .unwrap();

        assert!(!output.success());
        assert_eq!(output.exit_code, Some(1));
    }

    #[tokio::test]
    #[cfg(unix)]
    async fn test_native_runner_timeout() {
        let cmd = CommandSpec::new("sleep").arg("30");
        let result = NativeRunner::new().run(&cmd, Duration::from_millis(100)).await;

        match result {
            Err(RunnerError::Timeout { .. }) => {}
            other => panic!("Expected Timeout error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_native_runner_spawn_failure() {
        let cmd = CommandSpec::new("flowsmith-no-such-binary-exists");
        let result = NativeRunner::new().run(&cmd, Duration::from_secs(5)).await;

        match result {
            Err(RunnerError::SpawnFailed { program, .. }) => {
                assert_eq!(program, "flowsmith-no-such-binary-exists");
            }
            other => panic!("Expected SpawnFailed error, got {other:?}"),
        }
    }
}
