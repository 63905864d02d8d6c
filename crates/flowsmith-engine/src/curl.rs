//! Curl transport.
//!
//! Renders an [`EngineRequest`] to a discrete curl argument vector and runs
//! it through a [`ProcessRunner`]. Every request-derived value (URL, JSON
//! payload, upload path) travels as its own argv entry; no shell parses any
//! of it.
//!
//! A non-zero curl exit becomes [`EngineError::CommandFailed`] carrying
//! both captured streams, stdout because curl writes any partial body
//! there and stderr because `-sS` keeps curl's own diagnostics on it.

use camino::Utf8PathBuf;
use std::sync::Arc;
use std::time::Duration;

use flowsmith_config::Config;
use flowsmith_runner::{CommandSpec, NativeRunner, ProcessRunner, RunnerError};
use flowsmith_utils::error::EngineError;

use crate::request::{EngineRequest, EngineResponse, EngineTransport, RequestBody};

/// Transport that shells out to curl, one discrete argument per value.
pub struct CurlTransport {
    runner: Arc<dyn ProcessRunner>,
    curl_program: Utf8PathBuf,
    timeout: Duration,
}

impl CurlTransport {
    /// Construct from configuration, resolving the curl binary.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Transport`] when no curl binary is configured
    /// and none can be found on `PATH`.
    pub fn new(config: &Config) -> Result<Self, EngineError> {
        let curl_program = match &config.engine.curl_program {
            Some(program) => program.clone(),
            None => Self::discover_curl()?,
        };

        Ok(Self::with_runner(
            Arc::new(NativeRunner::new()),
            curl_program,
            config.engine_timeout(),
        ))
    }

    /// Construct with an explicit runner and binary. This is the seam tests
    /// and embedders use to substitute execution.
    #[must_use]
    pub fn with_runner(
        runner: Arc<dyn ProcessRunner>,
        curl_program: impl Into<Utf8PathBuf>,
        timeout: Duration,
    ) -> Self {
        Self {
            runner,
            curl_program: curl_program.into(),
            timeout,
        }
    }

    /// Find curl on `PATH`.
    fn discover_curl() -> Result<Utf8PathBuf, EngineError> {
        let found = which::which("curl").map_err(|e| EngineError::Transport {
            reason: format!(
                "curl not found in PATH. Install curl or set [engine] curl_program. Error: {e}"
            ),
        })?;
        Utf8PathBuf::from_path_buf(found).map_err(|p| EngineError::Transport {
            reason: format!("curl path is not valid UTF-8: {}", p.display()),
        })
    }

    /// Render the request as a curl invocation. Pure; exercised directly by
    /// tests.
    fn build_command(&self, request: &EngineRequest) -> CommandSpec {
        let mut cmd = CommandSpec::new(self.curl_program.as_str())
            .arg("-sS")
            .arg("-X")
            .arg("POST");

        cmd = match &request.body {
            RequestBody::Json(value) => cmd
                .arg("-H")
                .arg("Content-Type: application/json")
                .arg("-d")
                .arg(value.to_string()),
            RequestBody::FileUpload { field, path } => {
                cmd.arg("-F").arg(format!("{field}=@{path}"))
            }
        };

        cmd.arg(request.url.as_str())
    }
}

#[async_trait::async_trait]
impl EngineTransport for CurlTransport {
    async fn send(&self, request: &EngineRequest) -> Result<EngineResponse, EngineError> {
        let cmd = self.build_command(request);

        tracing::debug!(
            call = %request.call,
            url = %request.url,
            curl = %self.curl_program,
            timeout_secs = self.timeout.as_secs(),
            "sending engine request via curl"
        );

        let output = self
            .runner
            .run(&cmd, self.timeout)
            .await
            .map_err(|e| match e {
                RunnerError::Timeout { timeout_seconds } => EngineError::Timeout {
                    call: request.call,
                    duration: Duration::from_secs(timeout_seconds),
                },
                other => EngineError::Transport {
                    reason: format!("failed to execute curl: {other}"),
                },
            })?;

        if output.timed_out {
            return Err(EngineError::Timeout {
                call: request.call,
                duration: self.timeout,
            });
        }

        if !output.success() {
            return Err(EngineError::CommandFailed {
                exit_code: output.exit_code,
                stdout: output.stdout_string(),
                stderr: output.stderr_string(),
            });
        }

        Ok(EngineResponse {
            status: None,
            body: output.stdout_string(),
        })
    }
}
