//! In-process HTTP transport built on reqwest.
//!
//! Behaves like the curl transport from the client's point of view: the
//! body comes back whatever the status was, and only transport-level
//! failures (connect, timeout, request build) are errors. Unlike curl it
//! observes the HTTP status and reports it on the response.

use std::time::Duration;

use flowsmith_config::Config;
use flowsmith_utils::error::EngineError;

use crate::request::{EngineRequest, EngineResponse, EngineTransport, RequestBody};

/// Transport using an in-process HTTP client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpTransport {
    /// Construct from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Transport`] when the HTTP client cannot be
    /// constructed.
    pub fn new(config: &Config) -> Result<Self, EngineError> {
        Self::with_timeout(config.engine_timeout())
    }

    /// Construct with an explicit per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Transport`] when the HTTP client cannot be
    /// constructed.
    pub fn with_timeout(timeout: Duration) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EngineError::Transport {
                reason: format!("failed to construct HTTP client: {e}"),
            })?;

        Ok(Self { client, timeout })
    }

    async fn build_request(
        &self,
        request: &EngineRequest,
    ) -> Result<reqwest::RequestBuilder, EngineError> {
        match &request.body {
            RequestBody::Json(value) => Ok(self.client.post(&request.url).json(value)),
            RequestBody::FileUpload { field, path } => {
                let bytes = tokio::fs::read(path.as_std_path()).await.map_err(|e| {
                    EngineError::Transport {
                        reason: format!("failed to read upload file {path}: {e}"),
                    }
                })?;
                let file_name = path
                    .file_name()
                    .unwrap_or("upload")
                    .to_string();
                let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
                let form = reqwest::multipart::Form::new().part(field.clone(), part);
                Ok(self.client.post(&request.url).multipart(form))
            }
        }
    }
}

#[async_trait::async_trait]
impl EngineTransport for HttpTransport {
    async fn send(&self, request: &EngineRequest) -> Result<EngineResponse, EngineError> {
        tracing::debug!(
            call = %request.call,
            url = %request.url,
            timeout_secs = self.timeout.as_secs(),
            "sending engine request via http"
        );

        let builder = self.build_request(request).await?;

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                EngineError::Timeout {
                    call: request.call,
                    duration: self.timeout,
                }
            } else {
                EngineError::Transport {
                    reason: format!("request to {} failed: {e}", request.url),
                }
            }
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| EngineError::Transport {
            reason: format!("failed to read response body: {e}"),
        })?;

        if !(200..300).contains(&status) {
            tracing::warn!(call = %request.call, status, "engine returned non-success status");
        }

        Ok(EngineResponse {
            status: Some(status),
            body,
        })
    }
}
