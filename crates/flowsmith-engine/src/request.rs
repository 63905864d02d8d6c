//! Structured engine requests and the transport seam.
//!
//! A request is data: endpoint URL plus a typed body. No transport ever
//! receives a pre-assembled command line or URL-with-payload string, so
//! request-derived values (file paths, definition ids) cannot change the
//! shape of what is sent.

use async_trait::async_trait;
use camino::Utf8PathBuf;

use flowsmith_utils::error::EngineError;
use flowsmith_utils::types::EngineCall;

/// One engine API call, described structurally.
#[derive(Debug, Clone)]
pub struct EngineRequest {
    /// Which logical operation this request performs; carried into error
    /// attribution.
    pub call: EngineCall,
    /// Full endpoint URL.
    pub url: String,
    /// POST body. Both engine endpoints take POST.
    pub body: RequestBody,
}

/// Typed POST body.
#[derive(Debug, Clone)]
pub enum RequestBody {
    /// `application/json` payload.
    Json(serde_json::Value),
    /// `multipart/form-data` upload of one file under a named form field.
    FileUpload { field: String, path: Utf8PathBuf },
}

/// What came back from the engine, before any interpretation.
///
/// The body is returned whatever the HTTP status was; deciding whether it
/// holds the expected JSON contract is the client's job, not the
/// transport's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineResponse {
    /// HTTP status when the transport observes it. The curl transport does
    /// not; it reports `None`.
    pub status: Option<u16>,
    /// Raw response body.
    pub body: String,
}

/// Trait for engine transports.
///
/// Implementations perform the HTTP call described by an [`EngineRequest`]
/// and hand back the raw body. Transport-level failures (spawn, connect,
/// timeout, non-zero exit) are errors; an HTTP error status with a body is
/// a response.
#[async_trait]
pub trait EngineTransport: Send + Sync {
    /// Send the request and return the raw response.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::CommandFailed`], [`EngineError::Transport`],
    /// or [`EngineError::Timeout`] depending on how the call failed.
    async fn send(&self, request: &EngineRequest) -> Result<EngineResponse, EngineError>;
}
