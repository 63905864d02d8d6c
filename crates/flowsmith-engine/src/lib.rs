//! Client for the workflow process engine.
//!
//! [`EngineClient`] speaks the engine's two-call API (deploy a definition,
//! start an instance) over a pluggable [`EngineTransport`]. Two transports
//! ship: [`CurlTransport`] drives the local curl binary through the process
//! runner with discrete arguments, and [`HttpTransport`] uses an in-process
//! HTTP client. Which one runs is configuration, not code.

pub mod client;
pub mod curl;
pub mod http;
pub mod request;

pub use client::EngineClient;
pub use curl::CurlTransport;
pub use http::HttpTransport;
pub use request::{EngineRequest, EngineResponse, EngineTransport, RequestBody};
