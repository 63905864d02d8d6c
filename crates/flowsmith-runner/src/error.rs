//! Error types for process invocation

use thiserror::Error;

/// Errors surfaced while launching or supervising an external process.
///
/// A process that launched and exited non-zero is NOT an error at this layer;
/// callers inspect [`ProcessOutput`](crate::ProcessOutput) and classify it in
/// their own domain. `RunnerError` covers only the cases where no usable
/// output exists.
#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Failed to spawn {program}: {reason}")]
    SpawnFailed { program: String, reason: String },

    #[error("Process I/O failed: {reason}")]
    Io { reason: String },

    #[error("Execution timed out after {timeout_seconds} seconds")]
    Timeout { timeout_seconds: u64 },
}
