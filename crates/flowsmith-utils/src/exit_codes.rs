//! Exit code constants and error mapping for flowsmith.
//!
//! # Exit Code Table
//!
//! | Code | Constant | Description |
//! |------|----------|-------------|
//! | 0 | `SUCCESS` | Pipeline completed, report written |
//! | 1 | `INTERNAL` | General/internal failure (store or report I/O) |
//! | 2 | `CONFIG` | Invalid or unloadable configuration |
//! | 10 | `STAGE_TIMEOUT` | An engine call timed out |
//! | 60 | `GENERATION_FAILURE` | Generator declined or is misconfigured |
//! | 70 | `ENGINE_FAILURE` | Engine command/transport/response failure |

/// Type-safe exit code for the flowsmith binary.
///
/// Use the named constants for common exit codes, or
/// [`as_i32()`](Self::as_i32) to get the numeric value for
/// `std::process::exit()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(i32);

impl ExitCode {
    /// Pipeline completed successfully
    pub const SUCCESS: ExitCode = ExitCode(0);

    /// General/internal failure
    pub const INTERNAL: ExitCode = ExitCode(1);

    /// Invalid or unloadable configuration
    pub const CONFIG: ExitCode = ExitCode(2);

    /// An engine call timed out
    pub const STAGE_TIMEOUT: ExitCode = ExitCode(10);

    /// Generator declined the request or is misconfigured
    pub const GENERATION_FAILURE: ExitCode = ExitCode(60);

    /// Engine command, transport, or response failure
    pub const ENGINE_FAILURE: ExitCode = ExitCode(70);

    /// Get the numeric exit code value.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    /// Construct from a raw numeric value.
    #[must_use]
    pub const fn from_i32(code: i32) -> Self {
        Self(code)
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
