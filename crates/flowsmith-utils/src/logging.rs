//! Tracing setup and stage-scoped logging helpers.
//!
//! All diagnostics go to stderr; stdout stays clean for anything a caller
//! may want to pipe. `RUST_LOG` overrides the built-in filter when set.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::types::Stage;

/// Initialize the global tracing subscriber.
///
/// Filter precedence: `RUST_LOG` if set, otherwise `flowsmith=debug,info`
/// when `verbose`, otherwise `flowsmith=info,warn`.
///
/// Safe to call more than once; subsequent calls are no-ops, which keeps
/// test binaries that initialize per-test from panicking.
pub fn init_tracing(verbose: bool) {
    let filter = if let Ok(env_filter) = EnvFilter::try_from_default_env() {
        env_filter
    } else if verbose {
        EnvFilter::new("flowsmith=debug,info")
    } else {
        EnvFilter::new("flowsmith=info,warn")
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init();
}

/// Log the start of a pipeline stage.
pub fn log_stage_start(stage: Stage) {
    tracing::info!(stage = %stage, "stage started");
}

/// Log successful completion of a pipeline stage.
pub fn log_stage_complete(stage: Stage, duration_ms: u64) {
    tracing::info!(stage = %stage, duration_ms, "stage completed");
}

/// Log a stage failure. The caller still returns the typed error; this is
/// diagnostics only.
pub fn log_stage_error(stage: Stage, error: &dyn std::fmt::Display) {
    tracing::error!(stage = %stage, error = %error, "stage failed");
}
