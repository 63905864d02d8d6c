//! CLI entry point: one pipeline run for the built-in sample request.
//!
//! The binary takes no arguments. Configuration comes from `flowsmith.toml`
//! in the current directory when present, otherwise built-in defaults.
//! Diagnostics go to stderr via tracing; stdout carries only the final
//! result block.

use flowsmith_config::Config;
use flowsmith_pipeline::{Orchestrator, PipelineRun};
use flowsmith_utils::error::{FlowsmithError, UserFriendlyError};
use flowsmith_utils::exit_codes::ExitCode;
use flowsmith_utils::logging::init_tracing;

/// The demonstration request the binary runs.
pub const SAMPLE_REQUEST: &str = "I need a simple two-step approval workflow for a document, \
    first by a manager, then by the finance team.";

/// Run the pipeline for [`SAMPLE_REQUEST`].
///
/// Handles all output:
/// - On success: prints the result block and returns `Ok(())`
/// - On error: prints the user-facing report to stderr, returns `Err(ExitCode)`
///
/// main.rs only calls `std::process::exit(code.as_i32())` on error - it does NOT print.
pub fn run() -> Result<(), ExitCode> {
    // Configuration first; logging verbosity comes from it.
    let config = match Config::discover() {
        Ok(config) => config,
        Err(err) => {
            let err = FlowsmithError::from(err);
            eprintln!("{}", err.display_for_user());
            return Err(err.to_exit_code());
        }
    };
    init_tracing(config.verbose);

    tracing::info!(
        source = %config.source,
        workspace = %config.workspace_dir,
        engine = %config.engine.base_url,
        "configuration loaded"
    );

    // Create tokio runtime for async operations
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("✗ Failed to create async runtime: {e}");
            return Err(ExitCode::INTERNAL);
        }
    };

    let outcome: Result<PipelineRun, FlowsmithError> = rt.block_on(async move {
        let mut pipeline = Orchestrator::from_config(config)?;
        pipeline
            .run(SAMPLE_REQUEST)
            .await
            .map_err(FlowsmithError::from)
    });

    match outcome {
        Ok(run) => {
            println!("✓ Workflow deployed and started");
            println!("  Process definition: {}", run.definition_id);
            println!("  Process instance:   {}", run.instance_id);
            println!("  Artifact:           {}", run.artifact.path);
            println!("  Report:             {}", run.report.path);
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", err.display_for_user());
            Err(err.to_exit_code())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_request_matches_the_template_catalog() {
        assert!(SAMPLE_REQUEST.to_lowercase().contains("two-step approval"));
    }
}
