//! flowsmith - Workflow-definition pipeline with typed stage errors
//!
//! This crate turns a natural-language workflow request into a deployed,
//! running process instance plus a Markdown run report, through five fixed
//! stages: generate, persist, deploy, start, report.
//!
//! flowsmith can be used in two ways:
//! - **CLI**: Run the `flowsmith` binary; it executes the built-in sample
//!   request against the engine configured in `flowsmith.toml`
//! - **Library**: Add as a dependency and drive the pipeline programmatically
//!
//! # Quick Start (CLI)
//!
//! Point flowsmith at a running process engine and run it:
//!
//! ```bash
//! # Optional: write flowsmith.toml to override the defaults
//! #   [engine]
//! #   base_url = "http://localhost:8080"
//!
//! flowsmith
//! ```
//!
//! On success the workspace contains the generated definition
//! (`generated_workflow.bpmn20.xml`) and the run report (`test_summary.md`),
//! and both engine identifiers are printed.
//!
//! # Quick Start (Library)
//!
//! ```rust,no_run
//! use flowsmith::{Config, Orchestrator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::builder()
//!         .workspace_dir("/tmp/flowsmith-demo")
//!         .base_url("http://localhost:8080")
//!         .build()?;
//!
//!     let mut pipeline = Orchestrator::from_config(config)?;
//!     let run = pipeline
//!         .run("I need a simple two-step approval workflow for a document, \
//!               first by a manager, then by the finance team.")
//!         .await?;
//!
//!     println!("started instance {}", run.instance_id);
//!     Ok(())
//! }
//! ```
//!
//! # Stable Public API
//!
//! The following types are part of the stable public API:
//!
//! - [`Config`] and [`ConfigBuilder`] - Configuration management
//! - [`Orchestrator`] and [`PipelineRun`] - Pipeline execution
//! - [`DefinitionGenerator`] - Provider trait for definition generation
//! - [`FlowsmithError`] - Library error type
//! - [`ExitCode`] - CLI exit codes
//! - [`Stage`] and [`PipelineState`] - Observable pipeline state
//!
//! Internal modules are accessible via module paths but are marked
//! `#[doc(hidden)]` and are not covered by semver stability guarantees.

// ============================================================================
// Stable Public API
// ============================================================================

/// Configuration for flowsmith operations.
///
/// `Config` provides layered configuration: `flowsmith.toml` in the working
/// directory overrides built-in defaults. Use [`Config::discover()`] for
/// CLI-like behavior or [`Config::builder()`] for programmatic configuration
/// in embedding scenarios.
pub use flowsmith_config::Config;

/// Builder for programmatic configuration.
///
/// `ConfigBuilder` constructs a [`Config`] without touching the filesystem
/// or environment, which keeps embedding deterministic.
pub use flowsmith_config::ConfigBuilder;

/// Pipeline executor: five stages in fixed order, halting on first failure.
///
/// Use [`Orchestrator::from_config`] to assemble the configured generator,
/// engine client, and capability profile, then [`Orchestrator::run`] for a
/// single request. The state machine is observable via
/// [`Orchestrator::state`].
pub use flowsmith_pipeline::Orchestrator;

/// Everything a completed pipeline run produced: both engine identifiers,
/// the persisted artifact record, and the written report.
pub use flowsmith_pipeline::PipelineRun;

/// Provider trait for definition generation.
///
/// The pipeline works against this trait; implement it to plug in another
/// generation backend. The built-in `template` provider serves a fixed
/// pattern catalog deterministically.
pub use flowsmith_generator::DefinitionGenerator;

/// Library-level error type with rich context.
///
/// Provides user-facing rendering via
/// [`display_for_user()`](UserFriendlyError::display_for_user) and exit code
/// mapping via [`to_exit_code()`](FlowsmithError::to_exit_code).
///
/// Library code returns `FlowsmithError` and does NOT call
/// `std::process::exit()`.
pub use flowsmith_utils::error::FlowsmithError;

/// Exit codes matching the documented exit code table.
///
/// Use the named constants (e.g. [`ExitCode::SUCCESS`],
/// [`ExitCode::ENGINE_FAILURE`]) or [`as_i32()`](ExitCode::as_i32) for the
/// numeric value.
pub use flowsmith_utils::exit_codes::ExitCode;

/// The five working stages of a pipeline run, in execution order.
pub use flowsmith_utils::types::Stage;

/// Observable pipeline state: `Idle`, `Working(stage)`, `Completed`, or the
/// absorbing `Failed(stage)`.
pub use flowsmith_utils::types::PipelineState;

// Additional stable re-exports for convenience

/// Error categories for grouping similar errors.
pub use flowsmith_utils::error::ErrorCategory;

/// Trait for providing user-friendly error reporting.
///
/// Implemented by [`FlowsmithError`] and its component error types.
pub use flowsmith_utils::error::UserFriendlyError;

/// Identifier newtypes returned by the engine.
pub use flowsmith_utils::types::{ProcessDefinitionId, ProcessInstanceId};

// ============================================================================
// Internal modules - accessible but not stable
// ============================================================================

/// Returns the flowsmith version.
#[must_use]
pub fn flowsmith_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[doc(hidden)]
pub use flowsmith_utils::{error, exit_codes, logging, store, types};

#[doc(hidden)]
pub use flowsmith_config as config;

#[doc(hidden)]
pub use flowsmith_engine as engine;

#[doc(hidden)]
pub use flowsmith_generator as generator;

#[doc(hidden)]
pub use flowsmith_pipeline as pipeline;

#[doc(hidden)]
pub use flowsmith_report as report;

#[doc(hidden)]
pub use flowsmith_runner as runner;

// CLI module - internal implementation detail, not part of stable public API
// Exported to allow black-box testing of the binary's sample request
#[doc(hidden)]
pub mod cli;
