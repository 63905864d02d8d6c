//! Error taxonomy for flowsmith.
//!
//! One enum per failure domain (configuration, artifact store, generator,
//! engine client) plus [`PipelineError`], which attributes a domain error to
//! the pipeline stage it halted, and [`FlowsmithError`], the library-level
//! wrapper the binary consumes.
//!
//! Every error is typed; callers branch on variants rather than parsing
//! message text. [`UserFriendlyError`] supplies the operator-facing
//! rendering used by the binary:
//!
//! ```rust
//! use flowsmith_utils::error::{GeneratorError, PipelineError, UserFriendlyError};
//!
//! let err = PipelineError::Generate(GeneratorError::Declined {
//!     reason: "unsupported pattern".to_string(),
//! });
//! let text = err.display_for_user();
//! assert!(text.starts_with("Error:"));
//! ```

use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::exit_codes::ExitCode;
use crate::types::{EngineCall, PipelineState, Stage};

/// Trait for providing user-friendly error reporting.
///
/// Implemented by [`FlowsmithError`] and its component error types.
pub trait UserFriendlyError {
    /// Get a user-friendly error message
    fn user_message(&self) -> String;

    /// Get contextual information about the error
    fn context(&self) -> Option<String>;

    /// Get suggested actions to resolve the error
    fn suggestions(&self) -> Vec<String>;

    /// Get the error category for grouping similar errors
    fn category(&self) -> ErrorCategory;

    /// Render message, context, and suggestions as operator-facing text.
    fn display_for_user(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("Error: {}\n", self.user_message()));

        if let Some(ctx) = self.context() {
            output.push_str(&format!("\nContext: {ctx}\n"));
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str("\nSuggestions:\n");
            for suggestion in suggestions {
                output.push_str(&format!("  • {suggestion}\n"));
            }
        }

        output
    }
}

/// Categories of errors for grouping similar failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Generation,
    FileSystem,
    EngineIntegration,
    PipelineExecution,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration => write!(f, "Configuration"),
            Self::Generation => write!(f, "Generation"),
            Self::FileSystem => write!(f, "File System"),
            Self::EngineIntegration => write!(f, "Engine Integration"),
            Self::PipelineExecution => write!(f, "Pipeline Execution"),
        }
    }
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file {path}: {reason}")]
    FileRead { path: String, reason: String },

    #[error("Invalid configuration file {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl UserFriendlyError for ConfigError {
    fn user_message(&self) -> String {
        match self {
            Self::FileRead { path, reason } => {
                format!("Could not read configuration file '{path}': {reason}")
            }
            Self::Parse { path, reason } => {
                format!("Configuration file '{path}' is not valid TOML: {reason}")
            }
            Self::InvalidValue { field, reason } => {
                format!("Configuration '{field}' is invalid: {reason}")
            }
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::FileRead { .. } => None,
            Self::Parse { .. } => Some(
                "Configuration files use TOML with optional [engine], [generator], and [paths] sections."
                    .to_string(),
            ),
            Self::InvalidValue { field, .. } => Some(format!(
                "The '{field}' option has specific format requirements."
            )),
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FileRead { path, .. } => vec![
                format!("Check that '{path}' exists and is readable"),
                "Remove the file to fall back to built-in defaults".to_string(),
            ],
            Self::Parse { .. } => vec!["Validate the file with a TOML linter".to_string()],
            Self::InvalidValue { field, .. } => {
                vec![format!("Review the documented values for '{field}'")]
            }
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Configuration
    }
}

/// Artifact store errors: directory creation, file writes, file reads.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to create directory {path}: {reason}")]
    CreateDir { path: String, reason: String },

    #[error("Failed to write {path}: {reason}")]
    Write { path: String, reason: String },

    #[error("Failed to read {path}: {reason}")]
    Read { path: String, reason: String },
}

impl StoreError {
    /// The path the failed operation targeted.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::CreateDir { path, .. } | Self::Write { path, .. } | Self::Read { path, .. } => {
                path
            }
        }
    }
}

impl UserFriendlyError for StoreError {
    fn user_message(&self) -> String {
        match self {
            Self::CreateDir { path, reason } => {
                format!("Could not create directory '{path}': {reason}")
            }
            Self::Write { path, reason } => format!("Could not write file '{path}': {reason}"),
            Self::Read { path, reason } => format!("Could not read file '{path}': {reason}"),
        }
    }

    fn context(&self) -> Option<String> {
        None
    }

    fn suggestions(&self) -> Vec<String> {
        vec![
            "Check filesystem permissions on the workspace directory".to_string(),
            "Check available disk space".to_string(),
        ]
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::FileSystem
    }
}

/// Generator collaborator errors.
///
/// `Declined` is the ordinary outcome for a request outside the generator's
/// capabilities; it is a typed value, never a sentinel string, so generated
/// content containing the literal text "Error:" cannot be mistaken for a
/// failure.
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Generator declined the request: {reason}")]
    Declined { reason: String },

    #[error("Generator misconfigured: {reason}")]
    Misconfiguration { reason: String },

    #[error("Unsupported generator provider: {provider}")]
    UnsupportedProvider { provider: String },
}

impl UserFriendlyError for GeneratorError {
    fn user_message(&self) -> String {
        match self {
            Self::Declined { reason } => format!("The generator declined the request: {reason}"),
            Self::Misconfiguration { reason } => format!("The generator is misconfigured: {reason}"),
            Self::UnsupportedProvider { provider } => {
                format!("No generator provider named '{provider}' is available")
            }
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::Declined { .. } => Some(
                "The generator only produces definitions it recognizes from its capability description."
                    .to_string(),
            ),
            _ => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Declined { .. } => {
                vec!["Rephrase the request to match a supported workflow pattern".to_string()]
            }
            Self::Misconfiguration { .. } | Self::UnsupportedProvider { .. } => {
                vec!["Check the [generator] provider value in flowsmith.toml".to_string()]
            }
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::Generation
    }
}

/// Engine client errors, covering the transport and the response contract.
///
/// `ResponseParse` and `MissingField` are deliberately distinct: the first
/// means the body was not JSON at all, the second means the JSON was valid
/// but the required identifier was absent or empty. Callers and tests branch
/// on the difference.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The transport command ran and exited non-zero. Carries both captured
    /// streams so the operator sees what the command itself reported.
    #[error(
        "Engine command failed (exit code {code})\nSTDOUT: {stdout}\nSTDERR: {stderr}",
        code = exit_code.map_or_else(|| "none".to_string(), |c| c.to_string())
    )]
    CommandFailed {
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    /// Transport-level failure before any response body existed
    /// (spawn failure, connection refused, request build error).
    #[error("Engine transport failed: {reason}")]
    Transport { reason: String },

    #[error("Engine {call} call timed out after {} seconds", duration.as_secs())]
    Timeout { call: EngineCall, duration: Duration },

    /// The response body was not parseable as JSON.
    #[error("Engine {call} response was not valid JSON: {reason}")]
    ResponseParse { call: EngineCall, reason: String },

    /// The response parsed, but the required identifier was missing or empty.
    #[error("Engine {call} response did not contain a {field}")]
    MissingField {
        call: EngineCall,
        field: &'static str,
    },
}

impl UserFriendlyError for EngineError {
    fn user_message(&self) -> String {
        match self {
            Self::CommandFailed { stderr, .. } => {
                let detail = stderr.trim();
                if detail.is_empty() {
                    "The engine command exited with a failure".to_string()
                } else {
                    format!("The engine command exited with a failure: {detail}")
                }
            }
            Self::Transport { reason } => format!("Could not reach the engine: {reason}"),
            Self::Timeout { call, duration } => format!(
                "The {call} call did not finish within {} seconds",
                duration.as_secs()
            ),
            Self::ResponseParse { call, .. } => {
                format!("The engine's {call} response was not valid JSON")
            }
            Self::MissingField { call, field } => {
                format!("The engine's {call} response did not include a {field}")
            }
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::ResponseParse { .. } => Some(
                "A non-JSON body usually means the engine returned an error page or the base URL points at something else."
                    .to_string(),
            ),
            Self::MissingField { .. } => Some(
                "The engine answered, but not with the contract this client expects.".to_string(),
            ),
            _ => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::CommandFailed { .. } | Self::Transport { .. } => vec![
                "Check that the engine is running and reachable at the configured base URL"
                    .to_string(),
                "Check the [engine] section in flowsmith.toml".to_string(),
            ],
            Self::Timeout { .. } => vec![
                "Increase [engine] timeout_secs in flowsmith.toml".to_string(),
                "Check whether the engine is overloaded".to_string(),
            ],
            Self::ResponseParse { .. } | Self::MissingField { .. } => vec![
                "Verify the base URL points at the engine's deploy/start API".to_string(),
                "Check the engine's logs for a server-side failure".to_string(),
            ],
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::EngineIntegration
    }
}

/// A pipeline run halted: the stage it halted in, wrapping the domain error.
///
/// Every variant is terminal for the run — no retries, no rollback of the
/// side effects earlier stages committed.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Generation failed: {0}")]
    Generate(#[source] GeneratorError),

    #[error("Failed to persist artifact: {0}")]
    Persist(#[source] StoreError),

    #[error("Deployment failed: {0}")]
    Deploy(#[source] EngineError),

    #[error("Process start failed: {0}")]
    Start(#[source] EngineError),

    #[error("Failed to write run report: {0}")]
    Report(#[source] StoreError),

    /// `run` was called on a pipeline that already reached a terminal state.
    /// Transitions are forward-only; build a new pipeline to run again.
    #[error("pipeline cannot run from terminal state '{from}'")]
    InvalidState { from: PipelineState },
}

impl PipelineError {
    /// The stage the pipeline halted in, or `None` if no run started.
    #[must_use]
    pub const fn stage(&self) -> Option<Stage> {
        match self {
            Self::Generate(_) => Some(Stage::Generating),
            Self::Persist(_) => Some(Stage::Persisting),
            Self::Deploy(_) => Some(Stage::Deploying),
            Self::Start(_) => Some(Stage::Starting),
            Self::Report(_) => Some(Stage::Reporting),
            Self::InvalidState { .. } => None,
        }
    }

    /// Map this error to the binary's exit code.
    #[must_use]
    pub fn to_exit_code(&self) -> ExitCode {
        match self {
            Self::Generate(_) => ExitCode::GENERATION_FAILURE,
            Self::Persist(_) | Self::Report(_) => ExitCode::INTERNAL,
            Self::Deploy(engine) | Self::Start(engine) => match engine {
                EngineError::Timeout { .. } => ExitCode::STAGE_TIMEOUT,
                _ => ExitCode::ENGINE_FAILURE,
            },
            Self::InvalidState { .. } => ExitCode::INTERNAL,
        }
    }
}

impl UserFriendlyError for PipelineError {
    fn user_message(&self) -> String {
        let inner = match self {
            Self::Generate(e) => e.user_message(),
            Self::Persist(e) | Self::Report(e) => e.user_message(),
            Self::Deploy(e) | Self::Start(e) => e.user_message(),
            Self::InvalidState { from } => {
                return format!("Pipeline already finished in state '{from}'");
            }
        };
        match self.stage() {
            Some(stage) => format!("Pipeline halted during {stage}: {inner}"),
            None => inner,
        }
    }

    fn context(&self) -> Option<String> {
        let inner = match self {
            Self::Generate(e) => e.context(),
            Self::Persist(e) | Self::Report(e) => e.context(),
            Self::Deploy(e) | Self::Start(e) => e.context(),
            Self::InvalidState { .. } => None,
        };
        match self {
            // A start failure leaves a deployed definition behind; say so.
            Self::Start(_) => Some(inner.map_or_else(
                || "The definition was already deployed; the failed start was not rolled back.".to_string(),
                |c| format!("{c} The definition was already deployed; the failed start was not rolled back."),
            )),
            Self::Report(_) => Some(
                "The process was already deployed and started; only the local report is missing."
                    .to_string(),
            ),
            _ => inner,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Generate(e) => e.suggestions(),
            Self::Persist(e) | Self::Report(e) => e.suggestions(),
            Self::Deploy(e) | Self::Start(e) => e.suggestions(),
            Self::InvalidState { .. } => {
                vec!["Create a fresh pipeline for each run.".to_string()]
            }
        }
    }

    fn category(&self) -> ErrorCategory {
        ErrorCategory::PipelineExecution
    }
}

/// Library-level error type.
///
/// Library code returns `FlowsmithError` and never calls
/// `std::process::exit()`; the binary maps it to an exit code.
#[derive(Error, Debug)]
pub enum FlowsmithError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Generator error: {0}")]
    Generator(#[from] GeneratorError),

    /// Engine client construction failed before any stage ran, for example
    /// because no usable curl binary was found.
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("{0}")]
    Pipeline(#[from] PipelineError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FlowsmithError {
    /// Map this error to the binary's exit code.
    #[must_use]
    pub fn to_exit_code(&self) -> ExitCode {
        match self {
            Self::Config(_) => ExitCode::CONFIG,
            Self::Generator(_) => ExitCode::GENERATION_FAILURE,
            Self::Engine(_) => ExitCode::ENGINE_FAILURE,
            Self::Pipeline(pipeline) => pipeline.to_exit_code(),
            Self::Io(_) => ExitCode::INTERNAL,
        }
    }
}

impl UserFriendlyError for FlowsmithError {
    fn user_message(&self) -> String {
        match self {
            Self::Config(e) => e.user_message(),
            Self::Generator(e) => e.user_message(),
            Self::Engine(e) => e.user_message(),
            Self::Pipeline(e) => e.user_message(),
            Self::Io(e) => format!("I/O error: {e}"),
        }
    }

    fn context(&self) -> Option<String> {
        match self {
            Self::Config(e) => e.context(),
            Self::Generator(e) => e.context(),
            Self::Engine(e) => e.context(),
            Self::Pipeline(e) => e.context(),
            Self::Io(_) => None,
        }
    }

    fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Config(e) => e.suggestions(),
            Self::Generator(e) => e.suggestions(),
            Self::Engine(e) => e.suggestions(),
            Self::Pipeline(e) => e.suggestions(),
            Self::Io(_) => Vec::new(),
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(e) => e.category(),
            Self::Generator(e) => e.category(),
            Self::Engine(e) => e.category(),
            Self::Pipeline(e) => e.category(),
            Self::Io(_) => ErrorCategory::FileSystem,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_missing_field_are_distinct_variants() {
        let parse = EngineError::ResponseParse {
            call: EngineCall::Deploy,
            reason: "expected value at line 1".to_string(),
        };
        let missing = EngineError::MissingField {
            call: EngineCall::Deploy,
            field: "processDefinitionId",
        };

        assert!(matches!(parse, EngineError::ResponseParse { .. }));
        assert!(matches!(missing, EngineError::MissingField { .. }));
        assert!(parse.to_string().contains("not valid JSON"));
        assert!(missing.to_string().contains("processDefinitionId"));
    }

    #[test]
    fn test_command_failed_carries_both_streams() {
        let err = EngineError::CommandFailed {
            exit_code: Some(7),
            stdout: "partial body".to_string(),
            stderr: "connection refused".to_string(),
        };

        let text = err.to_string();
        assert!(text.contains("exit code 7"));
        assert!(text.contains("STDOUT: partial body"));
        assert!(text.contains("STDERR: connection refused"));
    }

    #[test]
    fn test_command_failed_without_exit_code() {
        let err = EngineError::CommandFailed {
            exit_code: None,
            stdout: String::new(),
            stderr: String::new(),
        };
        assert!(err.to_string().contains("exit code none"));
    }

    #[test]
    fn test_pipeline_error_stage_attribution() {
        let deploy = PipelineError::Deploy(EngineError::Transport {
            reason: "refused".to_string(),
        });
        assert_eq!(deploy.stage(), Some(Stage::Deploying));

        let start = PipelineError::Start(EngineError::MissingField {
            call: EngineCall::Start,
            field: "processInstanceId",
        });
        assert_eq!(start.stage(), Some(Stage::Starting));

        let generate = PipelineError::Generate(GeneratorError::Declined {
            reason: "unsupported".to_string(),
        });
        assert_eq!(generate.stage(), Some(Stage::Generating));

        let invalid = PipelineError::InvalidState {
            from: PipelineState::Completed,
        };
        assert_eq!(invalid.stage(), None);
        assert_eq!(invalid.to_exit_code(), ExitCode::INTERNAL);
    }

    #[test]
    fn test_exit_code_mapping() {
        let declined = PipelineError::Generate(GeneratorError::Declined {
            reason: "no".to_string(),
        });
        assert_eq!(declined.to_exit_code(), ExitCode::GENERATION_FAILURE);

        let timeout = PipelineError::Deploy(EngineError::Timeout {
            call: EngineCall::Deploy,
            duration: Duration::from_secs(120),
        });
        assert_eq!(timeout.to_exit_code(), ExitCode::STAGE_TIMEOUT);

        let engine = PipelineError::Start(EngineError::Transport {
            reason: "refused".to_string(),
        });
        assert_eq!(engine.to_exit_code(), ExitCode::ENGINE_FAILURE);

        let io = PipelineError::Persist(StoreError::Write {
            path: "a".to_string(),
            reason: "denied".to_string(),
        });
        assert_eq!(io.to_exit_code(), ExitCode::INTERNAL);

        let config: FlowsmithError = ConfigError::InvalidValue {
            field: "engine.base_url".to_string(),
            reason: "empty".to_string(),
        }
        .into();
        assert_eq!(config.to_exit_code(), ExitCode::CONFIG);
    }

    #[test]
    fn test_display_for_user_sections() {
        let err = PipelineError::Deploy(EngineError::Transport {
            reason: "connection refused".to_string(),
        });
        let text = err.display_for_user();

        assert!(text.starts_with("Error: Pipeline halted during deploying"));
        assert!(text.contains("Suggestions:"));
        assert!(text.contains("base URL"));
    }

    #[test]
    fn test_start_failure_mentions_committed_deploy() {
        let err = PipelineError::Start(EngineError::Transport {
            reason: "connection reset".to_string(),
        });
        let ctx = err.context().unwrap();
        assert!(ctx.contains("already deployed"));
    }

    #[test]
    fn test_generated_content_with_error_prefix_is_not_a_failure() {
        // A typed decline is the only failure signal; content is never
        // inspected for magic prefixes.
        let declined = GeneratorError::Declined {
            reason: "cannot build this".to_string(),
        };
        assert!(matches!(declined, GeneratorError::Declined { .. }));

        let content = "Error: this is perfectly valid artifact text";
        assert!(content.starts_with("Error:"));
        // Nothing in the taxonomy interprets that prefix; this test documents
        // the absence of sentinel-string control flow.
    }

    #[test]
    fn test_flowsmith_error_category_follows_source() {
        let err: FlowsmithError = PipelineError::Persist(StoreError::Write {
            path: "x".to_string(),
            reason: "denied".to_string(),
        })
        .into();
        assert_eq!(err.category(), ErrorCategory::PipelineExecution);

        let config: FlowsmithError = ConfigError::FileRead {
            path: "flowsmith.toml".to_string(),
            reason: "denied".to_string(),
        }
        .into();
        assert_eq!(config.category(), ErrorCategory::Configuration);
    }
}
