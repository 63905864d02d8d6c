//! Foundation utilities for flowsmith.
//!
//! Shared error taxonomy, exit codes, the atomic artifact store, tracing
//! setup, and the pipeline vocabulary types (`Stage`, `PipelineState`, the
//! engine identifier newtypes) that the other crates build on.

pub mod error;
pub mod exit_codes;
pub mod logging;
pub mod store;
pub mod types;

pub use error::{
    ConfigError, EngineError, ErrorCategory, FlowsmithError, GeneratorError, PipelineError,
    StoreError, UserFriendlyError,
};
pub use exit_codes::ExitCode;
pub use logging::init_tracing;
pub use store::{WrittenFile, read_text_normalized, write_text_atomic};
pub use types::{EngineCall, PipelineState, ProcessDefinitionId, ProcessInstanceId, Stage};
