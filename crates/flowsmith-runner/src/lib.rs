//! Process invocation for flowsmith.
//!
//! Everything that touches an external binary goes through [`CommandSpec`] to
//! guarantee argv-style invocation. Arguments cross the process boundary as
//! discrete elements; no shell ever sees a request-derived value, so engine
//! URLs and user text cannot be reinterpreted as shell syntax.
//!
//! [`ProcessRunner`] is the seam the engine transport is tested through: the
//! shipped [`NativeRunner`] drives a Tokio child process under a timeout, and
//! tests substitute mock runners that return canned [`ProcessOutput`]s.

pub mod command_spec;
pub mod error;
pub mod native;
pub mod process;

pub use command_spec::CommandSpec;
pub use error::RunnerError;
pub use native::NativeRunner;
pub use process::{ProcessOutput, ProcessRunner};
