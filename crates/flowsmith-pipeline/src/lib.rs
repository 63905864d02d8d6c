//! Pipeline orchestration.
//!
//! Wires the generator, artifact store, engine client, and report writer
//! into a single five-stage run: generate, persist, deploy, start, report.
//! The [`Orchestrator`] owns the state machine; stages execute in fixed
//! order and the first failure halts the run with a typed error naming the
//! stage. Side effects committed by earlier stages are never rolled back.

mod orchestrator;

pub use orchestrator::{Orchestrator, PipelineRun};
