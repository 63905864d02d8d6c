//! Markdown run summaries.
//!
//! A [`RunReport`] collects what a pipeline run produced (the verbatim user
//! request, the engine identifiers, the persisted artifact) and renders it as
//! a Markdown summary. [`ReportWriter`] persists the rendered report through
//! the same atomic write path the artifact store uses.

pub mod model;
pub mod writer;

pub use model::{ArtifactRecord, RunReport};
pub use writer::ReportWriter;
