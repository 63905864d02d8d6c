//! Report persistence.

use camino::{Utf8Path, Utf8PathBuf};
use tracing::info;

use flowsmith_utils::error::StoreError;
use flowsmith_utils::store::{self, WrittenFile};

use crate::model::RunReport;

/// Writes rendered reports to a fixed path.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    path: Utf8PathBuf,
}

impl ReportWriter {
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Destination the next [`write`](Self::write) call targets.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Render `report` and persist it atomically.
    pub fn write(&self, report: &RunReport) -> Result<WrittenFile, StoreError> {
        let written = store::write_text_atomic(&self.path, &report.render())?;
        info!(path = %written.path, bytes = written.bytes, "report written");
        Ok(written)
    }
}
