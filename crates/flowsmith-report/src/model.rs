//! Run report model and rendering.

use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};

use flowsmith_utils::types::{ProcessDefinitionId, ProcessInstanceId};

/// Closing note; states the limit of what a run verifies. The instance was
/// started, its tasks were not driven to completion.
const CLOSING_NOTE: &str =
    "This is a simplified test run. The agent started the process but did not complete the tasks.";

/// What was persisted, and its fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRecord {
    /// Where the definition landed.
    pub path: Utf8PathBuf,
    /// Size in bytes as written.
    pub bytes: u64,
    /// BLAKE3 hash of the written content, lowercase hex.
    pub blake3_hex: String,
}

/// Everything a completed run reports.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// The user's request, verbatim.
    pub request: String,
    /// Identifier the deploy call returned.
    pub definition_id: ProcessDefinitionId,
    /// Identifier the start call returned.
    pub instance_id: ProcessInstanceId,
    /// The persisted definition.
    pub artifact: ArtifactRecord,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
}

impl RunReport {
    /// Build a report stamped with the current time.
    #[must_use]
    pub fn new(
        request: impl Into<String>,
        definition_id: ProcessDefinitionId,
        instance_id: ProcessInstanceId,
        artifact: ArtifactRecord,
    ) -> Self {
        Self {
            request: request.into(),
            definition_id,
            instance_id,
            artifact,
            generated_at: Utc::now(),
        }
    }

    /// Replace the timestamp. Tests use this for stable output.
    #[must_use]
    pub fn with_timestamp(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = generated_at;
        self
    }

    /// Render the report as Markdown.
    ///
    /// The request appears verbatim under the "User Request" heading, both
    /// identifiers under their stage headings, and the closing note states
    /// that the instance was started but not driven to completion.
    #[must_use]
    pub fn render(&self) -> String {
        format!(
            "\
# Workflow Test Summary

## User Request
> {request}

## Deployment
- **Status:** Success
- **Process Definition ID:** {definition_id}

## Test Execution
- **Status:** Started
- **Process Instance ID:** {instance_id}

## Artifact
- **Path:** {artifact_path}
- **Size:** {artifact_bytes} bytes
- **BLAKE3:** {artifact_hash}

_Generated at {generated_at}._

**Note:** {note}
",
            request = self.request,
            definition_id = self.definition_id,
            instance_id = self.instance_id,
            artifact_path = self.artifact.path,
            artifact_bytes = self.artifact.bytes,
            artifact_hash = self.artifact.blake3_hex,
            generated_at = self.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            note = CLOSING_NOTE,
        )
    }
}
