//! Capability description loading.
//!
//! The capability file tells the generator what it is allowed to build. A
//! missing or unreadable file is tolerated: generation proceeds with a
//! placeholder so a fresh workspace still runs, and the gap is logged.

use camino::Utf8Path;

use flowsmith_utils::store::read_text_normalized;

/// Text used when no capability file exists.
pub const MISSING_CAPABILITIES_PLACEHOLDER: &str = "Agent capabilities file not found.";

/// Preamble prepended to the capability text when building system
/// instructions for a provider.
const INSTRUCTION_PREAMBLE: &str = "You are a BPMN Builder Agent. Follow these rules:";

/// The capability description handed to generators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityProfile {
    text: String,
    loaded_from_file: bool,
}

impl CapabilityProfile {
    /// Load the capability description from `path`.
    ///
    /// Read failures fall back to [`MISSING_CAPABILITIES_PLACEHOLDER`] with
    /// a warning; they never fail the run.
    #[must_use]
    pub fn load(path: &Utf8Path) -> Self {
        match read_text_normalized(path) {
            Ok(text) => Self {
                text,
                loaded_from_file: true,
            },
            Err(err) => {
                tracing::warn!(path = %path, error = %err, "capability file unavailable, using placeholder");
                Self {
                    text: MISSING_CAPABILITIES_PLACEHOLDER.to_string(),
                    loaded_from_file: false,
                }
            }
        }
    }

    /// Build a profile from in-memory text.
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            loaded_from_file: false,
        }
    }

    /// The capability text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the text came from a file rather than the placeholder or an
    /// in-memory value.
    #[must_use]
    pub const fn loaded_from_file(&self) -> bool {
        self.loaded_from_file
    }

    /// Preamble plus capability text, for providers that take system
    /// instructions.
    #[must_use]
    pub fn system_instructions(&self) -> String {
        format!("{INSTRUCTION_PREAMBLE}\n{}", self.text)
    }
}
