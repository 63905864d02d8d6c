//! Core types for the generator abstraction

use async_trait::async_trait;

use flowsmith_utils::error::GeneratorError;

use crate::capabilities::CapabilityProfile;

/// Input to a generator invocation.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// The user's workflow request, verbatim.
    pub request: String,
    /// Capability description framing what the generator may produce.
    pub capabilities: CapabilityProfile,
}

impl GenerationRequest {
    /// Create a new generation request.
    #[must_use]
    pub fn new(request: impl Into<String>, capabilities: CapabilityProfile) -> Self {
        Self {
            request: request.into(),
            capabilities,
        }
    }

    /// Full system instructions for providers that take them: the builder
    /// preamble followed by the capability text.
    #[must_use]
    pub fn system_instructions(&self) -> String {
        self.capabilities.system_instructions()
    }
}

/// Output of a successful generator invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDefinition {
    /// The definition document, ready to persist as-is.
    pub content: String,
    /// Provider that produced it (e.g. `"template"`).
    pub provider: String,
    /// The `id` attribute of the process element, when the provider knows it.
    pub process_id: Option<String>,
}

impl GeneratedDefinition {
    /// Create a new generated definition.
    #[must_use]
    pub fn new(content: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            provider: provider.into(),
            process_id: None,
        }
    }

    /// Attach the process element id.
    #[must_use]
    pub fn with_process_id(mut self, process_id: impl Into<String>) -> Self {
        self.process_id = Some(process_id.into());
        self
    }
}

/// Trait for definition generator implementations.
///
/// The pipeline works against this trait and never inspects generated
/// content for failure markers: success returns a [`GeneratedDefinition`],
/// and a request the provider cannot serve returns
/// [`GeneratorError::Declined`]. Content that happens to contain the text
/// `"Error:"` is just content.
#[async_trait]
pub trait DefinitionGenerator: std::fmt::Debug + Send + Sync {
    /// Generate a process definition for the request.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::Declined`] when the request is outside the
    /// provider's capabilities, and other variants for provider failures.
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GeneratedDefinition, GeneratorError>;

    /// Provider name recorded on results and in logs.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_definition_builder() {
        let def = GeneratedDefinition::new("<definitions/>", "template")
            .with_process_id("twoStepApproval");

        assert_eq!(def.content, "<definitions/>");
        assert_eq!(def.provider, "template");
        assert_eq!(def.process_id.as_deref(), Some("twoStepApproval"));
    }

    #[test]
    fn test_request_carries_verbatim_text() {
        let capabilities = CapabilityProfile::from_text("rules");
        let request = GenerationRequest::new("  spaced  request  ", capabilities);
        assert_eq!(request.request, "  spaced  request  ");
    }

    #[test]
    fn test_system_instructions_include_capabilities() {
        let capabilities = CapabilityProfile::from_text("Only sequential flows.");
        let request = GenerationRequest::new("anything", capabilities);

        let instructions = request.system_instructions();
        assert!(instructions.starts_with("You are a BPMN Builder Agent."));
        assert!(instructions.ends_with("Only sequential flows."));
    }
}
