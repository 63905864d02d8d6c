//! Built-in template provider.
//!
//! Serves a fixed catalog of workflow patterns by substring match on the
//! request. Requests outside the catalog are declined with a typed error;
//! the caller decides what to do with that. Output for a given pattern is
//! byte-identical on every invocation.

use async_trait::async_trait;

use flowsmith_utils::error::GeneratorError;

use crate::types::{DefinitionGenerator, GeneratedDefinition, GenerationRequest};

/// Provider name recorded on results.
pub const PROVIDER_NAME: &str = "template";

/// Pattern the built-in catalog recognizes, matched case-insensitively.
const TWO_STEP_APPROVAL_PATTERN: &str = "two-step approval";

const TWO_STEP_APPROVAL_PROCESS_ID: &str = "twoStepApproval";

const TWO_STEP_APPROVAL_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<definitions xmlns="http://www.omg.org/spec/BPMN/20100524/MODEL"
             xmlns:flowable="http://flowable.org/bpmn"
             targetNamespace="http://www.flowable.org/processdef">
    <process id="twoStepApproval" name="Two-Step Approval Process">
        <startEvent id="start"/>
        <sequenceFlow sourceRef="start" targetRef="managerApproval"/>
        <userTask id="managerApproval" name="Manager Approval" flowable:candidateGroups="managers"/>
        <sequenceFlow sourceRef="managerApproval" targetRef="financeApproval"/>
        <userTask id="financeApproval" name="Finance Approval" flowable:candidateGroups="finance"/>
        <sequenceFlow sourceRef="financeApproval" targetRef="end"/>
        <endEvent id="end"/>
    </process>
</definitions>"#;

/// Deterministic pattern-matching generator.
///
/// Stands where an LLM-backed provider would: same trait, same typed
/// decline, no network. Useful both as the default provider and as the
/// fixture for exercising the full pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateGenerator;

impl TemplateGenerator {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DefinitionGenerator for TemplateGenerator {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GeneratedDefinition, GeneratorError> {
        tracing::debug!(
            instruction_bytes = request.system_instructions().len(),
            request = %request.request,
            "template generator invoked"
        );

        if request
            .request
            .to_lowercase()
            .contains(TWO_STEP_APPROVAL_PATTERN)
        {
            Ok(
                GeneratedDefinition::new(TWO_STEP_APPROVAL_XML, PROVIDER_NAME)
                    .with_process_id(TWO_STEP_APPROVAL_PROCESS_ID),
            )
        } else {
            Err(GeneratorError::Declined {
                reason: format!(
                    "only '{TWO_STEP_APPROVAL_PATTERN}' workflows are in the template catalog"
                ),
            })
        }
    }

    fn name(&self) -> &str {
        PROVIDER_NAME
    }
}
