//! Definition generator abstraction.
//!
//! Providers implement [`DefinitionGenerator`]; the pipeline works against
//! the trait and never against a concrete provider. The built-in
//! [`TemplateGenerator`] serves a fixed pattern catalog deterministically,
//! standing where an LLM-backed provider would.

pub mod capabilities;
pub mod template;
pub mod types;

pub use capabilities::{CapabilityProfile, MISSING_CAPABILITIES_PLACEHOLDER};
pub use template::TemplateGenerator;
pub use types::{DefinitionGenerator, GeneratedDefinition, GenerationRequest};

use flowsmith_config::Config;
use flowsmith_utils::error::GeneratorError;

/// Create a generator from configuration.
///
/// # Errors
///
/// Returns [`GeneratorError::UnsupportedProvider`] when
/// `config.generator.provider` names no known provider. `template` is the
/// only provider in this version.
pub fn from_config(config: &Config) -> Result<Box<dyn DefinitionGenerator>, GeneratorError> {
    match config.generator.provider.as_str() {
        template::PROVIDER_NAME => Ok(Box::new(TemplateGenerator::new())),
        unknown => Err(GeneratorError::UnsupportedProvider {
            provider: unknown.to_string(),
        }),
    }
}

#[cfg(test)]
mod factory_tests {
    use super::*;

    #[test]
    fn test_template_provider_is_constructed() {
        let config = Config::builder().build().unwrap();
        let generator = from_config(&config).unwrap();
        assert_eq!(generator.name(), "template");
    }

    #[test]
    fn test_unknown_provider_fails_cleanly() {
        let config = Config::builder()
            .generator_provider("quantum-oracle")
            .build()
            .unwrap();

        let err = from_config(&config).unwrap_err();
        match err {
            GeneratorError::UnsupportedProvider { provider } => {
                assert_eq!(provider, "quantum-oracle");
            }
            other => panic!("expected UnsupportedProvider, got {other:?}"),
        }
    }
}
