//! Configuration for the flowsmith pipeline.
//!
//! Three layers, highest precedence first: programmatic values set through
//! [`ConfigBuilder`], a `flowsmith.toml` file, built-in defaults. Discovery
//! ([`Config::discover`]) is CLI behavior; embedders use the builder and
//! nothing is read from the environment.

pub mod builder;
pub mod model;

pub use builder::ConfigBuilder;
pub use model::{
    CONFIG_FILENAME, Config, ConfigSource, DEFAULT_ARTIFACT_FILENAME, DEFAULT_BASE_URL,
    DEFAULT_CAPABILITIES_FILENAME, DEFAULT_ENGINE_TIMEOUT_SECS, DEFAULT_GENERATOR_PROVIDER,
    DEFAULT_REPORT_FILENAME, EngineConfig, GeneratorConfig, PathsConfig, TransportKind,
};
