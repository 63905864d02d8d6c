use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use flowsmith_utils::error::ConfigError;

/// Config file name searched for in the workspace directory.
pub const CONFIG_FILENAME: &str = "flowsmith.toml";

/// Default engine base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Default artifact file name, relative to the workspace directory.
pub const DEFAULT_ARTIFACT_FILENAME: &str = "generated_workflow.bpmn20.xml";

/// Default run-report file name, relative to the workspace directory.
pub const DEFAULT_REPORT_FILENAME: &str = "test_summary.md";

/// Default capability description file name, relative to the workspace directory.
pub const DEFAULT_CAPABILITIES_FILENAME: &str = "agent_capabilities.md";

/// Default generator provider.
pub const DEFAULT_GENERATOR_PROVIDER: &str = "template";

/// Default timeout for a single engine call in seconds.
pub const DEFAULT_ENGINE_TIMEOUT_SECS: u64 = 120;

/// Minimum accepted engine timeout in seconds.
pub const MIN_ENGINE_TIMEOUT_SECS: u64 = 5;

/// Maximum accepted engine timeout in seconds (2 hours).
pub const MAX_ENGINE_TIMEOUT_SECS: u64 = 7200;

/// Engine transport selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// Call the engine through the local `curl` binary (default).
    #[default]
    Curl,
    /// Call the engine through an in-process HTTP client.
    Http,
}

impl TransportKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Curl => "curl",
            Self::Http => "http",
        }
    }
}

impl std::fmt::Display for TransportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a `Config` came from, for status display and logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Built-in defaults; no file was found.
    Defaults,
    /// Loaded from the named config file.
    File(Utf8PathBuf),
    /// Constructed through [`ConfigBuilder`](crate::ConfigBuilder).
    Programmatic,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Defaults => write!(f, "defaults"),
            Self::File(path) => write!(f, "file:{path}"),
            Self::Programmatic => write!(f, "programmatic"),
        }
    }
}

/// Engine connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Base URL; `/deploy` and `/start` are appended to it. Never carries a
    /// trailing slash after normalization.
    pub base_url: String,
    /// Which transport performs the HTTP calls.
    pub transport: TransportKind,
    /// Per-call timeout in seconds.
    pub timeout_secs: u64,
    /// Explicit curl binary path. When unset, `curl` is resolved via `PATH`.
    pub curl_program: Option<Utf8PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            transport: TransportKind::default(),
            timeout_secs: DEFAULT_ENGINE_TIMEOUT_SECS,
            curl_program: None,
        }
    }
}

impl EngineConfig {
    /// Per-call timeout as a [`Duration`].
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Generator selection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Provider name; `"template"` is the built-in pattern-matching generator.
    pub provider: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_GENERATOR_PROVIDER.to_string(),
        }
    }
}

/// Output and input file locations. Relative paths are resolved against the
/// workspace directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathsConfig {
    /// Where the generated definition is persisted.
    pub artifact: Utf8PathBuf,
    /// Where the run report is written.
    pub report: Utf8PathBuf,
    /// Capability description consumed by the generator.
    pub capabilities: Utf8PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            artifact: Utf8PathBuf::from(DEFAULT_ARTIFACT_FILENAME),
            report: Utf8PathBuf::from(DEFAULT_REPORT_FILENAME),
            capabilities: Utf8PathBuf::from(DEFAULT_CAPABILITIES_FILENAME),
        }
    }
}

/// Resolved configuration for a pipeline run.
///
/// Precedence: programmatic values (via [`Config::builder()`]) over config
/// file values over built-in defaults.
///
/// # Discovery
///
/// [`Config::discover()`] looks for `flowsmith.toml` in the current
/// directory and falls back to defaults when it is absent. For embedding,
/// construct a `Config` through the builder instead; discovery never runs.
///
/// # Configuration File Format
///
/// ```toml
/// [engine]
/// base_url = "http://localhost:8080"
/// transport = "curl"
/// timeout_secs = 120
///
/// [generator]
/// provider = "template"
///
/// [paths]
/// artifact = "generated_workflow.bpmn20.xml"
/// report = "test_summary.md"
/// capabilities = "agent_capabilities.md"
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory relative paths resolve against.
    pub workspace_dir: Utf8PathBuf,
    /// Engine connection settings.
    pub engine: EngineConfig,
    /// Generator selection.
    pub generator: GeneratorConfig,
    /// Input and output locations.
    pub paths: PathsConfig,
    /// Verbose diagnostics.
    pub verbose: bool,
    /// Where this configuration came from.
    pub source: ConfigSource,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_in(Utf8PathBuf::from("."))
    }
}

/// TOML overlay: every field optional, unset fields keep their defaults.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    engine: EngineSection,
    #[serde(default)]
    generator: GeneratorSection,
    #[serde(default)]
    paths: PathsSection,
}

#[derive(Debug, Default, Deserialize)]
struct EngineSection {
    base_url: Option<String>,
    transport: Option<TransportKind>,
    timeout_secs: Option<u64>,
    curl_program: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct GeneratorSection {
    provider: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PathsSection {
    artifact: Option<String>,
    report: Option<String>,
    capabilities: Option<String>,
}

impl Config {
    /// Built-in defaults rooted at `workspace_dir`.
    #[must_use]
    pub fn default_in(workspace_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            workspace_dir: workspace_dir.into(),
            engine: EngineConfig::default(),
            generator: GeneratorConfig::default(),
            paths: PathsConfig::default(),
            verbose: false,
            source: ConfigSource::Defaults,
        }
    }

    /// Discover configuration with CLI semantics: load
    /// `flowsmith.toml` from the current directory if present, otherwise use
    /// built-in defaults. The current directory becomes the workspace
    /// directory either way.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory is not valid UTF-8, or if a
    /// config file exists but cannot be read, parsed, or validated.
    pub fn discover() -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir().map_err(|e| ConfigError::InvalidValue {
            field: "workspace_dir".to_string(),
            reason: format!("cannot determine current directory: {e}"),
        })?;
        let cwd = Utf8PathBuf::from_path_buf(cwd).map_err(|p| ConfigError::InvalidValue {
            field: "workspace_dir".to_string(),
            reason: format!("current directory is not valid UTF-8: {}", p.display()),
        })?;

        let candidate = cwd.join(CONFIG_FILENAME);
        if candidate.is_file() {
            tracing::debug!(path = %candidate, "loading config file");
            Self::from_file(&candidate)
        } else {
            tracing::debug!("no config file found, using defaults");
            Ok(Self::default_in(cwd))
        }
    }

    /// Load configuration from a TOML file. The file's directory becomes the
    /// workspace directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileRead`] when the file cannot be read,
    /// [`ConfigError::Parse`] when it is not valid TOML, and
    /// [`ConfigError::InvalidValue`] when a value fails validation.
    pub fn from_file(path: &Utf8Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_std_path()).map_err(|e| {
            ConfigError::FileRead {
                path: path.to_string(),
                reason: e.to_string(),
            }
        })?;

        let file: ConfigFile = toml::from_str(&raw).map_err(|e| ConfigError::Parse {
            path: path.to_string(),
            reason: e.to_string(),
        })?;

        let workspace_dir = path
            .parent()
            .map_or_else(|| Utf8PathBuf::from("."), Utf8Path::to_path_buf);

        let mut config = Self::default_in(workspace_dir);
        config.source = ConfigSource::File(path.to_path_buf());
        config.apply_file(file);
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    fn apply_file(&mut self, file: ConfigFile) {
        if let Some(base_url) = file.engine.base_url {
            self.engine.base_url = base_url;
        }
        if let Some(transport) = file.engine.transport {
            self.engine.transport = transport;
        }
        if let Some(timeout_secs) = file.engine.timeout_secs {
            self.engine.timeout_secs = timeout_secs;
        }
        if let Some(curl_program) = file.engine.curl_program {
            self.engine.curl_program = Some(Utf8PathBuf::from(curl_program));
        }
        if let Some(provider) = file.generator.provider {
            self.generator.provider = provider;
        }
        if let Some(artifact) = file.paths.artifact {
            self.paths.artifact = Utf8PathBuf::from(artifact);
        }
        if let Some(report) = file.paths.report {
            self.paths.report = Utf8PathBuf::from(report);
        }
        if let Some(capabilities) = file.paths.capabilities {
            self.paths.capabilities = Utf8PathBuf::from(capabilities);
        }
    }

    /// Strip the trailing slash from the base URL so endpoint joining is
    /// uniform.
    pub(crate) fn normalize(&mut self) {
        while self.engine.base_url.ends_with('/') {
            self.engine.base_url.pop();
        }
    }

    /// Validate configuration values.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.base_url.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "engine.base_url".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if !self.engine.base_url.starts_with("http://")
            && !self.engine.base_url.starts_with("https://")
        {
            return Err(ConfigError::InvalidValue {
                field: "engine.base_url".to_string(),
                reason: "must start with http:// or https://".to_string(),
            });
        }

        if self.engine.timeout_secs < MIN_ENGINE_TIMEOUT_SECS {
            return Err(ConfigError::InvalidValue {
                field: "engine.timeout_secs".to_string(),
                reason: format!("must be at least {MIN_ENGINE_TIMEOUT_SECS} seconds"),
            });
        }
        if self.engine.timeout_secs > MAX_ENGINE_TIMEOUT_SECS {
            return Err(ConfigError::InvalidValue {
                field: "engine.timeout_secs".to_string(),
                reason: format!(
                    "exceeds maximum limit of {MAX_ENGINE_TIMEOUT_SECS} seconds (2 hours)"
                ),
            });
        }

        if self.generator.provider.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "generator.provider".to_string(),
                reason: "must not be empty".to_string(),
            });
        }

        for (field, path) in [
            ("paths.artifact", &self.paths.artifact),
            ("paths.report", &self.paths.report),
            ("paths.capabilities", &self.paths.capabilities),
        ] {
            if path.as_str().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Resolved artifact destination.
    #[must_use]
    pub fn artifact_path(&self) -> Utf8PathBuf {
        self.resolve(&self.paths.artifact)
    }

    /// Resolved report destination.
    #[must_use]
    pub fn report_path(&self) -> Utf8PathBuf {
        self.resolve(&self.paths.report)
    }

    /// Resolved capability description location.
    #[must_use]
    pub fn capabilities_path(&self) -> Utf8PathBuf {
        self.resolve(&self.paths.capabilities)
    }

    /// Per-call engine timeout.
    #[must_use]
    pub const fn engine_timeout(&self) -> Duration {
        self.engine.timeout()
    }

    fn resolve(&self, path: &Utf8Path) -> Utf8PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.workspace_dir.join(path)
        }
    }
}
