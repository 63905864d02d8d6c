use camino::Utf8PathBuf;
use std::time::Duration;

use flowsmith_utils::error::ConfigError;

use crate::model::{Config, ConfigSource, TransportKind};

impl Config {
    /// Create a builder for programmatic configuration.
    ///
    /// Use this when embedding the pipeline in another application and the
    /// run must behave deterministically, independent of the user's working
    /// directory or any `flowsmith.toml` on disk.
    ///
    /// # Example
    ///
    /// ```rust
    /// use flowsmith_config::{Config, TransportKind};
    /// use std::time::Duration;
    ///
    /// let config = Config::builder()
    ///     .workspace_dir("/tmp/run")
    ///     .base_url("http://engine.internal:8080")
    ///     .transport(TransportKind::Http)
    ///     .engine_timeout(Duration::from_secs(30))
    ///     .build()?;
    /// # Ok::<(), flowsmith_utils::error::ConfigError>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Fluent builder for [`Config`].
///
/// Every value left unset falls back to the built-in default; nothing is
/// read from disk or the environment. The result carries
/// [`ConfigSource::Programmatic`].
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    workspace_dir: Option<Utf8PathBuf>,
    base_url: Option<String>,
    transport: Option<TransportKind>,
    engine_timeout: Option<Duration>,
    curl_program: Option<Utf8PathBuf>,
    generator_provider: Option<String>,
    artifact_path: Option<Utf8PathBuf>,
    report_path: Option<Utf8PathBuf>,
    capabilities_path: Option<Utf8PathBuf>,
    verbose: Option<bool>,
}

impl ConfigBuilder {
    /// Create a new builder with no values set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the workspace directory that relative paths resolve against.
    /// Default: the current directory.
    #[must_use]
    pub fn workspace_dir(mut self, dir: impl Into<Utf8PathBuf>) -> Self {
        self.workspace_dir = Some(dir.into());
        self
    }

    /// Set the engine base URL. Default: `http://localhost:8080`.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the engine transport. Default: [`TransportKind::Curl`].
    #[must_use]
    pub fn transport(mut self, transport: TransportKind) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Set the per-call engine timeout. Default: 120 seconds; accepted
    /// range 5 seconds to 2 hours.
    #[must_use]
    pub fn engine_timeout(mut self, timeout: Duration) -> Self {
        self.engine_timeout = Some(timeout);
        self
    }

    /// Set an explicit curl binary for the curl transport. Default: resolve
    /// `curl` via `PATH`.
    #[must_use]
    pub fn curl_program(mut self, program: impl Into<Utf8PathBuf>) -> Self {
        self.curl_program = Some(program.into());
        self
    }

    /// Set the generator provider. Default: `template`.
    #[must_use]
    pub fn generator_provider(mut self, provider: impl Into<String>) -> Self {
        self.generator_provider = Some(provider.into());
        self
    }

    /// Set where the generated definition is persisted.
    #[must_use]
    pub fn artifact_path(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.artifact_path = Some(path.into());
        self
    }

    /// Set where the run report is written.
    #[must_use]
    pub fn report_path(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.report_path = Some(path.into());
        self
    }

    /// Set the capability description the generator reads.
    #[must_use]
    pub fn capabilities_path(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.capabilities_path = Some(path.into());
        self
    }

    /// Enable verbose diagnostics. Default: false.
    #[must_use]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    /// Build and validate the [`Config`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a value is out of range,
    /// e.g. a base URL without an `http`/`https` scheme or a timeout below
    /// 5 seconds.
    pub fn build(self) -> Result<Config, ConfigError> {
        let workspace_dir = self.workspace_dir.unwrap_or_else(|| Utf8PathBuf::from("."));
        let mut config = Config::default_in(workspace_dir);
        config.source = ConfigSource::Programmatic;

        if let Some(base_url) = self.base_url {
            config.engine.base_url = base_url;
        }
        if let Some(transport) = self.transport {
            config.engine.transport = transport;
        }
        if let Some(timeout) = self.engine_timeout {
            config.engine.timeout_secs = timeout.as_secs();
        }
        if let Some(curl_program) = self.curl_program {
            config.engine.curl_program = Some(curl_program);
        }
        if let Some(provider) = self.generator_provider {
            config.generator.provider = provider;
        }
        if let Some(artifact) = self.artifact_path {
            config.paths.artifact = artifact;
        }
        if let Some(report) = self.report_path {
            config.paths.report = report;
        }
        if let Some(capabilities) = self.capabilities_path {
            config.paths.capabilities = capabilities;
        }
        if let Some(verbose) = self.verbose {
            config.verbose = verbose;
        }

        config.normalize();
        config.validate()?;
        Ok(config)
    }
}
