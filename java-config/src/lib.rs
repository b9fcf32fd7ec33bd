//! Shared configuration loader for java-lsp.
//!
//! `defaults/java-lsp.default.toml` is embedded into the binary so that docs and runtime
//! behavior stay in sync. The server layers an optional user file and command line overrides
//! on top of those defaults via [`Loader`] before deserializing into [`JavaLspConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/java-lsp.default.toml");

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] config::ConfigError),
    #[error("diagnostics.source must not be empty")]
    EmptyDiagnosticsSource,
    #[error("logging.filter must not be empty")]
    EmptyLogFilter,
}

/// Top-level configuration consumed by the language server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JavaLspConfig {
    pub server: ServerConfig,
    pub diagnostics: DiagnosticsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    pub name: String,
}

/// Controls what the diagnostics publisher sends.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DiagnosticsConfig {
    pub source: String,
    pub publish_warnings: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    pub filter: String,
}

impl JavaLspConfig {
    fn validate(self) -> Result<Self, ConfigError> {
        if self.diagnostics.source.trim().is_empty() {
            return Err(ConfigError::EmptyDiagnosticsSource);
        }
        if self.logging.filter.trim().is_empty() {
            return Err(ConfigError::EmptyLogFilter);
        }
        Ok(self)
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (used for command line settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder, deserialize and validate the resulting configuration.
    pub fn build(self) -> Result<JavaLspConfig, ConfigError> {
        let config: JavaLspConfig = self.builder.build()?.try_deserialize()?;
        config.validate()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<JavaLspConfig, ConfigError> {
    Loader::new().build()
}
