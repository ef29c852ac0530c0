// /////////////////////////////////////////////////////////////////////////////
// Archival Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Bootstrap-Phase Configuration
//!
//! `BootstrapConfig` holds the handful of settings the bootstrap layer
//! itself needs before the pipeline crate's own layered `PipelineConfig`
//! (CLI > env > file > defaults, see
//! `archival_pipeline::infrastructure::config`) takes over. It is built
//! directly from the already-validated CLI (see [`crate::cli::ValidatedCli`])
//! and never touches environment variables or files itself — that
//! layering happens one level up, in the pipeline crate.
//!
//! ## Immutability
//!
//! Configuration is immutable after construction: thread-safe to share
//! across async tasks with no synchronization.

use std::path::PathBuf;

/// Log level configuration, convertible to a `tracing::Level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Errors only.
    Error,
    /// Warnings and errors.
    Warn,
    /// Info, warnings, and errors (default).
    #[default]
    Info,
    /// All messages including debug.
    Debug,
    /// All messages including trace.
    Trace,
}

impl LogLevel {
    /// Convert to a `tracing::Level`.
    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

/// Bootstrap-phase configuration.
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    app_name: String,
    log_level: LogLevel,
    config_file: Option<PathBuf>,
}

impl BootstrapConfig {
    /// Start building a `BootstrapConfig`.
    pub fn builder() -> BootstrapConfigBuilder {
        BootstrapConfigBuilder::default()
    }

    /// Application name, used in log output and the user-agent header the
    /// HTTP adapters send to the triple store / REST metadata extractors.
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Resolved log level.
    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }

    /// Path to a pipeline configuration file, if one was given on the
    /// command line.
    pub fn config_file(&self) -> Option<&PathBuf> {
        self.config_file.as_ref()
    }
}

/// Builder for [`BootstrapConfig`].
#[derive(Debug, Default)]
pub struct BootstrapConfigBuilder {
    app_name: Option<String>,
    log_level: LogLevel,
    config_file: Option<PathBuf>,
}

impl BootstrapConfigBuilder {
    /// Set the application name.
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self
    }

    /// Set the log level.
    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// Set the config file path.
    pub fn config_file(mut self, path: Option<PathBuf>) -> Self {
        self.config_file = path;
        self
    }

    /// Build the immutable `BootstrapConfig`.
    pub fn build(self) -> BootstrapConfig {
        BootstrapConfig {
            app_name: self.app_name.unwrap_or_else(|| "archival-pipeline".to_string()),
            log_level: self.log_level,
            config_file: self.config_file,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_app_name() {
        let config = BootstrapConfig::builder().build();
        assert_eq!(config.app_name(), "archival-pipeline");
    }

    #[test]
    fn test_builder_overrides() {
        let config = BootstrapConfig::builder()
            .app_name("custom")
            .log_level(LogLevel::Debug)
            .config_file(Some(PathBuf::from("/tmp/pipeline.toml")))
            .build();

        assert_eq!(config.app_name(), "custom");
        assert_eq!(config.log_level(), LogLevel::Debug);
        assert_eq!(config.config_file(), Some(&PathBuf::from("/tmp/pipeline.toml")));
    }

    #[test]
    fn test_log_level_to_tracing() {
        assert_eq!(LogLevel::Error.to_tracing_level(), tracing::Level::ERROR);
        assert_eq!(LogLevel::Trace.to_tracing_level(), tracing::Level::TRACE);
    }
}
