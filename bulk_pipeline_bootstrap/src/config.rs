// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline RS
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Bootstrap Configuration
//!
//! Minimal configuration needed before the application layer's own
//! [`bulk_pipeline`] configuration loader takes over: the log level and the
//! path to the layered configuration file, both of which must be known
//! before `tracing` is initialized and before `PipelineConfig::load` runs.

use std::path::PathBuf;

/// Logging verbosity for the bootstrap phase and the `tracing` subscriber
/// it installs for the rest of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
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

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(format!("unknown log level: {other}")),
        }
    }
}

/// Bootstrap-phase application settings, assembled from CLI flags before any
/// use case runs.
#[derive(Debug, Clone)]
pub struct AppConfig {
    app_name: String,
    log_level: LogLevel,
    config_path: Option<PathBuf>,
    verbose: bool,
}

impl AppConfig {
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }

    pub fn config_path(&self) -> Option<&PathBuf> {
        self.config_path.as_ref()
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }
}

/// Builder for [`AppConfig`].
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    app_name: Option<String>,
    log_level: LogLevel,
    config_path: Option<PathBuf>,
    verbose: bool,
}

impl AppConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    pub fn log_level(mut self, log_level: LogLevel) -> Self {
        self.log_level = log_level;
        self
    }

    pub fn config_path(mut self, config_path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(config_path.into());
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Builds the config, defaulting the app name when not set.
    pub fn build(self) -> AppConfig {
        AppConfig {
            app_name: self.app_name.unwrap_or_else(|| "bulk-pipeline".to_string()),
            log_level: self.log_level,
            config_path: self.config_path,
            verbose: self.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_defaults_to_info() {
        assert_eq!(LogLevel::default(), LogLevel::Info);
    }

    #[test]
    fn log_level_parses_case_insensitively() {
        assert_eq!("DEBUG".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert!("bogus".parse::<LogLevel>().is_err());
    }

    #[test]
    fn builder_defaults_app_name() {
        let config = AppConfigBuilder::new().build();
        assert_eq!(config.app_name(), "bulk-pipeline");
        assert_eq!(config.log_level(), LogLevel::Info);
        assert!(config.config_path().is_none());
    }

    #[test]
    fn builder_sets_all_fields() {
        let config = AppConfigBuilder::new()
            .app_name("custom")
            .log_level(LogLevel::Debug)
            .config_path("/etc/bulk-pipeline.toml")
            .verbose(true)
            .build();

        assert_eq!(config.app_name(), "custom");
        assert_eq!(config.log_level(), LogLevel::Debug);
        assert_eq!(config.config_path().unwrap(), &PathBuf::from("/etc/bulk-pipeline.toml"));
        assert!(config.verbose());
    }
}
