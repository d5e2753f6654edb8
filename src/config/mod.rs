//! Configuration management for cmdcomplete
//!
//! This module handles loading, parsing, and managing configuration from various sources:
//! - Configuration files (TOML format)
//! - Environment variables
//! - Command-line arguments
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. Configuration file
//! 4. Default values

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::completion::ContextSearch;
use crate::error::{CmdCompleteError, ConfigError, Result};

/// Environment variable overriding `model.path`
pub const MODEL_ENV_VAR: &str = "CMDCOMPLETE_MODEL";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Command model source
    pub model: ModelConfig,

    /// Completion behaviour
    pub completion: CompletionConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Where the command model is read from
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelConfig {
    /// Path to the TOML model definition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Completion behaviour
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompletionConfig {
    /// How far the resolver searches the parse tree for the context token
    #[serde(default)]
    pub context_search: ContextSearch,

    /// Let aliases name the context command
    #[serde(default = "default_match_aliases")]
    pub match_aliases: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Enable timestamps in logs
    #[serde(default = "default_log_timestamps")]
    pub timestamps: bool,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

// Default value functions
fn default_match_aliases() -> bool {
    true
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

fn default_log_timestamps() -> bool {
    false
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            context_search: ContextSearch::default(),
            match_aliases: default_match_aliases(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            timestamps: default_log_timestamps(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a file
    ///
    /// An explicitly given path must exist. When no path is given the
    /// default location is tried, and a missing default file yields the
    /// default configuration.
    ///
    /// # Arguments
    /// * `path` - Optional path to the configuration file (TOML format)
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    pub fn load_from_file(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::default_config_path(), false),
        };

        match fs::read_to_string(&path) {
            Ok(text) => Self::from_toml_str(&text),
            Err(e) if e.kind() == io::ErrorKind::NotFound && !explicit => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(ConfigError::FileNotFound(path.display().to_string()).into())
            }
            Err(e) => Err(CmdCompleteError::Io(e)),
        }
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| ConfigError::InvalidFormat(e.to_string()).into())
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Apply overrides using `lookup` to read variables
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(MODEL_ENV_VAR).filter(|p| !p.is_empty()) {
            self.model.path = Some(PathBuf::from(path));
        }
    }

    /// Get the default configuration file path
    ///
    /// # Returns
    /// * `PathBuf` - Path to default configuration file
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".cmdcomplete")
            .join("config.toml")
    }

    /// Validate the configuration
    ///
    /// # Returns
    /// * `Result<()>` - Ok if valid, error otherwise
    pub fn validate(&self) -> Result<()> {
        if let Some(path) = &self.model.path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "model.path".to_string(),
                    value: String::new(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Path of the command model definition
    ///
    /// # Returns
    /// * `Result<&Path>` - Configured path, or a missing-field error
    pub fn model_path(&self) -> Result<&Path> {
        self.model
            .path
            .as_deref()
            .ok_or_else(|| ConfigError::MissingField("model.path".to_string()).into())
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidFormat(e.to_string()).into())
    }
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}
