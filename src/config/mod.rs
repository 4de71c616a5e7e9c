//! Configuration system for planrun
//!
//! Supports loading configuration from:
//! 1. CLI --config argument
//! 2. ~/.config/planrun/config.json
//! 3. Default values
//!
//! Environment variables override config file values:
//! - PLANRUN_CONCURRENCY

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::runner::DEFAULT_CONCURRENCY;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Requested concurrency; the runner clamps it into [1, 5]
    #[serde(default = "default_concurrency")]
    pub max_concurrency: usize,

    /// Emit per-task progress lines
    #[serde(default)]
    pub verbose: bool,

    /// Default shell command template with {id} and {title} placeholders
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_concurrency: DEFAULT_CONCURRENCY,
            verbose: false,
            command: None,
        }
    }
}

impl AppConfig {
    /// Load configuration with the priority chain described in the module
    /// docs, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(explicit) => Self::from_file(explicit)?,
            None => match Self::default_path() {
                Some(default) if default.exists() => Self::from_file(&default)?,
                _ => Self::default(),
            },
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse a config file as JSON.
    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Default config location: ~/.config/planrun/config.json
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "planrun", "planrun")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = std::env::var("PLANRUN_CONCURRENCY") {
            if let Ok(concurrency) = value.parse() {
                self.max_concurrency = concurrency;
            }
        }
    }

    /// Validate after CLI overrides have been applied.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(command) = &self.command {
            if command.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "command template must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}
