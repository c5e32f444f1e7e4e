//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.

use serde::Deserialize;
use serde::de::Error;
use std::fs;
use std::path::Path;

use crate::error::{Result, RuptelaError};
use crate::ruptela::policy::ValidationPolicy;

/// Log levels accepted in `[logging] level`
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub validation: ValidationPolicy,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Decoded packet output configuration
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct OutputConfig {
    /// Emit one message per record instead of one per packet
    #[serde(default)]
    pub batch_mode: bool,

    /// Indent JSON output
    #[serde(default)]
    pub pretty: bool,

    /// Log a summary of every decoded packet at debug level
    #[serde(default)]
    pub enable_debug: bool,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Write logs to a daily rolling file in this directory instead of stderr
    #[serde(default)]
    pub directory: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
        }
    }
}

fn default_log_level() -> String { "info".to_string() }

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    ///
    /// * `Result<Config>` - Loaded and validated configuration
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use ruptela_decoder::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(RuptelaError::Config(
                toml::de::Error::custom(format!(
                    "log level must be one of: {}",
                    LOG_LEVELS.join(", ")
                ))
            ));
        }

        if let Some(directory) = &self.logging.directory {
            if directory.trim().is_empty() {
                return Err(RuptelaError::Config(
                    toml::de::Error::custom("logging directory cannot be empty when set")
                ));
            }
        }

        Ok(())
    }
}
