//! Configuration management for the AQI predictor
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::AqiError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable consulted when no key is configured explicitly
pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Root configuration structure for the AQI predictor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Recommendation service configuration
    pub recommendations: RecommendationsConfig,
    /// Data access configuration
    pub data: DataConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Recommendation (text generation) service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationsConfig {
    /// API key; recommendations are disabled when absent
    pub api_key: Option<String>,
    /// Base URL of the generative language API
    pub base_url: String,
    /// Model used for generation
    pub model: String,
    /// Request timeout in seconds
    pub timeout_seconds: u32,
}

/// Data access settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Simulated fetch latency in milliseconds (0 disables it)
    pub fetch_delay_ms: u64,
    /// City shown on startup and substituted for unknown cities
    pub default_city: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

// Default value functions
fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_timeout() -> u32 {
    20
}

fn default_fetch_delay() -> u64 {
    300
}

fn default_city() -> String {
    "Karachi".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for RecommendationsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            fetch_delay_ms: default_fetch_delay(),
            default_city: default_city(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl AppConfig {
    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides such as AQI_RECOMMENDATIONS__API_KEY
        builder = builder.add_source(
            Environment::with_prefix("AQI")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: AppConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        // A blank key from any source means "not configured"
        let configured = config.recommendations.api_key.take().filter(|key| !key.trim().is_empty());
        config.recommendations.api_key = configured.or_else(|| {
            std::env::var(GEMINI_API_KEY_VAR)
                .ok()
                .filter(|key| !key.trim().is_empty())
        });

        // Apply defaults for missing values
        config.apply_defaults();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("aqi_predictor").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.recommendations.base_url.is_empty() {
            self.recommendations.base_url = default_base_url();
        }
        if self.recommendations.model.is_empty() {
            self.recommendations.model = default_model();
        }
        if self.recommendations.timeout_seconds == 0 {
            self.recommendations.timeout_seconds = default_timeout();
        }
        if self.data.default_city.trim().is_empty() {
            self.data.default_city = default_city();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> Result<()> {
        // The key is optional: without it the dashboard shows a placeholder
        if let Some(api_key) = &self.recommendations.api_key {
            if api_key.is_empty() {
                return Err(AqiError::config(
                    "Recommendations API key cannot be empty if provided. Either remove it or provide a valid key."
                ).into());
            }

            if api_key.len() < 8 {
                return Err(AqiError::config(
                    "Recommendations API key appears to be invalid (too short). Please check your API key."
                ).into());
            }

            if api_key.len() > 200 {
                return Err(AqiError::config(
                    "Recommendations API key appears to be invalid (too long). Please check your API key."
                ).into());
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.recommendations.timeout_seconds > 300 {
            return Err(
                AqiError::config("Recommendations timeout cannot exceed 300 seconds").into(),
            );
        }

        if self.data.fetch_delay_ms > 10_000 {
            return Err(AqiError::config("Fetch delay cannot exceed 10000 ms").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(AqiError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(AqiError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        let base_url = &self.recommendations.base_url;
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(AqiError::config(
                "Recommendations base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        Ok(())
    }
}
