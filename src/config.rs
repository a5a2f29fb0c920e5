//! Configuration management for the `Wanderlist` service
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::WanderlistError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `Wanderlist` service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WanderlistConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Destination dataset configuration
    #[serde(default)]
    pub dataset: DatasetConfig,
    /// List storage configuration
    #[serde(default)]
    pub lists: ListsConfig,
    /// Pagination defaults for filtered queries
    #[serde(default)]
    pub query: QueryConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory of static client files served for non-API paths
    #[serde(default)]
    pub static_dir: Option<String>,
    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u32,
}

/// Destination dataset settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Path of the destinations CSV file
    #[serde(default = "default_dataset_path")]
    pub path: String,
    /// Reload automatically when the file's modification time changes
    #[serde(default = "default_watch_for_changes")]
    pub watch_for_changes: bool,
}

/// Which list store backend to run
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ListBackend {
    /// Lists live for the process lifetime only
    #[default]
    Memory,
    /// Lists are kept in an embedded keyspace on disk
    Persistent,
}

/// List storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListsConfig {
    #[serde(default)]
    pub backend: ListBackend,
    /// Keyspace directory for the persistent backend
    #[serde(default = "default_lists_path")]
    pub path: String,
}

/// Pagination settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Page size when the request gives none or an invalid one
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    /// Largest page size a request may ask for
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_request_timeout() -> u32 {
    30
}

fn default_dataset_path() -> String {
    "data/europe-destinations.csv".to_string()
}

fn default_watch_for_changes() -> bool {
    true
}

fn default_lists_path() -> String {
    "data/lists".to_string()
}

fn default_limit() -> usize {
    5
}

fn default_max_limit() -> usize {
    100
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: None,
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: default_dataset_path(),
            watch_for_changes: default_watch_for_changes(),
        }
    }
}

impl Default for ListsConfig {
    fn default() -> Self {
        Self {
            backend: ListBackend::default(),
            path: default_lists_path(),
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
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

impl WanderlistConfig {
    /// Load configuration from `config_path`, or from `config.toml` if present, plus environment variables
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let explicit = config_path.is_some();
        let config_file = config_path.unwrap_or_else(|| PathBuf::from("config.toml"));

        if explicit || config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(explicit)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides such as WANDERLIST_SERVER__PORT=8080
        builder = builder.add_source(
            Environment::with_prefix("WANDERLIST")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| format!("Failed to build configuration from {}", config_file.display()))?;

        let mut config: WanderlistConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.server.request_timeout_seconds == 0 {
            self.server.request_timeout_seconds = default_request_timeout();
        }
        if self.dataset.path.is_empty() {
            self.dataset.path = default_dataset_path();
        }
        if self.lists.path.is_empty() {
            self.lists.path = default_lists_path();
        }
        if self.query.default_limit == 0 {
            self.query.default_limit = default_limit();
        }
        if self.query.max_limit == 0 {
            self.query.max_limit = default_max_limit();
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
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(WanderlistError::config("Server port cannot be 0").into());
        }

        if self.server.request_timeout_seconds > 300 {
            return Err(
                WanderlistError::config("Request timeout cannot exceed 300 seconds").into(),
            );
        }

        if self.query.max_limit > 10_000 {
            return Err(WanderlistError::config("Maximum page size cannot exceed 10000").into());
        }

        if self.query.default_limit > self.query.max_limit {
            return Err(WanderlistError::config(format!(
                "Default page size {} exceeds maximum page size {}",
                self.query.default_limit, self.query.max_limit
            ))
            .into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(WanderlistError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(WanderlistError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = WanderlistConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.dataset.path, "data/europe-destinations.csv");
        assert!(config.dataset.watch_for_changes);
        assert_eq!(config.lists.backend, ListBackend::Memory);
        assert_eq!(config.query.default_limit, 5);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = WanderlistConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = WanderlistConfig::default();
        config.server.request_timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));
    }

    #[test]
    fn test_default_limit_must_fit_max_limit() {
        let mut config = WanderlistConfig::default();
        config.query.default_limit = 50;
        config.query.max_limit = 10;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_defaults_fills_zero_values() {
        let mut config = WanderlistConfig::default();
        config.query.default_limit = 0;
        config.logging.format = String::new();
        config.apply_defaults();
        assert_eq!(config.query.default_limit, 5);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[server]
port = 8081
static_dir = "client"

[lists]
backend = "persistent"
path = "/tmp/wanderlist-lists"

[query]
default_limit = 10
"#
        )
        .unwrap();

        let config = WanderlistConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.server.static_dir.as_deref(), Some("client"));
        assert_eq!(config.lists.backend, ListBackend::Persistent);
        assert_eq!(config.query.default_limit, 10);
        assert_eq!(config.query.max_limit, 100);
        assert_eq!(config.dataset.path, "data/europe-destinations.csv");
    }

    #[test]
    fn test_missing_explicit_config_file_fails() {
        let result = WanderlistConfig::load_from_path(Some(PathBuf::from("no/such/wanderlist.toml")));
        assert!(result.is_err());
    }
}
