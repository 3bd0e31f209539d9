//! Configuration management for txnstack
//!
//! This module handles loading, validation, and management of
//! txnstack configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use error::{ConfigError, ConfigResult};

/// API key values that keep the feature gate in local mode
pub const LOCAL_API_KEYS: [&str; 2] = ["dev-mode", "local"];

// ==================== Configuration Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8082
}

/// Data directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Path to the data directory
    #[serde(default = "default_data_path")]
    pub path: PathBuf,
    /// Transactions file name (relative to data path)
    #[serde(default = "default_transactions_file")]
    pub transactions_file: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            transactions_file: default_transactions_file(),
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("./data")
}

fn default_transactions_file() -> String {
    "transactions.json".to_string()
}

/// Remote feature flag settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturesConfig {
    /// Flag provider API key. Empty, "dev-mode" or "local" disables remote calls.
    #[serde(default)]
    pub api_key: String,
    /// Base URL of the flag provider
    #[serde(default = "default_provider_url")]
    pub provider_url: String,
    /// Seconds between background flag refreshes
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
    /// Pin advanced filtering to a fixed value, bypassing the provider
    #[serde(default)]
    pub advanced_filters_override: Option<bool>,
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            provider_url: default_provider_url(),
            refresh_interval_secs: default_refresh_interval(),
            advanced_filters_override: None,
        }
    }
}

fn default_provider_url() -> String {
    "https://flags.example.invalid".to_string()
}

fn default_refresh_interval() -> u64 {
    60
}

impl FeaturesConfig {
    /// Whether the API key selects local mode (no provider traffic)
    pub fn is_local(&self) -> bool {
        let key = self.api_key.trim();
        key.is_empty() || LOCAL_API_KEYS.contains(&key)
    }
}

/// Request identity settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Header carrying the caller's user id
    #[serde(default = "default_user_header")]
    pub user_header: String,
    /// User id assumed when the header is missing
    #[serde(default = "default_user_id")]
    pub default_user_id: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            user_header: default_user_header(),
            default_user_id: default_user_id(),
        }
    }
}

fn default_user_header() -> String {
    "X-User-ID".to_string()
}

fn default_user_id() -> String {
    "user-001".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Data directory settings
    #[serde(default)]
    pub data: DataConfig,
    /// Feature flag settings
    #[serde(default)]
    pub features: FeaturesConfig,
    /// Request identity settings
    #[serde(default)]
    pub auth: AuthConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::IoError)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::InvalidYaml { message: e.to_string() })?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        if self.data.transactions_file.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "data.transactions_file".to_string(),
                reason: "Transactions file name must not be empty".to_string(),
            });
        }

        if self.features.refresh_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "features.refresh_interval_secs".to_string(),
                reason: "Refresh interval must be at least 1 second".to_string(),
            });
        }

        if !self.features.is_local() && self.features.provider_url.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "features.provider_url".to_string(),
            });
        }

        if self.auth.user_header.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "auth.user_header".to_string(),
                reason: "User header name must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Default configuration file contents
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Full path to the transactions data file
    pub fn transactions_path(&self) -> PathBuf {
        self.data.path.join(&self.data.transactions_file)
    }

    /// Listen address in `host:port` form
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8082);
        assert_eq!(config.transactions_path(), PathBuf::from("./data/transactions.json"));
        assert_eq!(config.auth.default_user_id, "user-001");
        assert!(config.features.is_local());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_template_parses() {
        let config = Config::from_yaml(Config::generate_default()).unwrap();
        assert_eq!(config.server.port, 8082);
        assert_eq!(config.features.refresh_interval_secs, 60);
        assert_eq!(config.features.advanced_filters_override, None);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = Config::from_yaml("server:\n  port: 9000\n").unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.data.transactions_file, "transactions.json");
    }

    #[test]
    fn test_local_api_keys() {
        let mut features = FeaturesConfig::default();
        for key in ["", "  ", "dev-mode", "local"] {
            features.api_key = key.to_string();
            assert!(features.is_local(), "{:?} should be local", key);
        }
        features.api_key = "abc123".to_string();
        assert!(!features.is_local());
    }

    #[test]
    fn test_invalid_port() {
        let err = Config::from_yaml("server:\n  port: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "server.port"));
    }

    #[test]
    fn test_invalid_refresh_interval() {
        let err = Config::from_yaml("features:\n  refresh_interval_secs: 0\n").unwrap_err();
        assert_eq!(err.code(), error::ConfigErrorCode::InvalidValue);
    }

    #[test]
    fn test_remote_mode_requires_provider_url() {
        let yaml = "features:\n  api_key: secret\n  provider_url: \"\"\n";
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { .. }));
    }

    #[test]
    fn test_invalid_yaml() {
        let err = Config::from_yaml("server: [").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidYaml { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "data:\n  path: /srv/data\nlogging:\n  level: debug").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.transactions_path(), PathBuf::from("/srv/data/transactions.json"));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }
}
