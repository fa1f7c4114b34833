//! Configuration management for cardpay
//!
//! This module handles loading, validation, and management of
//! cardpay configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use error::ConfigError;

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
    8081
}

/// Remittance backend the card purchases are fetched from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Backend root URL, e.g. "http://127.0.0.1:8000/"
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Path of the admin transactions collection, relative to `base_url`
    #[serde(default = "default_transactions_path")]
    pub transactions_path: String,
    /// Bearer token sent with every backend request
    #[serde(default)]
    pub token: Option<String>,
    /// Serve records from a local JSON file instead of the backend
    #[serde(default)]
    pub fixture_path: Option<PathBuf>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            transactions_path: default_transactions_path(),
            token: None,
            fixture_path: None,
        }
    }
}

impl BackendConfig {
    /// `base_url` and `transactions_path` joined by a single slash
    pub fn transactions_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = self.transactions_path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000/".to_string()
}

fn default_transactions_path() -> String {
    "api/remit/admin/transactions/".to_string()
}

/// Pagination settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Page sizes offered by the rows-per-page selector
    #[serde(default = "default_page_sizes")]
    pub page_sizes: Vec<usize>,
    /// Page size used on first load and as fallback for unknown sizes
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_sizes: default_page_sizes(),
            default_page_size: default_page_size(),
        }
    }
}

fn default_page_sizes() -> Vec<usize> {
    vec![5, 10, 25]
}

fn default_page_size() -> usize {
    5
}

/// Operator session handed to the page.
///
/// Authentication itself lives outside cardpay; this only records what
/// the surrounding application established about the operator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_true")]
    pub logged_in: bool,
    #[serde(default = "default_username")]
    pub username: String,
    /// Superusers may mark agent commissions as paid
    #[serde(default = "default_false")]
    pub is_superuser: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            logged_in: true,
            username: default_username(),
            is_superuser: false,
        }
    }
}

fn default_username() -> String {
    "admin".to_string()
}

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

/// Currency and number formatting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrencyConfig {
    /// Number of decimal places
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            decimal_places: default_decimal_places(),
        }
    }
}

fn default_decimal_places() -> u32 {
    2
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
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
    /// Backend settings
    #[serde(default)]
    pub backend: BackendConfig,
    /// Pagination settings
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// Operator session
    #[serde(default)]
    pub session: SessionConfig,
    /// Currency settings
    #[serde(default)]
    pub currency: CurrencyConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => ConfigError::IoError {
                message: e.to_string(),
            },
        })?;

        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content).map_err(|e| ConfigError::InvalidYaml {
            message: e.to_string(),
        })?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        if self.pagination.page_sizes.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "pagination.page_sizes".to_string(),
                reason: "At least one page size is required".to_string(),
            });
        }

        if self.pagination.page_sizes.contains(&0) {
            return Err(ConfigError::InvalidValue {
                field: "pagination.page_sizes".to_string(),
                reason: "Page sizes must be greater than 0".to_string(),
            });
        }

        if !self
            .pagination
            .page_sizes
            .contains(&self.pagination.default_page_size)
        {
            return Err(ConfigError::InvalidValue {
                field: "pagination.default_page_size".to_string(),
                reason: format!(
                    "Default page size {} is not one of {:?}",
                    self.pagination.default_page_size, self.pagination.page_sizes
                ),
            });
        }

        if self.currency.decimal_places > 10 {
            return Err(ConfigError::InvalidValue {
                field: "currency.decimal_places".to_string(),
                reason: "Decimal places must be between 0 and 10".to_string(),
            });
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                reason: format!("Log level must be one of {:?}", LOG_LEVELS),
            });
        }

        if self.backend.fixture_path.is_none() && self.backend.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "backend.base_url is required unless backend.fixture_path is set"
                    .to_string(),
            });
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }

    /// Full URL of the transactions collection
    pub fn transactions_url(&self) -> String {
        self.backend.transactions_url()
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.pagination.page_sizes, vec![5, 10, 25]);
        assert_eq!(config.pagination.default_page_size, 5);
        assert!(config.session.logged_in);
        assert!(!config.session.is_superuser);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_generated_default_parses() {
        let config = Config::from_yaml(Config::generate_default()).unwrap();
        assert_eq!(config.backend.transactions_path, "api/remit/admin/transactions/");
        assert!(config.session.is_superuser);
        assert!(config.backend.fixture_path.is_none());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = Config::from_yaml("server:\n  port: 9000\n").unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.currency.decimal_places, 2);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_default_page_size_must_be_allowed() {
        let yaml = "pagination:\n  page_sizes: [10, 20]\n  default_page_size: 5\n";
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "pagination.default_page_size"));
    }

    #[test]
    fn test_empty_page_sizes_rejected() {
        let yaml = "pagination:\n  page_sizes: []\n";
        assert!(Config::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_invalid_port() {
        let err = Config::from_yaml("server:\n  port: 0\n").unwrap_err();
        assert!(err.to_string().contains("server.port"));
    }

    #[test]
    fn test_invalid_log_level() {
        assert!(Config::from_yaml("logging:\n  level: loud\n").is_err());
        assert!(Config::from_yaml("logging:\n  level: DEBUG\n").is_ok());
    }

    #[test]
    fn test_invalid_yaml() {
        let err = Config::from_yaml("server: [").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidYaml { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load("/definitely/not/here/config.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
    }

    #[test]
    fn test_transactions_url_joins_slashes() {
        let mut config = Config::default();
        config.backend.base_url = "http://backend:8000/".to_string();
        config.backend.transactions_path = "/api/remit/admin/transactions/".to_string();
        assert_eq!(
            config.transactions_url(),
            "http://backend:8000/api/remit/admin/transactions/"
        );
    }
}
