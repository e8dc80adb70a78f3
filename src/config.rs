//! Recovery configuration
//!
//! Loaded once from a JSON file, immutable afterwards. Every field has a
//! default so a minimal file only names the replication endpoint.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File path
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON for this schema
    #[error("invalid config {path}: {source}")]
    Parse {
        /// File path
        path: String,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },

    /// Config parsed but failed validation
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Returns the stable error code.
    pub fn code(&self) -> &'static str {
        "CDC_CONFIG_INVALID"
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Endpoint replication sessions connect to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MysqlEndpoint {
    /// Server host (default: "127.0.0.1")
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port (default: 3306)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Replication user (default: "replicator")
    #[serde(default = "default_user")]
    pub user: String,

    /// Password, if the account has one
    #[serde(default)]
    pub password: Option<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3306
}

fn default_user() -> String {
    "replicator".to_string()
}

impl Default for MysqlEndpoint {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            user: default_user(),
            password: None,
        }
    }
}

impl MysqlEndpoint {
    /// Get the `host:port` address string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Master recovery configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryConfig {
    /// Database holding the pipeline's own bookkeeping tables (default: "cdc")
    #[serde(default = "default_schema_database")]
    pub schema_database: String,

    /// Table the pipeline writes heartbeats into (default: "heartbeats")
    #[serde(default = "default_heartbeat_table")]
    pub heartbeat_table: String,

    /// Column carrying the heartbeat value (default: "heartbeat")
    #[serde(default = "default_heartbeat_column")]
    pub heartbeat_column: String,

    /// Endpoint of the new master
    #[serde(default)]
    pub replication: MysqlEndpoint,
}

fn default_schema_database() -> String {
    "cdc".to_string()
}

fn default_heartbeat_table() -> String {
    "heartbeats".to_string()
}

fn default_heartbeat_column() -> String {
    "heartbeat".to_string()
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            schema_database: default_schema_database(),
            heartbeat_table: default_heartbeat_table(),
            heartbeat_column: default_heartbeat_column(),
            replication: MysqlEndpoint::default(),
        }
    }
}

impl RecoveryConfig {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;

        let config: RecoveryConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.display().to_string(),
                source: e,
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.schema_database.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "schema_database must not be empty".to_string(),
            ));
        }
        if self.heartbeat_table.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "heartbeat_table must not be empty".to_string(),
            ));
        }
        if self.heartbeat_column.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "heartbeat_column must not be empty".to_string(),
            ));
        }
        if self.replication.host.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "replication.host must not be empty".to_string(),
            ));
        }
        if self.replication.port == 0 {
            return Err(ConfigError::Invalid(
                "replication.port must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}
