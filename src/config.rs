use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use validator::{Validate, ValidationError};

use crate::recursive_query::QueryCacheConfig;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Server configuration with validation
#[derive(Clone, Debug, PartialEq, Validate, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP server host address
    #[validate(length(min = 1, message = "HTTP host cannot be empty"))]
    pub http_host: String,

    /// HTTP server port (1-65535)
    #[validate(range(
        min = 1,
        max = 65535,
        message = "HTTP port must be between 1 and 65535"
    ))]
    pub http_port: u16,

    /// SQLite database file, or `:memory:`
    #[validate(length(min = 1, message = "Database path cannot be empty"))]
    pub database_path: String,

    /// Optional YAML entity catalog; the built-in product catalog otherwise
    #[validate(custom(function = "validate_yaml_path"))]
    pub schema_path: Option<String>,

    pub query_cache_enabled: bool,

    #[validate(range(
        max = 1_000_000,
        message = "Query cache size must be at most 1000000 entries"
    ))]
    pub query_cache_max_entries: usize,

    /// Per-request timeout in seconds
    #[validate(range(
        min = 1,
        max = 3600,
        message = "Request timeout must be between 1 and 3600 seconds"
    ))]
    pub request_timeout_secs: u64,

    /// Load the demo catalog into an empty database on startup
    pub seed_demo: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_host: "0.0.0.0".to_string(),
            http_port: 8080,
            database_path: "catalogtree.db".to_string(),
            schema_path: None,
            query_cache_enabled: true,
            query_cache_max_entries: 1000,
            request_timeout_secs: 30,
            seed_demo: false,
        }
    }
}

impl ServerConfig {
    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            http_host: env::var("CATALOGTREE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            http_port: parse_env_var("CATALOGTREE_PORT", "8080")?,
            database_path: env::var("CATALOGTREE_DATABASE_PATH")
                .unwrap_or_else(|_| "catalogtree.db".to_string()),
            schema_path: env::var("CATALOGTREE_SCHEMA_PATH").ok(),
            query_cache_enabled: parse_env_var("CATALOGTREE_QUERY_CACHE_ENABLED", "true")?,
            query_cache_max_entries: parse_env_var("CATALOGTREE_QUERY_CACHE_MAX_ENTRIES", "1000")?,
            request_timeout_secs: parse_env_var("CATALOGTREE_REQUEST_TIMEOUT_SECS", "30")?,
            seed_demo: parse_env_var("CATALOGTREE_SEED_DEMO", "false")?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from CLI arguments with validation
    pub fn from_cli(cli: CliConfig) -> Result<Self, ConfigError> {
        let config = Self {
            http_host: cli.http_host,
            http_port: cli.http_port,
            database_path: cli.database_path,
            schema_path: cli.schema_path,
            query_cache_enabled: !cli.disable_query_cache,
            query_cache_max_entries: cli.query_cache_max_entries,
            request_timeout_secs: cli.request_timeout_secs,
            seed_demo: cli.seed_demo,
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from YAML file
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            field: "yaml_file".to_string(),
            value: "file read failed".to_string(),
            source: Box::new(e),
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content,
            source: Box::new(e),
        })?;

        config.validate()?;
        Ok(config)
    }

    pub fn cache_config(&self) -> QueryCacheConfig {
        QueryCacheConfig {
            enabled: self.query_cache_enabled,
            max_entries: self.query_cache_max_entries,
        }
    }
}

/// CLI configuration (parsed from command line arguments)
#[derive(Clone, Debug)]
pub struct CliConfig {
    pub http_host: String,
    pub http_port: u16,
    pub database_path: String,
    pub schema_path: Option<String>,
    pub disable_query_cache: bool,
    pub query_cache_max_entries: usize,
    pub request_timeout_secs: u64,
    pub seed_demo: bool,
}

fn validate_yaml_path(path: &str) -> Result<(), ValidationError> {
    if path.ends_with(".yaml") || path.ends_with(".yml") {
        Ok(())
    } else {
        let mut error = ValidationError::new("schema_path");
        error.message = Some("Schema path must point to a .yaml or .yml file".into());
        Err(error)
    }
}

/// Parse an environment variable with a default value
fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}
