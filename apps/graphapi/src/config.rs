//! # Configuration
//!
//! Loads the application configuration in three layers, later layers winning:
//!
//! 1. Built-in defaults
//! 2. An optional TOML file (`--config graphapi.toml`)
//! 3. Environment variables
//!
//! CLI flags are applied on top by the command that uses them.
//!
//! ## Environment Variables
//!
//! - `GRAPHAPI_HOST`, `GRAPHAPI_PORT`: bind address
//! - `GRAPHAPI_API_KEY`: if set and non-empty, requires Bearer authentication
//! - `GRAPHAPI_RATE_LIMIT`: requests per second (0 disables)
//! - `GRAPHAPI_CORS_ORIGINS`: comma-separated origins, or `*`
//! - `GRAPHAPI_LOG_FORMAT`: `text` or `json`
//!
//! ## Example
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 9090
//! rate_limit = 50
//!
//! [engine]
//! id_start = 1000
//! max_ui_name_length = 4096
//!
//! [log]
//! format = "json"
//! ```

use graphapi_core::{EngineConfig, GraphError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Maximum accepted size of a configuration file (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

/// Default tracing filter when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "graphapi=info,graphapi_core=info,tower_http=debug";

// =============================================================================
// CONFIG SECTIONS
// =============================================================================

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub engine: EngineConfig,
    pub log: LogConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Bearer token required on every route except `/health`.
    pub api_key: Option<String>,
    /// Requests per second; 0 disables rate limiting.
    pub rate_limit: u32,
    /// Comma-separated allowed origins, `*` for any, unset for localhost only.
    pub cors_origins: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            api_key: None,
            rate_limit: 100,
            cors_origins: None,
        }
    }
}

impl ServerConfig {
    /// The `host:port` string to bind.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub format: LogFormat,
    /// Tracing filter directive; `RUST_LOG` takes precedence.
    pub filter: Option<String>,
}

// =============================================================================
// LOADING
// =============================================================================

impl Config {
    /// Load defaults, then `path` if given, then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, GraphError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, GraphError> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            GraphError::Io(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(GraphError::Config(format!(
                "Config file size {} bytes exceeds maximum {} bytes",
                metadata.len(),
                MAX_CONFIG_FILE_SIZE
            )));
        }

        let text = std::fs::read_to_string(path).map_err(|e| {
            GraphError::Io(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    /// Parse TOML text. Missing tables and keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, GraphError> {
        toml::from_str(text).map_err(|e| GraphError::Config(format!("Invalid TOML: {}", e)))
    }

    /// Override fields from environment variables read through `lookup`.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), GraphError> {
        if let Some(host) = lookup("GRAPHAPI_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("GRAPHAPI_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| GraphError::Config(format!("GRAPHAPI_PORT is not a port: {port:?}")))?;
        }
        if let Some(key) = lookup("GRAPHAPI_API_KEY") {
            self.server.api_key = Some(key);
        }
        if let Some(rate) = lookup("GRAPHAPI_RATE_LIMIT") {
            self.server.rate_limit = rate.parse().map_err(|_| {
                GraphError::Config(format!("GRAPHAPI_RATE_LIMIT is not a number: {rate:?}"))
            })?;
        }
        if let Some(origins) = lookup("GRAPHAPI_CORS_ORIGINS") {
            self.server.cors_origins = Some(origins);
        }
        if let Some(format) = lookup("GRAPHAPI_LOG_FORMAT") {
            self.log.format = match format.as_str() {
                "json" => LogFormat::Json,
                "text" => LogFormat::Text,
                other => {
                    return Err(GraphError::Config(format!(
                        "GRAPHAPI_LOG_FORMAT must be 'text' or 'json', got {other:?}"
                    )));
                }
            };
        }

        // An empty key means "no auth", same as unset.
        if self.server.api_key.as_deref().is_some_and(str::is_empty) {
            self.server.api_key = None;
        }
        Ok(())
    }

    /// Reject settings the server could not run with.
    pub fn validate(&self) -> Result<(), GraphError> {
        if self.server.host.trim().is_empty() {
            return Err(GraphError::Config("server.host must not be empty".to_string()));
        }
        self.engine.validate()
    }
}

// =============================================================================
// TESTS
// =============================================================================
