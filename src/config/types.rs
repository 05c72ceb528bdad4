// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub http: HttpConfig,
    pub store: StoreConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
    /// Per-connection timeout in seconds
    pub request_timeout: u64,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Filter directive passed to the tracing subscriber (e.g. "info", "api_handler=debug")
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common or json)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// HTTP response configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct HttpConfig {
    /// Attach permissive CORS headers to every response envelope
    #[serde(default)]
    pub enable_cors: bool,
}

/// Which [`UserStore`](crate::store::UserStore) implementation backs the users handlers
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// Managed table reached through the AWS SDK
    Dynamodb,
    Memory,
    File,
}

/// Store configuration
#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub data_dir: PathBuf,
    /// Table identifier; required before any store is built
    #[serde(default)]
    pub table_name: Option<String>,
}

impl StoreConfig {
    /// Table identifier, or [`Error::MissingTable`] when unset or blank
    pub fn table_name(&self) -> Result<&str> {
        match self.table_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => Ok(name),
            _ => Err(Error::MissingTable),
        }
    }
}
