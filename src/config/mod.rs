// Configuration module entry point
// Loads application configuration once at process start

mod types;

use std::net::SocketAddr;

use crate::error::{Error, Result};

// Re-export public types
pub use types::{Config, HttpConfig, LoggingConfig, ServerConfig, StoreBackend, StoreConfig};

/// Environment variable carrying the store table identifier
pub const TABLE_ENV_VAR: &str = "DYNAMODB_TABLE";

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self> {
        Self::from_sources(config_path, std::env::var(TABLE_ENV_VAR).ok())
    }

    pub(crate) fn from_sources(config_path: &str, table_override: Option<String>) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.request_timeout", 30)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("http.enable_cors", false)?
            .set_default("store.backend", "dynamodb")?
            .set_default("store.data_dir", "data")?
            .set_override_option("store.table_name", table_override)?
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| Error::InvalidAddress(format!("{}:{}: {e}", self.server.host, self.server.port)))
    }
}
