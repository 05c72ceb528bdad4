//! Logger module
//!
//! Provides logging utilities for the handler and its HTTP host including:
//! - Subscriber setup from configuration
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging

mod format;

pub use format::AccessLogEntry;

use std::net::SocketAddr;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::error::{Error, Result};

/// Initialize the global subscriber with configuration
///
/// `RUST_LOG` takes precedence over `logging.level` when set.
/// Should be called once at application startup.
pub fn init(config: &Config) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.logging.level)
            .map_err(|e| Error::Logging(format!("invalid level '{}': {e}", config.logging.level)))?,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    tracing::info!("Listening on: http://{addr}");
    tracing::info!(
        table = config.store.table_name.as_deref().unwrap_or("-"),
        backend = ?config.store.backend,
        "User store ready"
    );
    if let Some(workers) = config.server.workers {
        tracing::info!("Worker threads: {workers}");
    }
    tracing::info!(
        access_log = config.logging.access_log,
        format = %config.logging.access_log_format,
        cors = config.http.enable_cors,
        "Logging configured"
    );
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    tracing::error!("Failed to serve connection: {err:?}");
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

/// Unhandled failure that is about to be answered with a 500
pub fn log_handler_error(method: &str, path: &str, err: &Error) {
    tracing::error!(method, path, error = %err, "Request failed");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    tracing::info!(target: "access", "{}", entry.format(format));
}

pub fn log_shutdown() {
    tracing::info!("Shutdown signal received, no longer accepting connections");
}
