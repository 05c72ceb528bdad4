//! Crate-wide error type
//!
//! Everything a handler cannot answer locally ends up here. The dispatcher's
//! outermost layer turns any of these into a generic 500 envelope.

use thiserror::Error;

use crate::store::StoreError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("malformed request body: {0}")]
    MalformedBody(#[source] serde_json::Error),

    #[error("field {0} must be a string")]
    InvalidField(&'static str),

    #[error("malformed event: {0}")]
    MalformedEvent(#[source] serde_json::Error),

    #[error("unreadable request body: {0}")]
    RequestBody(String),

    #[error("failed to serialize response body: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("store table is not configured (set store.table_name or DYNAMODB_TABLE)")]
    MissingTable,

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("lambda runtime failed: {0}")]
    Runtime(String),

    #[error("logging setup failed: {0}")]
    Logging(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
