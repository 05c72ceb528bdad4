//! User store module
//!
//! The users handlers only ever talk to a [`UserStore`]: one point lookup,
//! one scan or one upsert per request. Connection lifecycle belongs to the
//! implementation.

mod dynamo;
mod file;
mod memory;

pub use dynamo::DynamoStore;
pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::config::{StoreBackend, StoreConfig};

/// A persisted user, keyed by `user_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub user_id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    pub created_at: String,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("table I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("table file {path} is corrupt: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode table: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("dynamodb request failed: {0}")]
    Dynamo(#[source] Box<aws_sdk_dynamodb::Error>),

    #[error("stored item is invalid: {0}")]
    InvalidItem(String),
}

/// Key-value store holding [`UserRecord`]s
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Point lookup by `user_id`
    async fn get(&self, user_id: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Single scan of the whole table; order is implementation-defined
    async fn scan(&self) -> Result<Vec<UserRecord>, StoreError>;

    /// Unconditional upsert keyed by `record.user_id`
    async fn put(&self, record: UserRecord) -> Result<(), StoreError>;
}

/// Build the configured store
///
/// Fails with [`Error::MissingTable`](crate::error::Error::MissingTable) when no
/// table identifier is configured, so this belongs at startup.
pub async fn build(config: &StoreConfig) -> crate::error::Result<Arc<dyn UserStore>> {
    let table = config.table_name()?;
    let store: Arc<dyn UserStore> = match config.backend {
        StoreBackend::Dynamodb => Arc::new(DynamoStore::from_env(table).await),
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
        StoreBackend::File => Arc::new(FileStore::new(&config.data_dir, table)),
    };
    Ok(store)
}
