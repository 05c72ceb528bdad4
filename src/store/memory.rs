use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::{StoreError, UserRecord, UserStore};

/// In-memory UserStore for testing and local runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<BTreeMap<String, UserRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get(&self, user_id: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.records.read().await.get(user_id).cloned())
    }

    async fn scan(&self) -> Result<Vec<UserRecord>, StoreError> {
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn put(&self, record: UserRecord) -> Result<(), StoreError> {
        self.records
            .write()
            .await
            .insert(record.user_id.clone(), record);
        Ok(())
    }
}
