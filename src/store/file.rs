//! # Filesystem-backed user store
//!
//! [`FileStore`] keeps one table per JSON document:
//!
//! ```text
//! <data_dir>/
//! └── <table_name>.json    # {"<userId>": {...record...}, ...}
//! ```
//!
//! A missing file is an empty table. Writes replace the whole document via a
//! temporary file and a rename, under a lock so concurrent upserts are not lost.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use super::{StoreError, UserRecord, UserStore};

type Table = BTreeMap<String, UserRecord>;

/// JSON-file UserStore that persists across restarts.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(data_dir: &Path, table_name: &str) -> Self {
        Self {
            path: data_dir.join(format!("{table_name}.json")),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Table, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Table::new()),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
            path: self.path.display().to_string(),
            source,
        })
    }

    async fn save(&self, table: &Table) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let content = serde_json::to_string_pretty(table).map_err(StoreError::Encode)?;
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, content).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for FileStore {
    async fn get(&self, user_id: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.load().await?.remove(user_id))
    }

    async fn scan(&self) -> Result<Vec<UserRecord>, StoreError> {
        Ok(self.load().await?.into_values().collect())
    }

    async fn put(&self, record: UserRecord) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut table = self.load().await?;
        table.insert(record.user_id.clone(), record);
        self.save(&table).await
    }
}
