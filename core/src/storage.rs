use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use rusqlite::Connection;
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::Mutex;

use crate::db;
use crate::error::Result;

/// Cached plant list
pub const PLANTS_KEY: &str = "plants";
/// Configured reminder time
pub const NOTIFICATION_TIME_KEY: &str = "notificationTime";
/// Prefix of the per-date scheduled notification records
pub const NOTIFICATION_RECORD_PREFIX: &str = "notification:";

/// String-keyed durable storage for JSON blobs
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>>;
}

/// Key-value store backed by the sprout SQLite database
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = db::open_db(path)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn in_memory() -> Result<Self> {
        let conn = db::open_in_memory()?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let conn = self.conn.lock().await;
        Ok(db::get_value(&conn, key)?)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.conn.lock().await;
        Ok(db::set_value(&conn, key, value)?)
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let conn = self.conn.lock().await;
        Ok(db::remove_value(&conn, key)?)
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        let conn = self.conn.lock().await;
        Ok(db::keys_with_prefix(&conn, prefix)?)
    }
}

/// Volatile store, handy for embedding and tests
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }

    async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .entries
            .lock()
            .await
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}

/// Read and decode a JSON value.
///
/// Read failures and malformed JSON are logged and reported as `None`.
pub async fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.get(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read local storage");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "discarding malformed stored value");
            None
        }
    }
}

/// Encode a value as JSON and store it
pub async fn save_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw).await
}
