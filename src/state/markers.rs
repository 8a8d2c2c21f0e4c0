use crate::storage::{KeyValueStore, StorageResult};
use serde_json::Value;

/// Durable key holding the resumption cursor
pub const CURSOR_KEY: &str = "current-url";

/// Durable "already reported" flag for one entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeenMarker {
    Order(u64),
    Customer(String),
}

impl SeenMarker {
    /// Storage key: `order-{id}` or `customer-{email}`
    pub fn key(&self) -> String {
        match self {
            Self::Order(id) => format!("order-{}", id),
            Self::Customer(email) => format!("customer-{}", email),
        }
    }

    /// Returns true if the marker has been set
    pub async fn is_set(&self, store: &dyn KeyValueStore) -> StorageResult<bool> {
        let value = store.get(&self.key()).await?;
        Ok(matches!(value, Some(Value::Bool(true))))
    }

    /// Sets the marker; setting an already-set marker is a no-op
    pub async fn set(&self, store: &dyn KeyValueStore) -> StorageResult<()> {
        store.set(&self.key(), Value::Bool(true)).await
    }
}

/// Accessors for the persisted next-page URL
///
/// A stored JSON `null` and an absent key both mean "no run in progress".
pub struct ResumeCursor;

impl ResumeCursor {
    pub async fn load(store: &dyn KeyValueStore) -> StorageResult<Option<String>> {
        let value = store.get(CURSOR_KEY).await?;
        Ok(match value {
            Some(Value::String(url)) if !url.is_empty() => Some(url),
            _ => None,
        })
    }

    pub async fn save(store: &dyn KeyValueStore, url: &str) -> StorageResult<()> {
        store.set(CURSOR_KEY, Value::String(url.to_string())).await
    }

    pub async fn clear(store: &dyn KeyValueStore) -> StorageResult<()> {
        store.set(CURSOR_KEY, Value::Null).await
    }
}
