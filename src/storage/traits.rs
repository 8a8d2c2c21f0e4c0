//! Storage traits and error types
//!
//! This module defines the two persistence collaborators the sync depends on:
//! a durable key-value store and a short-lived cache with expiring entries.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage lock poisoned")]
    Poisoned,
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Durable key-value storage
///
/// Values survive process restarts. Implementations are scoped to a single
/// sync instance; two stores never share keys.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Gets the value stored under `key`, if any
    async fn get(&self, key: &str) -> StorageResult<Option<Value>>;

    /// Stores `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: Value) -> StorageResult<()>;
}

/// Short-lived cache whose entries expire on their own
#[async_trait]
pub trait EphemeralCache: Send + Sync {
    /// Gets the live value under `key`; expired entries read as `None`
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Stores `value` under `key` for `ttl`
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> StorageResult<()>;
}
