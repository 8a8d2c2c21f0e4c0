//! Storage module for persisting sync state
//!
//! This module handles:
//! - The durable key-value store holding seen markers and the resumption cursor
//! - SQLite database initialization and schema management
//! - The short-lived cache holding the rate-limit snooze flag

mod memory;
mod schema;
mod sqlite;
mod traits;

pub use memory::{MemoryCache, MemoryStore};
pub use sqlite::SqliteStore;
pub use traits::{EphemeralCache, KeyValueStore, StorageError, StorageResult};

use std::path::Path;

/// Initializes or opens a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStore)` - Successfully initialized storage
/// * `Err(StorageError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> StorageResult<SqliteStore> {
    SqliteStore::new(path)
}
