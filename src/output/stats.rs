//! Statistics generation from the sync database
//!
//! This module provides functionality for extracting and displaying
//! sync progress from the durable store.

use crate::state::{ResumeCursor, CURSOR_KEY};
use crate::storage::SqliteStore;
use crate::SyncError;

/// Sync progress summary
#[derive(Debug, Clone, PartialEq)]
pub struct SyncStatistics {
    /// Next page to fetch, if a run is in progress
    pub cursor: Option<String>,

    /// When the cursor was last written
    pub cursor_updated_at: Option<String>,

    /// Orders reported at least once
    pub orders_seen: u64,

    /// Customers reported at least once
    pub customers_seen: u64,
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `store` - The SQLite store to query
///
/// # Returns
///
/// * `Ok(SyncStatistics)` - Successfully loaded statistics
/// * `Err(SyncError)` - Failed to query statistics
pub async fn load_statistics(store: &SqliteStore) -> Result<SyncStatistics, SyncError> {
    let cursor = ResumeCursor::load(store).await?;
    let cursor_updated_at = store.updated_at(CURSOR_KEY)?;
    let orders_seen = store.count_markers("order-")?;
    let customers_seen = store.count_markers("customer-")?;

    Ok(SyncStatistics {
        cursor,
        cursor_updated_at,
        orders_seen,
        customers_seen,
    })
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &SyncStatistics) {
    println!("=== Sync Statistics ===\n");

    println!("Seen Markers:");
    println!("  Orders: {}", stats.orders_seen);
    println!("  Customers: {}", stats.customers_seen);
    println!();

    match &stats.cursor {
        Some(url) => {
            println!("Run in progress, next page:");
            println!("  {}", url);
        }
        None => println!("No run in progress"),
    }

    if let Some(updated) = &stats.cursor_updated_at {
        println!("Cursor last written: {}", updated);
    }
}
