//! Shopify-Sync: incremental Shopify order and customer sync
//!
//! This crate pages through a Shopify store's orders and reports each order and
//! customer to an analytics event stream, deduplicating records across runs and
//! resuming interrupted runs from the last persisted page.

pub mod config;
pub mod output;
pub mod shopify;
pub mod state;
pub mod storage;
pub mod sync;

use thiserror::Error;

/// Main error type for Shopify-Sync operations
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{method} request to {url} failed")]
    Fetch {
        method: String,
        url: String,
        #[source]
        source: sync::TransportError,
    },

    #[error("Unexpected HTTP {status} from {url}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("Capture error: {0}")]
    Capture(#[from] output::OutputError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Unable to connect to Shopify (HTTP {status}). Please make sure your Access Token is correct.")]
    AuthProbe { status: u16 },
}

/// Result type alias for Shopify-Sync operations
pub type Result<T> = std::result::Result<T, SyncError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use shopify::{next_page_url, Customer, Order};
pub use state::SyncPhase;
pub use sync::{Collaborators, RunOutcome, RunReport, ShopifySync};
