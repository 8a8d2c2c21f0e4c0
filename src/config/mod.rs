//! Configuration module for Shopify-Sync
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use shopify_sync::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("shopify-sync.toml")).unwrap();
//! println!("Syncing store: {}", config.shopify.store_name);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, PosthogConfig, ShopifyConfig, StorageConfig, SyncConfig, DEFAULT_API_VERSION,
    MAX_PAGE_SIZE,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::{validate, validate_shopify_config, validate_sync_config};
