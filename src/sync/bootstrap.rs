//! Setup and health check
//!
//! Before any sync runs, the store's credentials are probed with a single
//! one-record request. The same probe doubles as the periodic health check.

use crate::config::{validate_shopify_config, ShopifyConfig};
use crate::shopify::ShopEndpoint;
use crate::sync::fetcher::{fetch_with_retry, HttpTransport};
use crate::{ConfigError, SyncError};

/// Validates the store config and checks that the credentials work
///
/// # Returns
///
/// * `Ok(ShopEndpoint)` - The probe answered 2xx
/// * `Err(SyncError::Config)` - A setting is missing or the probe was refused
/// * `Err(SyncError::Fetch)` - The probe could not be sent, even after a retry
pub async fn bootstrap(
    config: &ShopifyConfig,
    transport: &dyn HttpTransport,
) -> Result<ShopEndpoint, SyncError> {
    validate_shopify_config(config)?;

    let endpoint = ShopEndpoint::from_config(config)?;
    probe(&endpoint, transport).await?;

    tracing::info!("Connected to Shopify store {}", config.store_name);
    Ok(endpoint)
}

/// Issues the one-record orders request and checks its status
pub async fn probe(endpoint: &ShopEndpoint, transport: &dyn HttpTransport) -> Result<(), SyncError> {
    let request = endpoint.get(&endpoint.probe_url());
    let response = fetch_with_retry(transport, &request).await?;

    if !response.is_success() {
        tracing::error!("Shopify probe answered HTTP {}", response.status);
        return Err(ConfigError::AuthProbe {
            status: response.status,
        }
        .into());
    }

    Ok(())
}
