use crate::config::types::{
    Config, PosthogConfig, ShopifyConfig, StorageConfig, SyncConfig, MAX_PAGE_SIZE,
};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_shopify_config(&config.shopify)?;
    validate_posthog_config(&config.posthog)?;
    validate_sync_config(&config.sync)?;
    validate_storage_config(&config.storage)?;
    Ok(())
}

/// Validates the Shopify connection settings
///
/// This is also run by the bootstrap, since a `ShopifyConfig` can be built in
/// code without going through [`load_config`](crate::config::load_config).
pub fn validate_shopify_config(config: &ShopifyConfig) -> Result<(), ConfigError> {
    if config.store_name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "Please set the 'store-name' config value".to_string(),
        ));
    }

    if config.access_token.trim().is_empty() {
        return Err(ConfigError::Validation(
            "Please set the 'access-token' config value".to_string(),
        ));
    }

    validate_store_name(&config.store_name)?;

    if config.api_version.is_empty() {
        return Err(ConfigError::Validation(
            "api-version cannot be empty".to_string(),
        ));
    }

    if config.page_size < 1 || config.page_size > MAX_PAGE_SIZE {
        return Err(ConfigError::Validation(format!(
            "page-size must be between 1 and {}, got {}",
            MAX_PAGE_SIZE, config.page_size
        )));
    }

    if let Some(base_url) = &config.base_url {
        validate_http_url("base-url", base_url)?;
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "request-timeout-secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates the event capture destination
fn validate_posthog_config(config: &PosthogConfig) -> Result<(), ConfigError> {
    validate_http_url("posthog host", &config.host)?;

    if config.api_key.trim().is_empty() {
        return Err(ConfigError::Validation(
            "Please set the 'api-key' config value".to_string(),
        ));
    }

    Ok(())
}

/// Validates loop limits and timings
///
/// Run by the setup as well, for a `SyncConfig` built in code.
pub fn validate_sync_config(config: &SyncConfig) -> Result<(), ConfigError> {
    if config.interval_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "interval-secs must be >= 1, got {}",
            config.interval_secs
        )));
    }

    if config.max_pages_per_run < 1 {
        return Err(ConfigError::Validation(format!(
            "max-pages-per-run must be >= 1, got {}",
            config.max_pages_per_run
        )));
    }

    if config.run_budget_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "run-budget-secs must be >= 1, got {}",
            config.run_budget_secs
        )));
    }

    if config.snooze_ttl_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "snooze-ttl-secs must be >= 1, got {}",
            config.snooze_ttl_secs
        )));
    }

    if config.snooze_poll_ms < 10 {
        return Err(ConfigError::Validation(format!(
            "snooze-poll-ms must be >= 10ms, got {}ms",
            config.snooze_poll_ms
        )));
    }

    Ok(())
}

fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates a store subdomain: alphanumerics and hyphens, no leading/trailing hyphen
fn validate_store_name(name: &str) -> Result<(), ConfigError> {
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(ConfigError::Validation(format!(
            "store-name must contain only alphanumeric characters and hyphens, got '{}'",
            name
        )));
    }

    if name.starts_with('-') || name.ends_with('-') {
        return Err(ConfigError::Validation(format!(
            "store-name cannot start or end with '-', got '{}'",
            name
        )));
    }

    Ok(())
}

fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            field, value
        )));
    }

    Ok(())
}
