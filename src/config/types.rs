use serde::Deserialize;
use std::time::Duration;

/// Default Shopify Admin API version
pub const DEFAULT_API_VERSION: &str = "2022-01";

/// Largest page size the orders endpoint accepts
pub const MAX_PAGE_SIZE: u32 = 250;

/// Main configuration structure for Shopify-Sync
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub shopify: ShopifyConfig,
    pub posthog: PosthogConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    pub storage: StorageConfig,
}

/// Shopify store connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct ShopifyConfig {
    /// Store subdomain, as in `{store-name}.myshopify.com`
    #[serde(rename = "store-name", default)]
    pub store_name: String,

    /// Admin API access token, sent as `X-Shopify-Access-Token`
    #[serde(rename = "access-token", default)]
    pub access_token: String,

    #[serde(rename = "api-version", default = "default_api_version")]
    pub api_version: String,

    /// Number of orders requested per page
    #[serde(rename = "page-size", default = "default_page_size")]
    pub page_size: u32,

    /// Overrides `https://{store-name}.myshopify.com`
    #[serde(rename = "base-url", default)]
    pub base_url: Option<String>,

    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

/// Event capture destination
#[derive(Debug, Clone, Deserialize)]
pub struct PosthogConfig {
    /// PostHog instance, e.g. `https://app.posthog.com`
    pub host: String,

    /// Project API key
    #[serde(rename = "api-key")]
    pub api_key: String,
}

/// Pagination loop and scheduling settings
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Seconds between periodic invocations
    #[serde(rename = "interval-secs", default = "default_interval")]
    pub interval_secs: u64,

    /// Maximum pages fetched by a single invocation
    #[serde(rename = "max-pages-per-run", default = "default_max_pages")]
    pub max_pages_per_run: u32,

    /// Wall-clock budget of a single invocation
    #[serde(rename = "run-budget-secs", default = "default_run_budget")]
    pub run_budget_secs: u64,

    /// Lifetime of the snooze flag after a 429
    #[serde(rename = "snooze-ttl-secs", default = "default_snooze_ttl")]
    pub snooze_ttl_secs: u64,

    /// Delay between snooze flag checks (milliseconds)
    #[serde(rename = "snooze-poll-ms", default = "default_snooze_poll")]
    pub snooze_poll_ms: u64,
}

/// Durable storage settings
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

impl ShopifyConfig {
    /// Builds a config for `store_name` with every optional field defaulted
    pub fn new(store_name: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            store_name: store_name.into(),
            access_token: access_token.into(),
            api_version: default_api_version(),
            page_size: default_page_size(),
            base_url: None,
            request_timeout_secs: default_request_timeout(),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl SyncConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn run_budget(&self) -> Duration {
        Duration::from_secs(self.run_budget_secs)
    }

    pub fn snooze_ttl(&self) -> Duration {
        Duration::from_secs(self.snooze_ttl_secs)
    }

    pub fn snooze_poll(&self) -> Duration {
        Duration::from_millis(self.snooze_poll_ms)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
            max_pages_per_run: default_max_pages(),
            run_budget_secs: default_run_budget(),
            snooze_ttl_secs: default_snooze_ttl(),
            snooze_poll_ms: default_snooze_poll(),
        }
    }
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_page_size() -> u32 {
    MAX_PAGE_SIZE
}

fn default_request_timeout() -> u64 {
    30
}

fn default_interval() -> u64 {
    60
}

fn default_max_pages() -> u32 {
    100
}

fn default_run_budget() -> u64 {
    50
}

fn default_snooze_ttl() -> u64 {
    2
}

fn default_snooze_poll() -> u64 {
    250
}
