//! Sync module for paging Shopify orders into the event stream
//!
//! This module contains the core sync logic, including:
//! - HTTP fetching with a single retry
//! - The rate-limit gate shared through the ephemeral cache
//! - Deduplication and event emission
//! - The pagination driver and the periodic runner

mod bootstrap;
mod coordinator;
mod emitter;
mod fetcher;
mod gate;
mod runner;

pub use bootstrap::{bootstrap, probe};
pub use coordinator::{Collaborators, Coordinator, RunLimits, RunOutcome, RunReport};
pub use emitter::{
    EmitSummary, Emitter, CUSTOMER_CREATED, CUSTOMER_UPDATED, ORDER_CREATED, ORDER_UPDATED,
};
pub use fetcher::{
    build_http_client, fetch_with_retry, HttpRequest, HttpResponse, HttpTransport,
    ReqwestTransport, TransportError, USER_AGENT,
};
pub use gate::{GateOutcome, RateLimitGate, SNOOZE_KEY};
pub use runner::{run_every, RunnerSummary};

use crate::config::{validate_sync_config, ShopifyConfig, SyncConfig};
use crate::shopify::ShopEndpoint;
use crate::state::ResumeCursor;
use crate::storage::KeyValueStore;
use crate::SyncError;
use std::future::Future;
use std::sync::Arc;

/// A connected sync for one store
///
/// Built by [`ShopifySync::setup`], which only succeeds once the store's
/// credentials have been probed.
pub struct ShopifySync {
    endpoint: ShopEndpoint,
    storage: Arc<dyn KeyValueStore>,
    transport: Arc<dyn HttpTransport>,
    coordinator: Coordinator,
    interval: std::time::Duration,
}

impl ShopifySync {
    /// Validates the config, probes the store, and wires the driver
    ///
    /// # Returns
    ///
    /// * `Ok(ShopifySync)` - Ready to run
    /// * `Err(SyncError::Config)` - Missing settings or refused credentials
    pub async fn setup(
        shopify: &ShopifyConfig,
        sync: &SyncConfig,
        collaborators: Collaborators,
    ) -> Result<Self, SyncError> {
        validate_sync_config(sync)?;
        let endpoint = bootstrap(shopify, collaborators.transport.as_ref()).await?;

        Ok(Self {
            storage: collaborators.storage.clone(),
            transport: collaborators.transport.clone(),
            coordinator: Coordinator::new(endpoint.clone(), collaborators, sync),
            endpoint,
            interval: sync.interval(),
        })
    }

    /// One invocation: resumes from the cursor, or starts fresh
    pub async fn run_periodic(&self) -> Result<RunReport, SyncError> {
        self.coordinator.run().await
    }

    /// Runs an invocation every configured interval until `shutdown` resolves
    pub async fn run_until<F>(&self, shutdown: F) -> RunnerSummary
    where
        F: Future<Output = ()>,
    {
        run_every(self, self.interval, shutdown).await
    }

    /// Re-runs the credentials probe
    pub async fn health_check(&self) -> Result<(), SyncError> {
        probe(&self.endpoint, self.transport.as_ref()).await
    }

    /// Forgets any in-progress run so the next invocation starts fresh
    ///
    /// Seen markers are kept.
    pub async fn reset_cursor(&self) -> Result<(), SyncError> {
        ResumeCursor::clear(self.storage.as_ref()).await?;
        tracing::info!("Cleared resume cursor");
        Ok(())
    }

    pub fn endpoint(&self) -> &ShopEndpoint {
        &self.endpoint
    }
}
