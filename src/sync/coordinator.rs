//! Sync coordinator - the pagination driver
//!
//! This module contains the main sync loop that walks the orders listing one
//! page at a time:
//! - Deciding between a fresh start and resuming a persisted cursor
//! - Waiting on the rate-limit gate before every request
//! - Fetching, parsing, and emitting each page
//! - Persisting the cursor after every step so an interrupted run resumes
//!   from the last page it had not finished

use crate::config::SyncConfig;
use crate::output::EventSink;
use crate::shopify::{next_page_url, parse_orders_page, ShopEndpoint};
use crate::state::{ResumeCursor, SyncPhase};
use crate::storage::{EphemeralCache, KeyValueStore};
use crate::sync::emitter::{EmitSummary, Emitter};
use crate::sync::fetcher::{fetch_with_retry, HttpTransport};
use crate::sync::gate::{GateOutcome, RateLimitGate};
use crate::SyncError;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Stand-in deadline for budgets too large to add to the clock
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Collaborators injected into the sync
///
/// These are the only handles shared across invocations.
#[derive(Clone)]
pub struct Collaborators {
    pub storage: Arc<dyn KeyValueStore>,
    pub cache: Arc<dyn EphemeralCache>,
    pub sink: Arc<dyn EventSink>,
    pub transport: Arc<dyn HttpTransport>,
}

/// Limits of a single invocation
#[derive(Debug, Clone, Copy)]
pub struct RunLimits {
    /// Maximum pages fetched before pausing
    pub max_pages: u32,

    /// Wall-clock budget before pausing
    pub budget: Duration,
}

impl From<&SyncConfig> for RunLimits {
    fn from(config: &SyncConfig) -> Self {
        Self {
            max_pages: config.max_pages_per_run,
            budget: config.run_budget(),
        }
    }
}

/// Why an invocation stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The last page was processed and the cursor cleared
    Completed,

    /// The page cap or time budget ran out; the cursor points at the next page
    Paused,
}

/// Result of one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub outcome: RunOutcome,

    /// Whether the invocation started from a persisted cursor
    pub resumed: bool,

    /// Pages successfully processed (429 responses not counted)
    pub pages_fetched: u32,

    pub orders_seen: u64,
    pub emitted: EmitSummary,
}

/// Main pagination driver
pub struct Coordinator {
    endpoint: ShopEndpoint,
    storage: Arc<dyn KeyValueStore>,
    transport: Arc<dyn HttpTransport>,
    gate: RateLimitGate,
    emitter: Emitter,
    limits: RunLimits,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `endpoint` - The store being synced
    /// * `collaborators` - Storage, cache, sink, and transport handles
    /// * `config` - Loop limits and snooze timings
    pub fn new(endpoint: ShopEndpoint, collaborators: Collaborators, config: &SyncConfig) -> Self {
        let gate = RateLimitGate::new(
            collaborators.cache.clone(),
            config.snooze_ttl(),
            config.snooze_poll(),
        );
        let emitter = Emitter::new(collaborators.storage.clone(), collaborators.sink.clone());

        Self {
            endpoint,
            storage: collaborators.storage,
            transport: collaborators.transport,
            gate,
            emitter,
            limits: RunLimits::from(config),
        }
    }

    /// Runs one invocation of the pagination loop
    ///
    /// A fatal fetch error propagates without touching the cursor, so the next
    /// invocation retries the page that failed.
    pub async fn run(&self) -> Result<RunReport, SyncError> {
        let store = self.storage.as_ref();
        let started = Instant::now();
        let deadline = started
            .checked_add(self.limits.budget)
            .unwrap_or(started + FAR_FUTURE);

        let (mut phase, mut url) = match ResumeCursor::load(store).await? {
            Some(url) => {
                tracing::info!("Resuming sync at {}", url);
                (SyncPhase::Resuming, url)
            }
            None => {
                let url = self.endpoint.first_page_url();
                tracing::info!("Starting fresh sync at {}", url);
                (SyncPhase::FreshStart, url)
            }
        };

        let mut report = RunReport {
            outcome: RunOutcome::Paused,
            resumed: phase == SyncPhase::Resuming,
            pages_fetched: 0,
            orders_seen: 0,
            emitted: EmitSummary::default(),
        };

        loop {
            if report.pages_fetched >= self.limits.max_pages || Instant::now() >= deadline {
                tracing::info!(
                    "Run budget exhausted after {} pages, next run resumes at {}",
                    report.pages_fetched,
                    url
                );
                return Ok(report);
            }

            if self.gate.is_snoozing().await? {
                phase = transition(phase, SyncPhase::Snoozed);
                if self.gate.wait_until_clear(deadline).await? == GateOutcome::DeadlineReached {
                    tracing::info!("Run budget exhausted while snoozing at {}", url);
                    return Ok(report);
                }
            }

            phase = transition(phase, SyncPhase::FetchingPage);
            ResumeCursor::save(store, &url).await?;

            let response = fetch_with_retry(self.transport.as_ref(), &self.endpoint.get(&url)).await?;

            if self.gate.observe(response.status).await? {
                // Same page again once the snooze clears
                continue;
            }

            if !response.is_success() {
                return Err(SyncError::UnexpectedStatus {
                    url,
                    status: response.status,
                });
            }

            let orders = parse_orders_page(&response.body);
            let emitted = self.emitter.emit_batch(&orders).await?;

            report.pages_fetched += 1;
            report.orders_seen += orders.len() as u64;
            report.emitted.merge(emitted);
            tracing::debug!(
                "Page {} done: {} orders, {} events",
                report.pages_fetched,
                orders.len(),
                emitted.events()
            );

            match next_page_url(Some(&response.headers)) {
                Some(next) => {
                    ResumeCursor::save(store, &next).await?;
                    url = next;
                }
                None => {
                    ResumeCursor::clear(store).await?;
                    transition(phase, SyncPhase::Done);
                    report.outcome = RunOutcome::Completed;
                    tracing::info!(
                        "Sync complete: {} pages, {} orders, {} events",
                        report.pages_fetched,
                        report.orders_seen,
                        report.emitted.events()
                    );
                    return Ok(report);
                }
            }
        }
    }
}

fn transition(from: SyncPhase, to: SyncPhase) -> SyncPhase {
    debug_assert!(from.can_transition_to(to), "{} -> {}", from, to);
    if from != to {
        tracing::debug!("Sync phase {} -> {}", from, to);
    }
    to
}
