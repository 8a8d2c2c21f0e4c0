//! Rate-limit gate
//!
//! When Shopify answers 429 the gate sets a short-lived "snoozing" flag in the
//! ephemeral cache. The driver checks the flag before every request and
//! sleeps in small steps until the flag has expired. Because the flag lives in
//! the shared cache, every invocation using that cache backs off together.

use crate::storage::{EphemeralCache, StorageResult};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Cache key of the snooze flag
pub const SNOOZE_KEY: &str = "snoozing";

/// HTTP status signalling throttling
const TOO_MANY_REQUESTS: u16 = 429;

/// Result of waiting on the gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// The flag is clear; requests may proceed
    Clear,

    /// The deadline passed while still snoozing
    DeadlineReached,
}

/// Gate that pauses requests while upstream is throttling
pub struct RateLimitGate {
    cache: Arc<dyn EphemeralCache>,
    snooze_ttl: Duration,
    poll_interval: Duration,
}

impl RateLimitGate {
    /// Creates a gate over `cache`
    ///
    /// # Arguments
    ///
    /// * `cache` - Shared short-lived cache holding the flag
    /// * `snooze_ttl` - How long the flag lives after a 429
    /// * `poll_interval` - Delay between flag checks while snoozing
    pub fn new(cache: Arc<dyn EphemeralCache>, snooze_ttl: Duration, poll_interval: Duration) -> Self {
        Self {
            cache,
            snooze_ttl,
            poll_interval,
        }
    }

    /// Returns true while the snooze flag is live
    pub async fn is_snoozing(&self) -> StorageResult<bool> {
        Ok(self.cache.get(SNOOZE_KEY).await?.is_some())
    }

    /// Waits until the flag clears or `deadline` passes
    pub async fn wait_until_clear(&self, deadline: Instant) -> StorageResult<GateOutcome> {
        while self.is_snoozing().await? {
            let now = Instant::now();
            if now >= deadline {
                return Ok(GateOutcome::DeadlineReached);
            }

            let step = self.poll_interval.min(deadline - now);
            tracing::debug!("Snoozing, next check in {:?}", step);
            tokio::time::sleep(step).await;
        }

        Ok(GateOutcome::Clear)
    }

    /// Feeds a response status to the gate
    ///
    /// Returns true if the status armed the snooze flag.
    pub async fn observe(&self, status: u16) -> StorageResult<bool> {
        if status != TOO_MANY_REQUESTS {
            return Ok(false);
        }

        tracing::warn!("Rate limited by upstream, snoozing for {:?}", self.snooze_ttl);
        self.cache.set(SNOOZE_KEY, "true", self.snooze_ttl).await?;
        Ok(true)
    }
}
