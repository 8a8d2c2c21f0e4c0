//! Periodic runner
//!
//! Drives one invocation per tick until the shutdown future resolves. Ticks
//! that fire while an invocation is still running are skipped, so invocations
//! never overlap.

use crate::sync::{RunOutcome, ShopifySync};
use std::future::Future;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// Totals across all invocations of a runner
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunnerSummary {
    pub invocations: u64,
    pub completed: u64,
    pub paused: u64,
    pub failed: u64,
}

/// Runs `sync` every `interval` until `shutdown` resolves
///
/// Invocation errors are logged and the next tick retries.
pub async fn run_every<F>(sync: &ShopifySync, interval: Duration, shutdown: F) -> RunnerSummary
where
    F: Future<Output = ()>,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    let mut summary = RunnerSummary::default();
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("Shutdown requested, stopping periodic sync");
                return summary;
            }
            _ = ticker.tick() => {
                summary.invocations += 1;
                match sync.run_periodic().await {
                    Ok(report) => match report.outcome {
                        RunOutcome::Completed => summary.completed += 1,
                        RunOutcome::Paused => summary.paused += 1,
                    },
                    Err(e) => {
                        summary.failed += 1;
                        tracing::error!("Sync invocation failed: {}", e);
                    }
                }
            }
        }
    }
}
