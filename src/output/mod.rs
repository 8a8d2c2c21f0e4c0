//! Output module for reporting sync results
//!
//! This module handles:
//! - Capturing order and customer events to PostHog
//! - Logging or recording events locally for dry runs and tests
//! - Reporting sync progress from the database

mod local;
mod posthog;
pub mod stats;
mod traits;

pub use local::{RecordingSink, TracingSink};
pub use posthog::PosthogSink;
pub use stats::{load_statistics, print_statistics, SyncStatistics};
pub use traits::{CaptureEvent, EventSink, OutputError, OutputResult};
