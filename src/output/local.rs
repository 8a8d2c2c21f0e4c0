//! In-process event sinks
//!
//! `TracingSink` logs events instead of sending them (used by `--dry-run`).
//! `RecordingSink` keeps every event in memory for inspection.

use crate::output::traits::{CaptureEvent, EventSink, OutputError, OutputResult};
use async_trait::async_trait;
use std::sync::Mutex;

/// Sink that writes each event to the log
#[derive(Debug, Default)]
pub struct TracingSink;

#[async_trait]
impl EventSink for TracingSink {
    async fn capture(&self, event: CaptureEvent) -> OutputResult<()> {
        tracing::info!(
            event = %event.event,
            distinct_id = %event.distinct_id,
            properties = %serde_json::Value::Object(event.properties),
            "capture (dry run)"
        );
        Ok(())
    }
}

/// Sink that records events in order
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<CaptureEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every event captured so far
    pub fn events(&self) -> Vec<CaptureEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Names of every event captured so far
    pub fn event_names(&self) -> Vec<String> {
        self.events().into_iter().map(|e| e.event).collect()
    }
}

#[async_trait]
impl EventSink for RecordingSink {
    async fn capture(&self, event: CaptureEvent) -> OutputResult<()> {
        self.events
            .lock()
            .map_err(|_| OutputError::Poisoned)?
            .push(event);
        Ok(())
    }
}
