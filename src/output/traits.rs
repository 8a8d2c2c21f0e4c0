//! Event sink trait and types
//!
//! This module defines the interface through which the sync reports orders and
//! customers, and the event structure it reports.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors that can occur while capturing events
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Capture request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Capture endpoint returned HTTP {status}")]
    Rejected { status: u16 },

    #[error("Recorder lock poisoned")]
    Poisoned,
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// One analytics event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaptureEvent {
    /// Event name, e.g. "Created Shopify Order"
    pub event: String,

    /// Identity the event is attributed to
    pub distinct_id: String,

    /// Event properties, not including `distinct_id`
    pub properties: Map<String, Value>,
}

impl CaptureEvent {
    pub fn new(
        event: impl Into<String>,
        distinct_id: impl Into<String>,
        properties: Map<String, Value>,
    ) -> Self {
        Self {
            event: event.into(),
            distinct_id: distinct_id.into(),
            properties,
        }
    }

    /// Properties with `distinct_id` merged in, as the capture API expects them
    pub fn properties_with_distinct_id(&self) -> Map<String, Value> {
        let mut props = self.properties.clone();
        props.insert(
            "distinct_id".to_string(),
            Value::String(self.distinct_id.clone()),
        );
        props
    }
}

/// Trait for event sinks
///
/// Capture is fire-and-forget from the sync's point of view: a successful
/// return means the event was handed off, not that it was ingested.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Reports a single event
    async fn capture(&self, event: CaptureEvent) -> OutputResult<()>;
}
