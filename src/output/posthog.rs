//! PostHog capture sink
//!
//! Sends each event to the `/capture/` endpoint of a PostHog instance.

use crate::config::PosthogConfig;
use crate::output::traits::{CaptureEvent, EventSink, OutputError, OutputResult};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde_json::json;

/// Event sink posting to a PostHog instance
pub struct PosthogSink {
    client: Client,
    capture_url: String,
    api_key: String,
}

impl PosthogSink {
    /// Creates a sink for the configured instance, sharing `client`
    pub fn new(client: Client, config: &PosthogConfig) -> Self {
        Self {
            client,
            capture_url: format!("{}/capture/", config.host.trim_end_matches('/')),
            api_key: config.api_key.clone(),
        }
    }
}

#[async_trait]
impl EventSink for PosthogSink {
    async fn capture(&self, event: CaptureEvent) -> OutputResult<()> {
        let body = json!({
            "api_key": self.api_key,
            "event": event.event,
            "distinct_id": event.distinct_id,
            "properties": event.properties_with_distinct_id(),
            "timestamp": Utc::now().to_rfc3339(),
        });

        let response = self.client.post(&self.capture_url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(OutputError::Rejected {
                status: status.as_u16(),
            });
        }

        tracing::trace!("Captured '{}' for {}", event.event, event.distinct_id);
        Ok(())
    }
}
