//! Dedup & emit
//!
//! Classifies every fetched order and its customer as new or previously seen,
//! reports one event for each, and records the seen markers. A marker is
//! always written before the event that references it, so a crash between the
//! two can lose an event but never report "created" twice.

use crate::output::{CaptureEvent, EventSink};
use crate::shopify::Order;
use crate::state::SeenMarker;
use crate::storage::KeyValueStore;
use crate::SyncError;
use serde_json::Value;
use std::sync::Arc;

pub const ORDER_CREATED: &str = "Created Shopify Order";
pub const ORDER_UPDATED: &str = "Updated Shopify Order";
pub const CUSTOMER_CREATED: &str = "Created Shopify Customer";
pub const CUSTOMER_UPDATED: &str = "Updated Shopify Customer";

/// Counts of events emitted for a batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitSummary {
    pub orders_created: u64,
    pub orders_updated: u64,
    pub customers_created: u64,
    pub customers_updated: u64,
}

impl EmitSummary {
    pub fn events(&self) -> u64 {
        self.orders_created + self.orders_updated + self.customers_created + self.customers_updated
    }

    pub fn merge(&mut self, other: EmitSummary) {
        self.orders_created += other.orders_created;
        self.orders_updated += other.orders_updated;
        self.customers_created += other.customers_created;
        self.customers_updated += other.customers_updated;
    }
}

/// Reports orders and customers, once as created and afterwards as updated
pub struct Emitter {
    storage: Arc<dyn KeyValueStore>,
    sink: Arc<dyn EventSink>,
}

impl Emitter {
    pub fn new(storage: Arc<dyn KeyValueStore>, sink: Arc<dyn EventSink>) -> Self {
        Self { storage, sink }
    }

    /// Processes a batch in order
    pub async fn emit_batch(&self, orders: &[Order]) -> Result<EmitSummary, SyncError> {
        let mut summary = EmitSummary::default();
        for order in orders {
            self.emit_order(order, &mut summary).await?;
        }
        Ok(summary)
    }

    async fn emit_order(&self, order: &Order, summary: &mut EmitSummary) -> Result<(), SyncError> {
        let store = self.storage.as_ref();
        let email = order.customer_email();

        let order_marker = SeenMarker::Order(order.id);
        let order_seen = order_marker.is_set(store).await?;
        let customer_marker = email.map(|e| SeenMarker::Customer(e.to_string()));
        let customer_seen = match &customer_marker {
            Some(marker) => marker.is_set(store).await?,
            None => false,
        };

        if !order_seen {
            order_marker.set(store).await?;
        }

        let distinct_id = match email {
            Some(email) => email.to_string(),
            None => order.id.to_string(),
        };
        let (name, counter) = if order_seen {
            (ORDER_UPDATED, &mut summary.orders_updated)
        } else {
            (ORDER_CREATED, &mut summary.orders_created)
        };
        tracing::trace!("{} {} ({})", name, order.id, distinct_id);
        self.sink
            .capture(CaptureEvent::new(name, distinct_id, order.projection()))
            .await?;
        *counter += 1;

        let (Some(marker), Some(customer)) = (customer_marker, order.customer.as_ref()) else {
            return Ok(());
        };

        if !customer_seen {
            marker.set(store).await?;
        }

        let record = customer.to_record();
        let mut properties = record.clone();
        properties.insert("$set".to_string(), Value::Object(record));

        let (name, counter) = if customer_seen {
            (CUSTOMER_UPDATED, &mut summary.customers_updated)
        } else {
            (CUSTOMER_CREATED, &mut summary.customers_created)
        };
        let email = email.unwrap_or_default();
        tracing::trace!("{} {}", name, email);
        self.sink
            .capture(CaptureEvent::new(name, email, properties))
            .await?;
        *counter += 1;

        Ok(())
    }
}
