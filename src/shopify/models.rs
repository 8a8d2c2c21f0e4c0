//! Order and customer records as returned by the orders endpoint
//!
//! Records are read leniently: only the order `id` is required. Projected
//! fields are forwarded as whatever JSON the API sent, and everything else on
//! a customer is kept verbatim so the full record can be forwarded with its
//! event.

use serde_json::{Map, Value};

/// Order fields reported with order events, keyed by the API field name
const PROJECTED_FIELDS: [(&str, &str); 6] = [
    ("order_number", "order_number"),
    ("currency", "currency"),
    ("transaction_amount", "current_total_price"),
    ("order_status_url", "order_status_url"),
    ("financial_status", "financial_status"),
    ("created_at", "created_at"),
];

/// A Shopify order
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: u64,

    /// The raw order record
    pub fields: Map<String, Value>,

    pub customer: Option<Customer>,
}

/// A Shopify customer embedded in an order
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    /// Present only when the API sent a string
    pub email: Option<String>,

    /// Every field of the record, untouched
    pub attributes: Map<String, Value>,
}

impl Order {
    /// Reads an order out of one entry of the `orders` array
    ///
    /// Returns `None` when the entry is not an object or has no usable `id`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let fields = value.as_object()?;
        let id = match fields.get("id")? {
            Value::Number(n) => n.as_u64()?,
            Value::String(s) => s.parse().ok()?,
            _ => return None,
        };
        let customer = fields.get("customer").and_then(Customer::from_value);

        Some(Self {
            id,
            fields: fields.clone(),
            customer,
        })
    }

    /// Email of the embedded customer, if there is one with a non-empty email
    pub fn customer_email(&self) -> Option<&str> {
        self.customer
            .as_ref()
            .and_then(|c| c.email.as_deref())
            .filter(|email| !email.is_empty())
    }

    /// The flattened projection reported with order events
    pub fn projection(&self) -> Map<String, Value> {
        PROJECTED_FIELDS
            .iter()
            .map(|(name, source)| {
                let value = self.fields.get(*source).cloned().unwrap_or(Value::Null);
                (name.to_string(), value)
            })
            .collect()
    }
}

impl Customer {
    fn from_value(value: &Value) -> Option<Self> {
        let attributes = value.as_object()?.clone();
        let email = match attributes.get("email") {
            Some(Value::String(email)) => Some(email.clone()),
            Some(Value::Null) | None => None,
            Some(other) => {
                tracing::warn!("Ignoring non-string customer email: {}", other);
                None
            }
        };

        Some(Self { email, attributes })
    }

    /// The full customer record, email included
    pub fn to_record(&self) -> Map<String, Value> {
        self.attributes.clone()
    }
}

/// Reads the order batch out of a page body
///
/// A body that is not JSON, or has no `orders` array, is an empty batch.
/// Entries without a usable `id` are skipped.
pub fn parse_orders_page(body: &str) -> Vec<Order> {
    let page: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Orders page is not valid JSON, treating as empty: {}", e);
            return Vec::new();
        }
    };

    let Some(entries) = page.get("orders").and_then(Value::as_array) else {
        tracing::debug!("Orders page has no 'orders' array");
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            let order = Order::from_value(entry);
            if order.is_none() {
                tracing::warn!("Skipping order record without a usable id: {}", entry);
            }
            order
        })
        .collect()
}
