//! Order ledger models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Order lifecycle status
///
/// Created as Pending after a successful wallet debit; only an
/// explicit fulfillment or cancellation action moves it on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Served,
    Cancelled,
}

impl OrderStatus {
    /// Served and Cancelled admit no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Served | Self::Cancelled)
    }

    /// Wire representation, as used in URL paths
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Served => "SERVED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

/// One line of an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub master_item_id: String,
    pub qty: i32,
    /// Unit price in cents at order time
    pub unit_price: i64,
}

impl OrderLine {
    /// Line total in cents
    pub fn line_total(&self) -> i64 {
        self.unit_price * i64::from(self.qty)
    }
}

/// Persisted order record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: String,
    pub student_id: String,
    pub time: DateTime<Utc>,
    pub status: OrderStatus,
    /// Order total in cents
    pub amount: i64,
    pub items: Vec<OrderLine>,
}

/// Order creation payload
///
/// The idempotency key is bound to the wallet debit reference; the
/// ledger must treat a repeated key as the same creation attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub student_id: String,
    pub items: Vec<OrderLine>,
    /// Total in cents, must equal the sum of line totals
    pub total: i64,
    pub idempotency_key: Uuid,
}

impl PlaceOrderRequest {
    /// Sum of line totals in cents
    pub fn computed_total(&self) -> i64 {
        self.items.iter().map(OrderLine::line_total).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Pending).unwrap(),
            "\"PENDING\""
        );
        assert_eq!(
            serde_json::from_str::<OrderStatus>("\"CANCELLED\"").unwrap(),
            OrderStatus::Cancelled
        );
    }

    #[test]
    fn test_terminal_states() {
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(OrderStatus::Served.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_line_and_request_totals() {
        let request = PlaceOrderRequest {
            student_id: "stu-1".into(),
            items: vec![
                OrderLine {
                    master_item_id: "m-1".into(),
                    qty: 2,
                    unit_price: 5000,
                },
                OrderLine {
                    master_item_id: "m-2".into(),
                    qty: 1,
                    unit_price: 20000,
                },
            ],
            total: 30000,
            idempotency_key: Uuid::new_v4(),
        };
        assert_eq!(request.computed_total(), 30000);
        assert_eq!(request.items[0].line_total(), 10000);
    }
}
