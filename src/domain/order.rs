//! Order record and its status lifecycle.

use crate::domain::customer::Customer;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Closed status set; unknown labels are rejected at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Processing,
    Confirmed,
    Shipped,
    Delivered,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Human-readable sequential id (`AN<n>`).
    pub id: String,
    /// Set at creation, immutable thereafter.
    pub date: DateTime<Utc>,
    pub customer: Customer,
    pub items: Vec<LineItem>,
    pub status: OrderStatus,
    /// Stamped once when the order first reaches `completed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub total_amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_id: Option<String>,
}

/// A product/variant/quantity tuple within an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Product id.
    pub id: String,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<ItemVariant>,
    pub price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemVariant {
    pub size: String,
    pub color: String,
}

impl Order {
    /// Apply a status transition, stamping `completed_at` exactly once.
    pub fn apply_status(&mut self, status: OrderStatus) {
        if status == OrderStatus::Completed && self.completed_at.is_none() {
            self.completed_at = Some(Utc::now());
        }
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> Order {
        Order {
            id: "AN1".into(),
            date: Utc::now(),
            customer: Customer::named("Jane"),
            items: vec![],
            status: OrderStatus::Processing,
            completed_at: None,
            total_amount: Decimal::from(100),
            shipping_address: None,
            payment_method: None,
            tracking_id: None,
        }
    }

    #[test]
    fn test_unknown_status_label_rejected() {
        assert!(serde_json::from_str::<OrderStatus>("\"teleported\"").is_err());
        assert_eq!(
            serde_json::from_str::<OrderStatus>("\"cancelled\"").unwrap(),
            OrderStatus::Cancelled
        );
    }

    #[test]
    fn test_completed_at_stamped_once() {
        let mut o = order();
        o.apply_status(OrderStatus::Completed);
        let first = o.completed_at.unwrap();
        o.apply_status(OrderStatus::Processing);
        o.apply_status(OrderStatus::Completed);
        assert_eq!(o.completed_at.unwrap(), first);
    }

    #[test]
    fn test_order_round_trips() {
        let o = order();
        let json = serde_json::to_string(&o).unwrap();
        let back: Order = serde_json::from_str(&json).unwrap();
        assert_eq!(back, o);
    }
}
