//! Store settings and the persisted dashboard snapshot.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One whole-object settings record: read, or replaced wholesale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub store_name: String,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub support_email: Option<String>,
    pub courier_enabled: bool,
    pub notify_on_order: bool,
    pub low_stock_threshold: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_name: "My Store".to_string(),
            currency: "USD".to_string(),
            support_email: None,
            courier_enabled: false,
            notify_on_order: true,
            low_stock_threshold: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_orders: usize,
    pub processing_orders: usize,
    pub completed_orders: usize,
    pub cancelled_orders: usize,
    /// Sum of non-cancelled order totals.
    pub total_revenue: Decimal,
    pub low_stock_products: usize,
    pub generated_at: DateTime<Utc>,
}
