//! Product record with variant-level stock.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Top-level quantity, used when no variants apply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(default)]
    pub variants: Vec<Variant>,
    #[serde(default)]
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A size/color-keyed stock partition of a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Variant {
    pub size: String,
    pub color: String,
    pub stock: u32,
}

impl Product {
    /// Positive stock anywhere: top-level counter or any variant.
    pub fn has_stock(&self) -> bool {
        self.stock.map_or(false, |s| s > 0) || self.variants.iter().any(|v| v.stock > 0)
    }

    pub fn total_stock(&self) -> u32 {
        self.variants
            .iter()
            .fold(self.stock.unwrap_or(0), |acc, v| acc.saturating_add(v.stock))
    }

    pub fn in_category(&self, category: &str) -> bool {
        self.category
            .as_deref()
            .map_or(false, |c| c.eq_ignore_ascii_case(category))
    }
}
