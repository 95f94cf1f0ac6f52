//! Inventory adjustment, shared by every order mutation.
//!
//! Decrements saturate at zero; increments are unclamped, so returning
//! stock can land above the level a clamped decrement left behind.

use crate::domain::{LineItem, Product};
use crate::error::ApiError;
use crate::store::{Collection, RecordStore};
use chrono::Utc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustDirection {
    Increase,
    Decrease,
}

impl AdjustDirection {
    fn apply(self, stock: u32, quantity: u32) -> u32 {
        match self {
            AdjustDirection::Increase => stock.saturating_add(quantity),
            AdjustDirection::Decrease => stock.saturating_sub(quantity),
        }
    }
}

/// Apply a signed delta to every line item's product and matching
/// variant. Products that no longer exist are skipped. The product file
/// is rewritten when any counter changed, top-level or variant.
///
/// Returns whether anything changed.
pub async fn adjust(
    store: &RecordStore,
    items: &[LineItem],
    direction: AdjustDirection,
) -> Result<bool, ApiError> {
    let _guard = store.guard(Collection::Products).await;
    let mut products: Vec<Product> = store.read(Collection::Products).await;
    let mut changed = false;

    for item in items {
        let Some(product) = products.iter_mut().find(|p| p.id == item.id) else {
            tracing::debug!(product = %item.id, "line item references unknown product, skipping");
            continue;
        };
        let mut touched = false;

        if let Some(stock) = product.stock {
            let next = direction.apply(stock, item.quantity);
            if next != stock {
                product.stock = Some(next);
                touched = true;
            }
        }
        if let Some(want) = &item.variant {
            if let Some(variant) = product
                .variants
                .iter_mut()
                .find(|v| v.size == want.size && v.color == want.color)
            {
                let next = direction.apply(variant.stock, item.quantity);
                if next != variant.stock {
                    variant.stock = next;
                    touched = true;
                }
            }
        }

        if touched {
            product.updated_at = Utc::now();
            changed = true;
        }
    }

    if changed {
        store.write(Collection::Products, &products).await?;
    }
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ItemVariant, Variant};
    use rust_decimal::Decimal;

    fn product(id: &str, stock: Option<u32>, variants: Vec<Variant>) -> Product {
        let now = Utc::now();
        Product {
            id: id.into(),
            name: id.into(),
            description: String::new(),
            price: Decimal::from(10),
            category: None,
            stock,
            variants,
            images: vec![],
            created_at: now,
            updated_at: now,
        }
    }

    fn item(id: &str, quantity: u32, variant: Option<ItemVariant>) -> LineItem {
        LineItem { id: id.into(), quantity, variant, price: Decimal::from(10) }
    }

    async fn seeded(products: Vec<Product>) -> (RecordStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path());
        store.write(Collection::Products, &products).await.unwrap();
        (store, dir)
    }

    #[tokio::test]
    async fn test_decrement_floors_at_zero() {
        let (store, _dir) = seeded(vec![product("P1", Some(2), vec![])]).await;
        assert!(adjust(&store, &[item("P1", 5, None)], AdjustDirection::Decrease).await.unwrap());
        let products: Vec<Product> = store.read(Collection::Products).await;
        assert_eq!(products[0].stock, Some(0));
    }

    #[tokio::test]
    async fn test_increment_is_unclamped() {
        let (store, _dir) = seeded(vec![product("P1", Some(0), vec![])]).await;
        adjust(&store, &[item("P1", 5, None)], AdjustDirection::Decrease).await.unwrap();
        adjust(&store, &[item("P1", 5, None)], AdjustDirection::Increase).await.unwrap();
        let products: Vec<Product> = store.read(Collection::Products).await;
        // the decrement was clamped, the return was not
        assert_eq!(products[0].stock, Some(5));
    }

    #[tokio::test]
    async fn test_variant_and_top_level_both_adjusted() {
        let variants = vec![
            Variant { size: "M".into(), color: "red".into(), stock: 4 },
            Variant { size: "L".into(), color: "red".into(), stock: 4 },
        ];
        let (store, _dir) = seeded(vec![product("P1", Some(10), variants)]).await;
        let want = ItemVariant { size: "M".into(), color: "red".into() };
        adjust(&store, &[item("P1", 3, Some(want))], AdjustDirection::Decrease).await.unwrap();
        let products: Vec<Product> = store.read(Collection::Products).await;
        assert_eq!(products[0].stock, Some(7));
        assert_eq!(products[0].variants[0].stock, 1);
        assert_eq!(products[0].variants[1].stock, 4);
    }

    // Regression: a top-level-only change persists even when no variant
    // matched (historically the save was gated on a variant match).
    #[tokio::test]
    async fn test_top_level_only_change_is_persisted() {
        let (store, _dir) = seeded(vec![product("P1", Some(10), vec![])]).await;
        let want = ItemVariant { size: "XXL".into(), color: "plaid".into() };
        let changed =
            adjust(&store, &[item("P1", 3, Some(want))], AdjustDirection::Decrease).await.unwrap();
        assert!(changed);
        let products: Vec<Product> = store.read(Collection::Products).await;
        assert_eq!(products[0].stock, Some(7));
    }

    #[tokio::test]
    async fn test_unknown_product_skipped() {
        let (store, _dir) = seeded(vec![product("P1", Some(10), vec![])]).await;
        let changed =
            adjust(&store, &[item("NOPE", 3, None)], AdjustDirection::Decrease).await.unwrap();
        assert!(!changed);
        let products: Vec<Product> = store.read(Collection::Products).await;
        assert_eq!(products[0].stock, Some(10));
    }
}
