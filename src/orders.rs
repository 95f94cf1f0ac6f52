//! Order lifecycle: creation, status transitions, deletion, bulk updates.
//!
//! Stock side effects all route through [`crate::inventory`]: creation
//! decrements, the first transition into `cancelled` (or deletion of a
//! not-yet-cancelled order) returns stock. A failed stock write never
//! rolls back the order mutation that preceded it; it is logged and the
//! request continues.

use crate::domain::{Customer, LineItem, Order, OrderStatus};
use crate::error::ApiError;
use crate::inventory::{self, AdjustDirection};
use crate::store::{Collection, RecordStore};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub customer: Customer,
    #[validate(length(min = 1, message = "order requires at least one item"))]
    pub items: Vec<LineItem>,
    pub total_amount: Decimal,
    pub shipping_address: Option<String>,
    pub payment_method: Option<String>,
}

/// Partial update; provided fields win over the stored record.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    pub status: Option<OrderStatus>,
    pub customer: Option<Customer>,
    pub items: Option<Vec<LineItem>>,
    pub total_amount: Option<Decimal>,
    pub shipping_address: Option<String>,
    pub payment_method: Option<String>,
}

/// Monotonic id counter persisted next to the order collection. A zero
/// (unseeded) counter is initialized from the highest existing suffix,
/// so ids keep increasing across deletions.
#[derive(Debug, Default, Serialize, Deserialize)]
struct OrderSequence {
    next: u64,
}

fn order_suffix(id: &str) -> Option<u64> {
    id.strip_prefix("AN")?.parse().ok()
}

async fn next_order_id(store: &RecordStore, orders: &[Order]) -> Result<String, ApiError> {
    let mut seq: OrderSequence = store.read(Collection::OrderSequence).await;
    if seq.next == 0 {
        seq.next = orders.iter().filter_map(|o| order_suffix(&o.id)).max().unwrap_or(0) + 1;
    }
    let id = format!("AN{}", seq.next);
    seq.next += 1;
    store.write(Collection::OrderSequence, &seq).await?;
    Ok(id)
}

/// All `processing` orders first; newest date first within each partition.
pub fn sort_orders(orders: &mut [Order]) {
    orders.sort_by(|a, b| {
        let a_processing = a.status == OrderStatus::Processing;
        let b_processing = b.status == OrderStatus::Processing;
        b_processing.cmp(&a_processing).then_with(|| b.date.cmp(&a.date))
    });
}

pub async fn list_orders(store: &RecordStore) -> Vec<Order> {
    let mut orders: Vec<Order> = store.read(Collection::Orders).await;
    sort_orders(&mut orders);
    orders
}

pub async fn get_order(store: &RecordStore, id: &str) -> Result<Order, ApiError> {
    let orders: Vec<Order> = store.read(Collection::Orders).await;
    orders
        .into_iter()
        .find(|o| o.id == id)
        .ok_or_else(|| ApiError::not_found(format!("order {id}")))
}

/// Persist the new order, then decrement stock for its items. The order
/// stays recorded even when the stock write fails afterwards.
pub async fn create_order(store: &RecordStore, req: CreateOrderRequest) -> Result<Order, ApiError> {
    req.validate().map_err(|e| ApiError::Validation(e.to_string()))?;

    let guard = store.guard(Collection::Orders).await;
    let mut orders: Vec<Order> = store.read(Collection::Orders).await;
    let id = next_order_id(store, &orders).await?;
    let order = Order {
        id,
        date: Utc::now(),
        customer: req.customer,
        items: req.items,
        status: OrderStatus::Processing,
        completed_at: None,
        total_amount: req.total_amount,
        shipping_address: req.shipping_address,
        payment_method: req.payment_method,
        tracking_id: None,
    };
    orders.push(order.clone());
    store.write(Collection::Orders, &orders).await?;
    drop(guard);

    if let Err(err) = inventory::adjust(store, &order.items, AdjustDirection::Decrease).await {
        tracing::warn!(order = %order.id, %err, "stock decrement failed after order creation");
    }
    Ok(order)
}

/// Merge a partial update into an order. The first transition into
/// `cancelled` returns stock over the order's recorded items.
pub async fn update_order(
    store: &RecordStore,
    id: &str,
    patch: UpdateOrderRequest,
) -> Result<Order, ApiError> {
    let _guard = store.guard(Collection::Orders).await;
    let mut orders: Vec<Order> = store.read(Collection::Orders).await;
    let pos = orders
        .iter()
        .position(|o| o.id == id)
        .ok_or_else(|| ApiError::not_found(format!("order {id}")))?;

    if let Some(new_status) = patch.status {
        let newly_cancelled =
            new_status == OrderStatus::Cancelled && orders[pos].status != OrderStatus::Cancelled;
        if newly_cancelled {
            if let Err(err) =
                inventory::adjust(store, &orders[pos].items, AdjustDirection::Increase).await
            {
                tracing::warn!(order = %id, %err, "stock return failed on cancellation");
            }
        }
    }

    let order = &mut orders[pos];
    if let Some(customer) = patch.customer {
        order.customer = customer;
    }
    if let Some(items) = patch.items {
        order.items = items;
    }
    if let Some(total) = patch.total_amount {
        order.total_amount = total;
    }
    if let Some(address) = patch.shipping_address {
        order.shipping_address = Some(address);
    }
    if let Some(method) = patch.payment_method {
        order.payment_method = Some(method);
    }
    if let Some(status) = patch.status {
        order.apply_status(status);
    }
    let updated = order.clone();
    store.write(Collection::Orders, &orders).await?;
    Ok(updated)
}

/// Remove an order, returning stock first when it was not already
/// cancelled.
pub async fn delete_order(store: &RecordStore, id: &str) -> Result<Order, ApiError> {
    let _guard = store.guard(Collection::Orders).await;
    let mut orders: Vec<Order> = store.read(Collection::Orders).await;
    let pos = orders
        .iter()
        .position(|o| o.id == id)
        .ok_or_else(|| ApiError::not_found(format!("order {id}")))?;

    if orders[pos].status != OrderStatus::Cancelled {
        if let Err(err) =
            inventory::adjust(store, &orders[pos].items, AdjustDirection::Increase).await
        {
            tracing::warn!(order = %id, %err, "stock return failed on deletion");
        }
    }
    let removed = orders.remove(pos);
    store.write(Collection::Orders, &orders).await?;
    Ok(removed)
}

/// Apply one status to every matching order in a single file rewrite.
///
/// When cancelling, stock is returned once per matching order whose
/// current status is not already `cancelled`. The returned count is the
/// number of matched ids, even when fewer triggered a stock change.
pub async fn bulk_update(
    store: &RecordStore,
    ids: &[String],
    status: OrderStatus,
) -> Result<(usize, Vec<Order>), ApiError> {
    if ids.is_empty() {
        return Err(ApiError::Validation("orderIds must not be empty".to_string()));
    }

    let _guard = store.guard(Collection::Orders).await;
    let mut orders: Vec<Order> = store.read(Collection::Orders).await;

    if status == OrderStatus::Cancelled {
        let to_return: Vec<(String, Vec<LineItem>)> = orders
            .iter()
            .filter(|o| ids.contains(&o.id) && o.status != OrderStatus::Cancelled)
            .map(|o| (o.id.clone(), o.items.clone()))
            .collect();
        for (order_id, items) in &to_return {
            if let Err(err) = inventory::adjust(store, items, AdjustDirection::Increase).await {
                tracing::warn!(order = %order_id, %err, "stock return failed during bulk cancel");
            }
        }
    }

    let mut updated = 0;
    for order in orders.iter_mut() {
        if ids.contains(&order.id) {
            order.apply_status(status);
            updated += 1;
        }
    }
    sort_orders(&mut orders);
    store.write(Collection::Orders, &orders).await?;

    let affected = orders.iter().filter(|o| ids.contains(&o.id)).cloned().collect();
    Ok((updated, affected))
}
