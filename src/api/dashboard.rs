//! Dashboard snapshot: computed from the current collections and
//! persisted on every read.

use crate::domain::{DashboardStats, Order, OrderStatus, Product, Settings};
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::Collection;
use axum::extract::State;
use axum::Json;
use chrono::Utc;
use rust_decimal::Decimal;

pub async fn stats(State(state): State<AppState>) -> Result<Json<DashboardStats>, ApiError> {
    let orders: Vec<Order> = state.store.read(Collection::Orders).await;
    let products: Vec<Product> = state.store.read(Collection::Products).await;
    let settings: Settings = state.store.read(Collection::Settings).await;

    let count = |status: OrderStatus| orders.iter().filter(|o| o.status == status).count();
    let stats = DashboardStats {
        total_orders: orders.len(),
        processing_orders: count(OrderStatus::Processing),
        completed_orders: count(OrderStatus::Completed),
        cancelled_orders: count(OrderStatus::Cancelled),
        total_revenue: orders
            .iter()
            .filter(|o| o.status != OrderStatus::Cancelled)
            .map(|o| o.total_amount)
            .sum::<Decimal>(),
        low_stock_products: products
            .iter()
            .filter(|p| p.total_stock() <= settings.low_stock_threshold)
            .count(),
        generated_at: Utc::now(),
    };

    let _guard = state.store.guard(Collection::Dashboard).await;
    state.store.write(Collection::Dashboard, &stats).await?;
    Ok(Json(stats))
}
