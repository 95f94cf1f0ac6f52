//! Order endpoints.

use crate::api::parse_body;
use crate::domain::{Order, OrderStatus};
use crate::error::ApiError;
use crate::orders::{self, CreateOrderRequest, UpdateOrderRequest};
use crate::state::AppState;
use crate::store::Collection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUpdateRequest {
    pub order_ids: Vec<String>,
    pub status: OrderStatus,
}

pub async fn list(State(state): State<AppState>) -> Json<Vec<Order>> {
    Json(orders::list_orders(&state.store).await)
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    orders::get_order(&state.store, &id).await.map(Json)
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let req = parse_body(body)?;
    let order = orders::create_order(&state.store, req).await?;
    tracing::info!(order = %order.id, "order created");
    Ok((StatusCode::CREATED, Json(json!({ "success": true, "order": order }))))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateOrderRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let patch = parse_body(body)?;
    let order = orders::update_order(&state.store, &id, patch).await?;
    Ok(Json(json!({ "success": true, "order": order })))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let order = orders::delete_order(&state.store, &id).await?;
    Ok(Json(json!({ "success": true, "order": order })))
}

pub async fn bulk_update(
    State(state): State<AppState>,
    body: Result<Json<BulkUpdateRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let req = parse_body(body)?;
    let (updated, affected) =
        orders::bulk_update(&state.store, &req.order_ids, req.status).await?;
    Ok(Json(json!({
        "success": true,
        "message": format!("{updated} orders updated"),
        "updated": updated,
        "orders": affected,
    })))
}

/// Not routed; used by the courier handler to persist tracking ids under
/// the orders guard.
pub(crate) async fn attach_tracking(
    state: &AppState,
    id: &str,
    tracking_id: &str,
) -> Result<Order, ApiError> {
    let _guard = state.store.guard(Collection::Orders).await;
    let mut all: Vec<Order> = state.store.read(Collection::Orders).await;
    let order = all
        .iter_mut()
        .find(|o| o.id == id)
        .ok_or_else(|| ApiError::not_found(format!("order {id}")))?;
    order.tracking_id = Some(tracking_id.to_string());
    let updated = order.clone();
    state.store.write(Collection::Orders, &all).await?;
    Ok(updated)
}
