//! Courier proxy endpoints.

use crate::api::{orders, parse_body};
use crate::courier::CourierClient;
use crate::error::ApiError;
use crate::orders::get_order;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRequest {
    pub order_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackQuery {
    pub tracking_id: String,
}

fn client(state: &AppState) -> Result<&Arc<CourierClient>, ApiError> {
    state
        .courier
        .as_ref()
        .ok_or_else(|| ApiError::Validation("courier credentials not configured".to_string()))
}

/// Hand an order to the courier and record the tracking id on it.
pub async fn send(
    State(state): State<AppState>,
    body: Result<Json<SendRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let req = parse_body(body)?;
    let courier = client(&state)?;
    let order = get_order(&state.store, &req.order_id).await?;
    let tracking_id = courier.create_consignment(&order).await?;
    let order = orders::attach_tracking(&state, &req.order_id, &tracking_id).await?;
    Ok(Json(json!({ "success": true, "trackingId": tracking_id, "order": order })))
}

/// Poll the courier for delivery status.
pub async fn track(
    State(state): State<AppState>,
    Query(query): Query<TrackQuery>,
) -> Result<Json<Value>, ApiError> {
    let courier = client(&state)?;
    let status = courier.delivery_status(&query.tracking_id).await?;
    Ok(Json(json!({ "success": true, "status": status })))
}
