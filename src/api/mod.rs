//! HTTP surface: routing and request handlers.

pub mod auth;
pub mod categories;
pub mod courier;
pub mod customers;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod settings;

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Malformed or missing bodies become 400s rather than the extractor's
/// default rejection.
pub(crate) fn parse_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::Validation(rejection.body_text()))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/health",
            get(|| async {
                Json(serde_json::json!({"status": "healthy", "service": "commerce-backoffice"}))
            }),
        )
        .route("/api/v1/products", get(products::list).post(products::create))
        .route(
            "/api/v1/products/:id",
            get(products::get_one).put(products::update).delete(products::delete),
        )
        .route("/api/v1/categories", get(categories::list).post(categories::create))
        .route("/api/v1/categories/:id", get(categories::get_one).delete(categories::delete))
        .route("/api/v1/customers", get(customers::list).post(customers::create))
        .route("/api/v1/customers/:id", put(customers::update).delete(customers::delete))
        .route("/api/v1/orders", get(orders::list).post(orders::create))
        .route("/api/v1/orders/bulk", put(orders::bulk_update))
        .route(
            "/api/v1/orders/:id",
            get(orders::get_one).put(orders::update).delete(orders::delete),
        )
        .route("/api/v1/settings", get(settings::get_settings).put(settings::replace))
        .route("/api/v1/dashboard", get(dashboard::stats))
        .route("/api/v1/auth", post(auth::action))
        .route("/api/v1/courier/send", post(courier::send).get(courier::track))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
