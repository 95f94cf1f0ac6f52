//! Settings endpoints: read, or replace the whole object.

use crate::api::parse_body;
use crate::domain::Settings;
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::Collection;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

pub async fn get_settings(State(state): State<AppState>) -> Json<Settings> {
    Json(state.store.read(Collection::Settings).await)
}

pub async fn replace(
    State(state): State<AppState>,
    body: Result<Json<Settings>, JsonRejection>,
) -> Result<Json<Settings>, ApiError> {
    let settings = parse_body(body)?;
    let _guard = state.store.guard(Collection::Settings).await;
    state.store.write(Collection::Settings, &settings).await?;
    Ok(Json(settings))
}
