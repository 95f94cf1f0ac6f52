//! Category endpoints.

use crate::api::parse_body;
use crate::domain::Category;
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::Collection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub description: Option<String>,
}

pub async fn list(State(state): State<AppState>) -> Json<Vec<Category>> {
    Json(state.store.read(Collection::Categories).await)
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Category>, ApiError> {
    let categories: Vec<Category> = state.store.read(Collection::Categories).await;
    categories
        .into_iter()
        .find(|c| c.id == id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("category {id}")))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<CreateCategoryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let req = parse_body(body)?;
    req.validate().map_err(|e| ApiError::Validation(e.to_string()))?;

    let _guard = state.store.guard(Collection::Categories).await;
    let mut categories: Vec<Category> = state.store.read(Collection::Categories).await;
    if categories.iter().any(|c| c.name.eq_ignore_ascii_case(&req.name)) {
        return Err(ApiError::Validation(format!("category {} already exists", req.name)));
    }
    let category = Category::new(req.name, req.description);
    categories.push(category.clone());
    state.store.write(Collection::Categories, &categories).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let _guard = state.store.guard(Collection::Categories).await;
    let mut categories: Vec<Category> = state.store.read(Collection::Categories).await;
    let before = categories.len();
    categories.retain(|c| c.id != id);
    if categories.len() == before {
        return Err(ApiError::not_found(format!("category {id}")));
    }
    state.store.write(Collection::Categories, &categories).await?;
    Ok(StatusCode::NO_CONTENT)
}
