//! Product endpoints.

use crate::api::parse_body;
use crate::domain::{Product, Variant};
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::Collection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    pub category: Option<String>,
    pub show_all_stock: Option<bool>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    /// Client-supplied id; generated when absent.
    pub id: Option<String>,
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category: Option<String>,
    pub stock: Option<u32>,
    #[serde(default)]
    pub variants: Vec<Variant>,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<String>,
    pub stock: Option<u32>,
    pub variants: Option<Vec<Variant>>,
    pub images: Option<Vec<String>>,
}

/// Case-insensitive category filter plus the positive-stock-somewhere
/// rule, unless `showAllStock=true`.
pub async fn list(
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> Json<Vec<Product>> {
    let products: Vec<Product> = state.store.read(Collection::Products).await;
    let show_all = filter.show_all_stock.unwrap_or(false);
    let category = filter.category.as_deref().filter(|c| !c.is_empty());
    let products = products
        .into_iter()
        .filter(|p| category.map_or(true, |c| p.in_category(c)))
        .filter(|p| show_all || p.has_stock())
        .collect();
    Json(products)
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let products: Vec<Product> = state.store.read(Collection::Products).await;
    products
        .into_iter()
        .find(|p| p.id == id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("product {id}")))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let req = parse_body(body)?;
    req.validate().map_err(|e| ApiError::Validation(e.to_string()))?;

    let _guard = state.store.guard(Collection::Products).await;
    let mut products: Vec<Product> = state.store.read(Collection::Products).await;
    let id = req
        .id
        .unwrap_or_else(|| format!("SKU-{:08}", rand::random::<u32>() % 100_000_000));
    if products.iter().any(|p| p.id == id) {
        return Err(ApiError::Validation(format!("product {id} already exists")));
    }
    let now = Utc::now();
    let product = Product {
        id,
        name: req.name,
        description: req.description.unwrap_or_default(),
        price: req.price,
        category: req.category,
        stock: req.stock,
        variants: req.variants,
        images: req.images,
        created_at: now,
        updated_at: now,
    };
    products.push(product.clone());
    state.store.write(Collection::Products, &products).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateProductRequest>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    let req = parse_body(body)?;
    let _guard = state.store.guard(Collection::Products).await;
    let mut products: Vec<Product> = state.store.read(Collection::Products).await;
    let product = products
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or_else(|| ApiError::not_found(format!("product {id}")))?;

    if let Some(name) = req.name {
        product.name = name;
    }
    if let Some(description) = req.description {
        product.description = description;
    }
    if let Some(price) = req.price {
        product.price = price;
    }
    if let Some(category) = req.category {
        product.category = Some(category);
    }
    if let Some(stock) = req.stock {
        product.stock = Some(stock);
    }
    if let Some(variants) = req.variants {
        product.variants = variants;
    }
    if let Some(images) = req.images {
        product.images = images;
    }
    product.updated_at = Utc::now();
    let updated = product.clone();
    state.store.write(Collection::Products, &products).await?;
    Ok(Json(updated))
}

/// Removes the record outright; existing orders keep their line items.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let _guard = state.store.guard(Collection::Products).await;
    let mut products: Vec<Product> = state.store.read(Collection::Products).await;
    let before = products.len();
    products.retain(|p| p.id != id);
    if products.len() == before {
        return Err(ApiError::not_found(format!("product {id}")));
    }
    state.store.write(Collection::Products, &products).await?;
    Ok(StatusCode::NO_CONTENT)
}
