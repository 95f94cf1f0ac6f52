//! Customer endpoints.

use crate::api::parse_body;
use crate::domain::Customer;
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::Collection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "invalid email address"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

pub async fn list(State(state): State<AppState>) -> Json<Vec<Customer>> {
    Json(state.store.read(Collection::Customers).await)
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<CreateCustomerRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Customer>), ApiError> {
    let req = parse_body(body)?;
    req.validate().map_err(|e| ApiError::Validation(e.to_string()))?;

    let _guard = state.store.guard(Collection::Customers).await;
    let mut customers: Vec<Customer> = state.store.read(Collection::Customers).await;
    let customer = Customer {
        id: Some(uuid::Uuid::new_v4().to_string()),
        name: req.name,
        email: req.email,
        phone: req.phone,
        address: req.address,
        created_at: Some(Utc::now()),
    };
    customers.push(customer.clone());
    state.store.write(Collection::Customers, &customers).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UpdateCustomerRequest>, JsonRejection>,
) -> Result<Json<Customer>, ApiError> {
    let req = parse_body(body)?;
    let _guard = state.store.guard(Collection::Customers).await;
    let mut customers: Vec<Customer> = state.store.read(Collection::Customers).await;
    let customer = customers
        .iter_mut()
        .find(|c| c.id.as_deref() == Some(id.as_str()))
        .ok_or_else(|| ApiError::not_found(format!("customer {id}")))?;

    if let Some(name) = req.name {
        customer.name = name;
    }
    if let Some(email) = req.email {
        customer.email = Some(email);
    }
    if let Some(phone) = req.phone {
        customer.phone = Some(phone);
    }
    if let Some(address) = req.address {
        customer.address = Some(address);
    }
    let updated = customer.clone();
    state.store.write(Collection::Customers, &customers).await?;
    Ok(Json(updated))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let _guard = state.store.guard(Collection::Customers).await;
    let mut customers: Vec<Customer> = state.store.read(Collection::Customers).await;
    let before = customers.len();
    customers.retain(|c| c.id.as_deref() != Some(id.as_str()));
    if customers.len() == before {
        return Err(ApiError::not_found(format!("customer {id}")));
    }
    state.store.write(Collection::Customers, &customers).await?;
    Ok(StatusCode::NO_CONTENT)
}
