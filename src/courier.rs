//! Courier hand-off.
//!
//! Thin proxy to the courier's REST API, keyed by API key/secret. No
//! retry or backoff; upstream failures pass through verbatim with their
//! status code and body.

use crate::config::CourierConfig;
use crate::domain::Order;
use crate::error::ApiError;
use serde::{Deserialize, Serialize};

/// Provider delivery statuses mapped to display labels.
pub fn status_label(provider_status: &str) -> &'static str {
    match provider_status {
        "pending" => "Pending",
        "in_review" => "In Review",
        "hold" => "On Hold",
        "in_transit" => "In Transit",
        "delivered" => "Delivered",
        "partial_delivered" => "Partially Delivered",
        "cancelled" => "Cancelled",
        _ => "Unknown",
    }
}

#[derive(Debug, Serialize)]
struct ConsignmentRequest<'a> {
    invoice: &'a str,
    recipient_name: &'a str,
    recipient_phone: &'a str,
    recipient_address: &'a str,
    cod_amount: rust_decimal::Decimal,
}

#[derive(Debug, Deserialize)]
struct ConsignmentResponse {
    consignment: Consignment,
}

#[derive(Debug, Deserialize)]
struct Consignment {
    tracking_code: String,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    delivery_status: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryStatus {
    pub provider_status: String,
    pub label: &'static str,
}

pub struct CourierClient {
    http: reqwest::Client,
    config: CourierConfig,
}

impl CourierClient {
    pub fn new(config: CourierConfig) -> Self {
        Self { http: reqwest::Client::new(), config }
    }

    fn upstream(err: reqwest::Error) -> ApiError {
        ApiError::Upstream { status: 502, body: format!("courier unreachable: {err}") }
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        Err(ApiError::Upstream {
            status: status.as_u16(),
            body: response.text().await.unwrap_or_default(),
        })
    }

    /// Hand an order to the courier; returns the tracking id.
    pub async fn create_consignment(&self, order: &Order) -> Result<String, ApiError> {
        let recipient_address = order
            .shipping_address
            .as_deref()
            .or(order.customer.address.as_deref())
            .unwrap_or_default();
        let payload = ConsignmentRequest {
            invoice: &order.id,
            recipient_name: &order.customer.name,
            recipient_phone: order.customer.phone.as_deref().unwrap_or_default(),
            recipient_address,
            cod_amount: order.total_amount,
        };
        let response = self
            .http
            .post(format!("{}/create_order", self.config.base_url))
            .header("Api-Key", &self.config.api_key)
            .header("Secret-Key", &self.config.api_secret)
            .json(&payload)
            .send()
            .await
            .map_err(Self::upstream)?;
        let body: ConsignmentResponse = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::Upstream { status: 502, body: format!("invalid courier response: {e}") })?;
        tracing::info!(order = %order.id, tracking = %body.consignment.tracking_code, "consignment created");
        Ok(body.consignment.tracking_code)
    }

    /// Poll delivery status for a tracking id.
    pub async fn delivery_status(&self, tracking_id: &str) -> Result<DeliveryStatus, ApiError> {
        let response = self
            .http
            .get(format!("{}/status_by_trackingcode/{tracking_id}", self.config.base_url))
            .header("Api-Key", &self.config.api_key)
            .header("Secret-Key", &self.config.api_secret)
            .send()
            .await
            .map_err(Self::upstream)?;
        let body: StatusResponse = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::Upstream { status: 502, body: format!("invalid courier response: {e}") })?;
        let label = status_label(&body.delivery_status);
        Ok(DeliveryStatus { provider_status: body.delivery_status, label })
    }
}
