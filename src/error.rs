//! Error taxonomy shared by every endpoint.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// All failures a request can surface. Every variant maps to a JSON
/// envelope of the form `{"error": "<message>"}`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("storage error: {0}")]
    Storage(String),

    /// Courier (or any third-party) failure passed through verbatim.
    #[error("upstream error ({status}): {body}")]
    Upstream { status: u16, body: String },
}

impl ApiError {
    pub fn not_found(what: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{what} not found"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Validation(m) => (StatusCode::BAD_REQUEST, m),
            Self::NotFound(m) => (StatusCode::NOT_FOUND, m),
            Self::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m),
            Self::Forbidden(m) => (StatusCode::FORBIDDEN, m),
            Self::Storage(m) => {
                tracing::error!(error = %m, "storage failure");
                (StatusCode::INTERNAL_SERVER_ERROR, m)
            }
            Self::Upstream { status, body } => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                body,
            ),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
