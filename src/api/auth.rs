//! Single action-dispatch auth endpoint.

use crate::api::parse_body;
use crate::auth;
use crate::domain::Role;
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum AuthRequest {
    Register { email: String, password: String },
    Login { email: String, password: String },
    Verify { token: String },
    GetPendingUsers { token: String },
    Approve { token: String, id: String, role: Role },
}

pub async fn action(
    State(state): State<AppState>,
    body: Result<Json<AuthRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let secret = &state.config.auth_secret;
    match parse_body(body)? {
        AuthRequest::Register { email, password } => {
            auth::register(&state.store, &email, &password).await.map(Json)
        }
        AuthRequest::Login { email, password } => {
            let login = auth::login(&state.store, secret, &email, &password).await?;
            Ok(Json(json!(login)))
        }
        AuthRequest::Verify { token } => {
            let claims = auth::verify(secret, &token)?;
            Ok(Json(json!({ "success": true, "claims": claims })))
        }
        AuthRequest::GetPendingUsers { token } => {
            auth::require_superadmin(secret, &token)?;
            let pending = auth::pending_users(&state.store).await;
            Ok(Json(json!({ "success": true, "pendingUsers": pending })))
        }
        AuthRequest::Approve { token, id, role } => {
            auth::require_superadmin(secret, &token)?;
            auth::approve(&state.store, &id, role).await.map(Json)
        }
    }
}
