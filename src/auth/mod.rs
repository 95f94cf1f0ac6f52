//! Admin authentication with a manual approval workflow.
//!
//! Registration lands in a pending queue; a superadmin approves accounts
//! into the users collection. The very first registration bootstraps the
//! initial superadmin directly, since nobody could approve it otherwise.

pub mod password;
pub mod token;

pub use token::Claims;

use crate::domain::{AdminUser, PendingUser, Role};
use crate::error::ApiError;
use crate::store::{Collection, RecordStore};
use chrono::{Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

const TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PendingUserSummary {
    pub id: String,
    pub email: String,
    pub requested_at: chrono::DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub email: String,
    pub role: Role,
}

fn check_credentials(email: &str, password: &str) -> Result<(), ApiError> {
    if !validator::validate_email(email) {
        return Err(ApiError::Validation("invalid email address".to_string()));
    }
    if password.len() < password::MIN_PASSWORD_LENGTH {
        return Err(ApiError::Validation(format!(
            "password must be at least {} characters",
            password::MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

/// Queue a registration for approval. The first account ever registered
/// becomes the superadmin immediately.
pub async fn register(
    store: &RecordStore,
    email: &str,
    password: &str,
) -> Result<serde_json::Value, ApiError> {
    check_credentials(email, password)?;

    let _users_guard = store.guard(Collection::Users).await;
    let _pending_guard = store.guard(Collection::PendingUsers).await;
    let mut users: Vec<AdminUser> = store.read(Collection::Users).await;
    let mut pending: Vec<PendingUser> = store.read(Collection::PendingUsers).await;

    let taken = users.iter().any(|u| u.email.eq_ignore_ascii_case(email))
        || pending.iter().any(|p| p.email.eq_ignore_ascii_case(email));
    if taken {
        return Err(ApiError::Validation("email already registered".to_string()));
    }

    let password_hash = password::hash_password(password)?;
    if users.is_empty() {
        users.push(AdminUser {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            password_hash,
            role: Role::Superadmin,
            created_at: Utc::now(),
        });
        store.write(Collection::Users, &users).await?;
        tracing::info!(%email, "bootstrapped initial superadmin");
        return Ok(serde_json::json!({
            "success": true,
            "message": "initial superadmin account created"
        }));
    }

    pending.push(PendingUser {
        id: Uuid::new_v4().to_string(),
        email: email.to_string(),
        password_hash,
        requested_at: Utc::now(),
    });
    store.write(Collection::PendingUsers, &pending).await?;
    Ok(serde_json::json!({
        "success": true,
        "message": "registration received, awaiting approval"
    }))
}

pub async fn login(
    store: &RecordStore,
    secret: &str,
    email: &str,
    password: &str,
) -> Result<LoginResponse, ApiError> {
    let users: Vec<AdminUser> = store.read(Collection::Users).await;
    match users.iter().find(|u| u.email.eq_ignore_ascii_case(email)) {
        Some(user) if password::verify_password(password, &user.password_hash) => {
            let claims =
                Claims::new(&user.id, &user.email, user.role, Duration::hours(TOKEN_TTL_HOURS));
            let token = token::sign(&claims, secret)?;
            Ok(LoginResponse { success: true, token, email: user.email.clone(), role: user.role })
        }
        Some(_) => Err(ApiError::Unauthorized("invalid credentials".to_string())),
        None => {
            let pending: Vec<PendingUser> = store.read(Collection::PendingUsers).await;
            if pending.iter().any(|p| p.email.eq_ignore_ascii_case(email)) {
                Err(ApiError::Unauthorized("account awaiting approval".to_string()))
            } else {
                Err(ApiError::Unauthorized("invalid credentials".to_string()))
            }
        }
    }
}

/// Validate a presented token against the signing secret.
pub fn verify(secret: &str, token: &str) -> Result<Claims, ApiError> {
    token::verify(token, secret)
}

/// Validate a token and require the superadmin role.
pub fn require_superadmin(secret: &str, token: &str) -> Result<Claims, ApiError> {
    let claims = token::verify(token, secret)?;
    if claims.role != Role::Superadmin {
        return Err(ApiError::Forbidden("superadmin access required".to_string()));
    }
    Ok(claims)
}

pub async fn pending_users(store: &RecordStore) -> Vec<PendingUserSummary> {
    let pending: Vec<PendingUser> = store.read(Collection::PendingUsers).await;
    pending
        .into_iter()
        .map(|p| PendingUserSummary { id: p.id, email: p.email, requested_at: p.requested_at })
        .collect()
}

/// Move a pending registration into the users collection.
pub async fn approve(
    store: &RecordStore,
    pending_id: &str,
    role: Role,
) -> Result<serde_json::Value, ApiError> {
    let _users_guard = store.guard(Collection::Users).await;
    let _pending_guard = store.guard(Collection::PendingUsers).await;
    let mut users: Vec<AdminUser> = store.read(Collection::Users).await;
    let mut pending: Vec<PendingUser> = store.read(Collection::PendingUsers).await;

    let pos = pending
        .iter()
        .position(|p| p.id == pending_id)
        .ok_or_else(|| ApiError::not_found(format!("pending user {pending_id}")))?;
    let approved = pending.remove(pos);
    let email = approved.email.clone();
    users.push(AdminUser {
        id: approved.id,
        email: approved.email,
        password_hash: approved.password_hash,
        role,
        created_at: Utc::now(),
    });
    store.write(Collection::Users, &users).await?;
    store.write(Collection::PendingUsers, &pending).await?;
    tracing::info!(%email, ?role, "approved pending user");
    Ok(serde_json::json!({ "success": true, "message": format!("{email} approved") }))
}
