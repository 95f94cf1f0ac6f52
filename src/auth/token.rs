//! Signed admin tokens.
//!
//! Compact `header.claims.signature` tokens, HMAC-SHA256 over the first
//! two base64url segments. Verification rejects tampering and expiry.

use crate::domain::Role;
use crate::error::ApiError;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const HEADER: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub email: String,
    pub role: Role,
    /// Unix expiry timestamp.
    pub exp: i64,
}

impl Claims {
    pub fn new(sub: impl Into<String>, email: impl Into<String>, role: Role, ttl: Duration) -> Self {
        Self {
            sub: sub.into(),
            email: email.into(),
            role,
            exp: (Utc::now() + ttl).timestamp(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.exp <= Utc::now().timestamp()
    }
}

fn mac(secret: &str, input: &str) -> Result<HmacSha256, ApiError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| ApiError::Storage("invalid signing key".to_string()))?;
    mac.update(input.as_bytes());
    Ok(mac)
}

pub fn sign(claims: &Claims, secret: &str) -> Result<String, ApiError> {
    let header = URL_SAFE_NO_PAD.encode(HEADER);
    let payload = serde_json::to_vec(claims)
        .map_err(|e| ApiError::Storage(format!("encode claims: {e}")))?;
    let payload = URL_SAFE_NO_PAD.encode(payload);
    let signing_input = format!("{header}.{payload}");
    let signature = URL_SAFE_NO_PAD.encode(mac(secret, &signing_input)?.finalize().into_bytes());
    Ok(format!("{signing_input}.{signature}"))
}

pub fn verify(token: &str, secret: &str) -> Result<Claims, ApiError> {
    let invalid = || ApiError::Unauthorized("invalid token".to_string());

    let mut parts = token.splitn(3, '.');
    let (header, payload, signature) = match (parts.next(), parts.next(), parts.next()) {
        (Some(h), Some(p), Some(s)) => (h, p, s),
        _ => return Err(invalid()),
    };
    let signature = URL_SAFE_NO_PAD.decode(signature).map_err(|_| invalid())?;
    mac(secret, &format!("{header}.{payload}"))?
        .verify_slice(&signature)
        .map_err(|_| invalid())?;

    let payload = URL_SAFE_NO_PAD.decode(payload).map_err(|_| invalid())?;
    let claims: Claims = serde_json::from_slice(&payload).map_err(|_| invalid())?;
    if claims.is_expired() {
        return Err(ApiError::Unauthorized("token expired".to_string()));
    }
    Ok(claims)
}
