//! Environment-driven configuration.

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Service configuration, collected once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Directory holding the JSON collection files.
    pub data_dir: PathBuf,
    /// Secret used to sign admin tokens.
    pub auth_secret: String,
    /// Courier credentials; `None` disables the courier endpoints.
    pub courier: Option<CourierConfig>,
}

#[derive(Debug, Clone)]
pub struct CourierConfig {
    pub base_url: String,
    pub api_key: String,
    pub api_secret: String,
}

const DEFAULT_COURIER_URL: &str = "https://portal.packzy.com/api/v1";

impl Config {
    pub fn from_env() -> Result<Self> {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8083);
        let data_dir = std::env::var("DATA_DIR")
            .unwrap_or_else(|_| "data".to_string())
            .into();
        let auth_secret = std::env::var("AUTH_SECRET").context("AUTH_SECRET must be set")?;

        let courier = match (
            std::env::var("COURIER_API_KEY"),
            std::env::var("COURIER_API_SECRET"),
        ) {
            (Ok(api_key), Ok(api_secret)) => Some(CourierConfig {
                base_url: std::env::var("COURIER_BASE_URL")
                    .unwrap_or_else(|_| DEFAULT_COURIER_URL.to_string()),
                api_key,
                api_secret,
            }),
            _ => None,
        };

        Ok(Self { port, data_dir, auth_secret, courier })
    }
}
