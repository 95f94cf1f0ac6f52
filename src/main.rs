//! Commerce Back-Office - service entry point

use anyhow::Result;
use commerce_backoffice::{api, AppState, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let port = config.port;
    if config.courier.is_none() {
        tracing::warn!("courier credentials not set, courier endpoints disabled");
    }
    let app = api::router(AppState::new(config));

    tracing::info!("🚀 Commerce Back-Office listening on 0.0.0.0:{}", port);
    axum::serve(tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?, app).await?;
    Ok(())
}
