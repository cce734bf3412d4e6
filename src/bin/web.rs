//! Botboard Dashboard Server
//!
//! Run with: cargo run --bin botboard-web
//!
//! # Configuration
//!
//! Reads `config.toml` from the usual locations (or the path in
//! `BOTBOARD_CONFIG`), then applies environment overrides:
//! - `BOTBOARD_API_URL_SERVER`: API address used while rendering (default: http://api:8000)
//! - `BOTBOARD_PUBLIC_API_URL`: API address used by clients (default: http://localhost:8000)
//! - `BOTBOARD_WEB_HOST` / `BOTBOARD_WEB_PORT`: bind address (default: 0.0.0.0:3000)
//! - `BOTBOARD_LOG_LEVEL` / `BOTBOARD_LOG_FORMAT`: logging (default: info, pretty)
//! - `RUST_LOG`: full filter, overrides the log level

use botboard::client::{ChatClient, StatsClient};
use botboard::config::{Config, ExecutionContext};
use botboard::web::{serve, AppState};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let explicit = std::env::var("BOTBOARD_CONFIG")
        .ok()
        .filter(|p| !p.is_empty())
        .map(PathBuf::from);
    let config = Config::load_default(explicit.as_deref())?;
    config.logging.init_tracing();

    tracing::info!("Starting Botboard dashboard v{}", env!("CARGO_PKG_VERSION"));

    let stats = StatsClient::from_config(&config.api, ExecutionContext::Server)?;

    match stats.health_check().await {
        Ok(()) => tracing::info!("Stats API reachable at {}", stats.base_url()),
        Err(e) => tracing::warn!(
            "Stats API not available at {}: {} (pages will show the error panel)",
            stats.base_url(),
            e
        ),
    }

    let chat = ChatClient::from_config(&config.api, ExecutionContext::Server)?;

    serve(AppState::new(stats, chat), &config.web).await?;

    tracing::info!("Botboard dashboard stopped");
    Ok(())
}
