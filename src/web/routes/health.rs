//! Health Routes
//!
//! Health check endpoints for monitoring and Kubernetes probes.
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (stats API reachable)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::web::state::AppState;

/// Full health status
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy or degraded
    pub status: String,
    /// Stats API status: ok or error
    pub api: String,
    /// Address the stats API is reached at
    pub api_url: String,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}

/// GET /health/live
///
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Returns 200 only if the stats API answers its own health check.
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    match state.stats.health_check().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!("Stats API not ready: {}", e);
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// GET /health
///
/// The page degrades to its error panel when the API is down, so the service
/// itself reports "degraded" rather than failing.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let api_ok = state.stats.health_check().await.is_ok();

    Json(HealthResponse {
        status: if api_ok { "healthy" } else { "degraded" }.to_string(),
        api: if api_ok { "ok" } else { "error" }.to_string(),
        api_url: state.stats.base_url().to_string(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
