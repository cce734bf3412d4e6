//! Dashboard Web Service
//!
//! Server-rendered dashboard built with Axum. Stats are fetched from the
//! backend API on every request using the server-side API address.
//!
//! # Endpoints
//!
//! ## Dashboard
//! - `GET /?period={7d|30d|3m}` - Dashboard page (HTML)
//!
//! ## Chat
//! - `GET /chat` - Assistant panel (session from the `chat_session_id` cookie)
//! - `POST /chat/message` - Send a message
//! - `POST /chat/mode` - Toggle normal/admin mode
//! - `POST /chat/reset` - Start a new session
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe (checks the stats API)
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,no_run
//! use botboard::client::{ChatClient, StatsClient};
//! use botboard::config::{Config, ExecutionContext};
//! use botboard::web::{serve, AppState};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let stats = StatsClient::from_config(&config.api, ExecutionContext::Server)?;
//!     let chat = ChatClient::from_config(&config.api, ExecutionContext::Server)?;
//!     serve(AppState::new(stats, chat), &config.web).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod routes;
pub mod state;

pub use error::{WebError, WebResult};
pub use state::AppState;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::WebConfig;

/// Build the router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let shared_state = Arc::new(state);

    Router::new()
        .route("/", get(routes::dashboard::dashboard_page))
        .route("/chat", get(routes::chat::chat_page))
        .route("/chat/message", post(routes::chat::send_message))
        .route("/chat/mode", post(routes::chat::toggle_mode))
        .route("/chat/reset", post(routes::chat::reset_session))
        .nest("/health", health_routes)
        .fallback(routes::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(shared_state)
}

/// Start the web service
pub async fn serve(state: AppState, config: &WebConfig) -> WebResult<()> {
    let stats_url = state.stats.base_url().to_string();
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Dashboard listening on {} (stats API: {})", addr, stats_url);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| WebError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Dashboard shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{ADMIN_GREETING, APOLOGY_MESSAGE, NORMAL_GREETING, SEND_ERROR_BANNER};
    use crate::client::models::StatsResponse;
    use crate::client::testing::{echo_chat, sample_stats, spawn_fake_api, unreachable_base_url};
    use crate::client::{ChatClient, StatsClient};
    use axum::{
        body::Body,
        extract::Query,
        http::{header, Request, StatusCode},
        Json,
    };
    use std::collections::HashMap;
    use std::time::Duration;
    use tower::util::ServiceExt;

    async fn fake_stats(Query(params): Query<HashMap<String, String>>) -> Json<StatsResponse> {
        let period = params
            .get("period")
            .and_then(|p| p.parse().ok())
            .unwrap_or_default();
        Json(sample_stats(period))
    }

    async fn create_test_app() -> Router {
        let api = Router::new()
            .route("/api/stats", get(fake_stats))
            .route("/api/chat/message", post(echo_chat))
            .route("/health", get(|| async { Json(serde_json::json!({"status": "ok"})) }));
        let base = spawn_fake_api(api).await;
        let stats = StatsClient::new(base.clone(), Duration::from_secs(5)).unwrap();
        let chat = ChatClient::new(base, Duration::from_secs(5)).unwrap();
        build_router(AppState::new(stats, chat))
    }

    async fn create_offline_app() -> Router {
        let base = unreachable_base_url().await;
        let stats = StatsClient::new(base.clone(), Duration::from_secs(5)).unwrap();
        let chat = ChatClient::new(base, Duration::from_secs(5)).unwrap();
        build_router(AppState::new(stats, chat))
    }

    const SESSION_COOKIE: &str = "chat_session_id=session_1_abc";

    async fn post_form(app: Router, uri: &str, body: String) -> axum::response::Response {
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::COOKIE, SESSION_COOKIE)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn message_form(text: &str) -> String {
        format!("message={}", urlencoding::encode(text))
    }

    async fn get_request(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_dashboard_default_period() {
        let (status, body) = get_request(create_test_app().await, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Данные за последние 7 дней"));
        assert!(body.contains("пн, 14"));
        assert!(body.contains("1,234,567"));
    }

    #[tokio::test]
    async fn test_dashboard_selected_period() {
        let (status, body) = get_request(create_test_app().await, "/?period=3m").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Данные за последние 3 месяца"));
        assert!(body.contains(r#"<a class="tab active" href="/?period=3m">"#));
    }

    #[tokio::test]
    async fn test_dashboard_not_cached() {
        let app = create_test_app().await;
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "no-store"
        );
    }

    #[tokio::test]
    async fn test_dashboard_backend_down_shows_error_panel() {
        let (status, body) = get_request(create_offline_app().await, "/?period=30d").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Ошибка загрузки Dashboard"));
        assert!(!body.contains("metric-grid"));
    }

    #[tokio::test]
    async fn test_health_endpoints() {
        let app = create_test_app().await;
        let (status, _) = get_request(app.clone(), "/health/live").await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = get_request(app.clone(), "/health/ready").await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = get_request(app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["status"], "healthy");
    }

    #[tokio::test]
    async fn test_readiness_when_backend_down() {
        let app = create_offline_app().await;
        let (status, _) = get_request(app.clone(), "/health/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        let (_, body) = get_request(app, "/health").await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["status"], "degraded");
        assert_eq!(json["api"], "error");
    }

    #[tokio::test]
    async fn test_dashboard_has_chat_button() {
        let (_, body) = get_request(create_test_app().await, "/").await;
        assert!(body.contains(r#"class="chat-fab" href="/chat""#));
    }

    #[tokio::test]
    async fn test_chat_page_issues_session_cookie() {
        let response = create_test_app()
            .await
            .oneshot(Request::builder().uri("/chat").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(cookie.starts_with("chat_session_id=session_"));
        assert!(cookie.contains("HttpOnly"));

        let body = body_text(response).await;
        assert!(body.contains(NORMAL_GREETING));
    }

    #[tokio::test]
    async fn test_chat_message_round_trip() {
        let app = create_test_app().await;
        let response = post_form(app, "/chat/message", message_form("Привет")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::SET_COOKIE).is_none());

        let body = body_text(response).await;
        assert!(body.contains("<p>Привет</p>"));
        assert!(body.contains("session_1_abc: Привет"));
        assert!(!body.contains("<details"));
    }

    #[tokio::test]
    async fn test_chat_mode_toggle_shows_sql() {
        let app = create_test_app().await;

        let response = post_form(app.clone(), "/chat/mode", String::new()).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/chat");

        let response = post_form(app, "/chat/message", message_form("Сколько сообщений?")).await;
        let body = body_text(response).await;
        assert!(body.contains(ADMIN_GREETING));
        assert!(body.contains("SELECT COUNT(*) FROM messages"));
        assert!(body.contains("<details"));
    }

    #[tokio::test]
    async fn test_chat_backend_down_shows_banner() {
        let app = create_offline_app().await;
        let response = post_form(app, "/chat/message", message_form("Привет")).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_text(response).await;
        assert!(body.contains(SEND_ERROR_BANNER));
        assert!(body.contains(APOLOGY_MESSAGE));
    }

    #[tokio::test]
    async fn test_chat_reset_issues_new_session() {
        let app = create_test_app().await;
        let response = post_form(app, "/chat/reset", String::new()).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let cookie = response.headers().get(header::SET_COOKIE).unwrap();
        let cookie = cookie.to_str().unwrap();
        assert!(cookie.starts_with("chat_session_id=session_"));
        assert!(!cookie.starts_with(SESSION_COOKIE));
    }

    #[tokio::test]
    async fn test_unknown_path() {
        let (status, body) = get_request(create_test_app().await, "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("NOT_FOUND"));
    }
}
