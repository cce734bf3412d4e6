//! Chat API Client
//!
//! Sends chat messages and reads chat history. The terminal client talks to
//! the public API address; the web service relays chat through the server
//! address.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::models::{ChatRequest, ChatResponse, HistoryMessage};
use super::{build_http_client, ensure_success, no_store, ClientResult};
use crate::chat::ChatBackend;
use crate::config::{ApiConfig, ExecutionContext};

/// Number of history messages fetched when no limit is given
pub const DEFAULT_HISTORY_LIMIT: u32 = 50;

/// Client for the `/api/chat` endpoints
#[derive(Debug, Clone)]
pub struct ChatClient {
    client: Client,
    base_url: String,
}

impl ChatClient {
    /// Create a client for an explicit base address
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ClientResult<Self> {
        Ok(Self {
            client: build_http_client(timeout)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Create a client for the API address of the given context
    pub fn from_config(config: &ApiConfig, context: ExecutionContext) -> ClientResult<Self> {
        Self::new(config.base_url(context), config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one chat message
    pub async fn send_message(&self, request: &ChatRequest) -> ClientResult<ChatResponse> {
        let url = format!("{}/api/chat/message", self.base_url);
        tracing::debug!(
            mode = %request.mode,
            session_id = %request.session_id,
            "Sending chat message"
        );

        let response = no_store(self.client.post(&url).json(request)).send().await?;
        let response = ensure_success(response, "Failed to send message")?;

        Ok(response.json().await?)
    }

    /// Fetch up to `limit` past messages of a session, oldest first.
    ///
    /// `None` uses [`DEFAULT_HISTORY_LIMIT`].
    pub async fn history(
        &self,
        session_id: &str,
        limit: Option<u32>,
    ) -> ClientResult<Vec<HistoryMessage>> {
        let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
        let url = format!(
            "{}/api/chat/history/{}",
            self.base_url,
            urlencoding::encode(session_id)
        );

        let request = self.client.get(&url).query(&[("limit", limit)]);
        let response = no_store(request).send().await?;
        let response = ensure_success(response, "Failed to fetch history")?;

        Ok(response.json().await?)
    }
}

#[async_trait]
impl ChatBackend for ChatClient {
    async fn send_message(&self, request: &ChatRequest) -> ClientResult<ChatResponse> {
        ChatClient::send_message(self, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::models::{ChatMode, Role};
    use crate::client::testing::{echo_chat, spawn_fake_api};
    use crate::client::ClientError;
    use axum::{
        extract::{Path, Query},
        http::StatusCode,
        routing::{get, post},
        Json, Router,
    };
    use std::collections::HashMap;

    async fn history_handler(
        Path(session_id): Path<String>,
        Query(params): Query<HashMap<String, String>>,
    ) -> Json<Vec<HistoryMessage>> {
        let limit: usize = params.get("limit").and_then(|l| l.parse().ok()).unwrap_or(0);
        let messages = (0..limit.min(3))
            .map(|i| HistoryMessage {
                role: if i % 2 == 0 { Role::User } else { Role::Assistant },
                content: format!("{}#{}", session_id, i),
                timestamp: "2024-10-16T12:00:00".to_string(),
            })
            .collect();
        Json(messages)
    }

    fn router() -> Router {
        Router::new()
            .route("/api/chat/message", post(echo_chat))
            .route("/api/chat/history/:session_id", get(history_handler))
    }

    fn request(mode: ChatMode) -> ChatRequest {
        ChatRequest {
            message: "Привет".to_string(),
            mode,
            session_id: "session_1_abc".to_string(),
        }
    }

    #[tokio::test]
    async fn test_send_message_round_trip() {
        let base = spawn_fake_api(router()).await;
        let client = ChatClient::new(base, Duration::from_secs(5)).unwrap();

        let normal = client.send_message(&request(ChatMode::Normal)).await.unwrap();
        assert_eq!(normal.message, "session_1_abc: Привет");
        assert_eq!(normal.sql_query, None);

        let admin = client.send_message(&request(ChatMode::Admin)).await.unwrap();
        assert_eq!(admin.mode, ChatMode::Admin);
        assert!(admin.sql_query.is_some());
    }

    #[tokio::test]
    async fn test_history_default_limit_and_order() {
        let base = spawn_fake_api(router()).await;
        let client = ChatClient::new(base, Duration::from_secs(5)).unwrap();

        let history = client.history("session_1_abc", None).await.unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[1].content, "session_1_abc#1");

        let one = client.history("session_1_abc", Some(1)).await.unwrap();
        assert_eq!(one.len(), 1);
    }

    #[tokio::test]
    async fn test_send_message_failure() {
        let router = Router::new().route(
            "/api/chat/message",
            post(|| async { StatusCode::SERVICE_UNAVAILABLE }),
        );
        let base = spawn_fake_api(router).await;
        let client = ChatClient::new(base, Duration::from_secs(5)).unwrap();

        let err = client.send_message(&request(ChatMode::Normal)).await.unwrap_err();
        assert!(matches!(err, ClientError::Status { status: 503, .. }));
        assert_eq!(err.to_string(), "Failed to send message: Service Unavailable");
    }

    #[tokio::test]
    async fn test_widget_over_http() {
        use crate::chat::{ChatWidget, SendOutcome, WidgetState};

        let base = spawn_fake_api(router()).await;
        let client = ChatClient::new(base, Duration::from_secs(5)).unwrap();
        let mut widget = ChatWidget::new(client, "session_1_abc", ChatMode::Admin);

        widget.set_input("Сколько сообщений?");
        assert_eq!(widget.send().await, SendOutcome::Delivered);
        assert_eq!(widget.state(), &WidgetState::Idle);

        let answer = widget.transcript().last().unwrap();
        assert_eq!(answer.text, "session_1_abc: Сколько сообщений?");
        assert_eq!(
            widget.diagnostic_query(answer),
            Some("SELECT COUNT(*) FROM messages")
        );
    }

    #[test]
    fn test_from_config_follows_context() {
        let config = ApiConfig {
            server_url: "http://internal:1".to_string(),
            public_url: "http://public:2/".to_string(),
            ..Default::default()
        };
        let client = ChatClient::from_config(&config, ExecutionContext::Client).unwrap();
        assert_eq!(client.base_url(), "http://public:2");

        let client = ChatClient::from_config(&config, ExecutionContext::Server).unwrap();
        assert_eq!(client.base_url(), "http://internal:1");
    }
}
