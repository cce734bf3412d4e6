//! Backend API Clients
//!
//! HTTP clients for the bot analytics API.
//!
//! - [`StatsClient`]: dashboard statistics and backend health
//! - [`ChatClient`]: chat messages and chat history
//!
//! Every request is sent with `Cache-Control: no-store`. Any non-success
//! status becomes [`ClientError::Status`] carrying the status text; the
//! response body is never parsed for error details.

pub mod chat;
pub mod models;
pub mod stats;

pub use chat::{ChatClient, DEFAULT_HISTORY_LIMIT};
pub use models::{
    ChatMode, ChatRequest, ChatResponse, HistoryMessage, MetricCard, MetricsData, Period, Role,
    StatsResponse, TimelinePoint, Trend,
};
pub use stats::StatsClient;

use reqwest::{header, Client, RequestBuilder, Response};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to the backend API
#[derive(Error, Debug)]
pub enum ClientError {
    /// The API answered with a non-success status
    #[error("{context}: {status_text}")]
    Status {
        context: &'static str,
        status: u16,
        status_text: String,
    },

    /// Transport or decoding failure
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

/// Build the shared HTTP client. A zero `timeout` means no request timeout.
pub(crate) fn build_http_client(timeout: Duration) -> ClientResult<Client> {
    let mut builder = Client::builder();
    if !timeout.is_zero() {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Mark a request as uncacheable
pub(crate) fn no_store(request: RequestBuilder) -> RequestBuilder {
    request.header(header::CACHE_CONTROL, "no-store")
}

/// Turn a non-success response into [`ClientError::Status`]
pub(crate) fn ensure_success(response: Response, context: &'static str) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let status_text = status.canonical_reason().unwrap_or("Unknown Status").to_string();
    tracing::warn!(status = status.as_u16(), "{}: {}", context, status_text);

    Err(ClientError::Status {
        context,
        status: status.as_u16(),
        status_text,
    })
}


#[cfg(test)]
mod tests {
    use super::testing::spawn_fake_api;
    use super::*;
    use axum::{routing::get, Router};

    #[tokio::test]
    async fn test_zero_timeout_disables_timeout() {
        let router = Router::new().route("/ping", get(|| async { "pong" }));
        let base = spawn_fake_api(router).await;

        let client = build_http_client(Duration::ZERO).unwrap();
        let response = client.get(format!("{}/ping", base)).send().await.unwrap();
        let response = ensure_success(response, "Ping failed").unwrap();
        assert_eq!(response.text().await.unwrap(), "pong");
    }

    #[test]
    fn test_status_error_display() {
        let err = ClientError::Status {
            context: "Failed to fetch stats",
            status: 404,
            status_text: "Not Found".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to fetch stats: Not Found");
    }
}
