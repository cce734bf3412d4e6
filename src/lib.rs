//! # Botboard
//!
//! Presentation layer for a conversational analytics bot: a server-rendered
//! statistics dashboard and an embeddable chat assistant, both talking to the
//! bot's backend HTTP API.
//!
//! ## Features
//!
//! - **Dashboard**: metric cards and an activity timeline for 7 days, 30 days or 3 months
//! - **Chat assistant**: normal and admin modes, admin answers may carry the SQL they ran
//! - **Session identity**: a persisted per-client identifier that keys chat history
//! - **Localised formatting**: en-US number grouping, Russian chart date labels
//!
//! ## Modules
//!
//! - [`client`]: Stats and chat API clients
//! - [`session`]: Session identifier persistence
//! - [`format`]: Number, percent and date formatting
//! - [`chat`]: Chat widget state machine
//! - [`dashboard`]: Metric cards, timeline and page composition
//! - [`web`]: Axum service serving the dashboard
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use botboard::client::{Period, StatsClient};
//! use botboard::config::{Config, ExecutionContext};
//! use botboard::dashboard::DashboardPage;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env();
//!     let stats = StatsClient::from_config(&config.api, ExecutionContext::Client)?;
//!
//!     let page = DashboardPage::load(&stats, Period::ThirtyDays).await;
//!     println!("{}", page.render_text());
//!
//!     Ok(())
//! }
//! ```

pub mod chat;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod format;
pub mod session;
pub mod web;

// Re-export top-level types for convenience
pub use client::{
    ChatClient, ChatMode, ChatRequest, ChatResponse, ClientError, ClientResult, HistoryMessage,
    MetricCard, MetricsData, Period, Role, StatsClient, StatsResponse, TimelinePoint, Trend,
};

pub use session::{FileStore, KeyValueStore, MemoryStore, SessionError, SessionIdentity};

pub use format::{format_change, format_chart_date, format_number, format_percent};

pub use chat::{ChatBackend, ChatWidget, Message, SendOutcome, WidgetState};

pub use dashboard::{DashboardPage, MetricCardView, TimelineView};

pub use config::{Config, ConfigError, ExecutionContext};
