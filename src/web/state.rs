//! Application State
//!
//! Shared state accessible by all route handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, RwLock};

use crate::chat::ChatWidget;
use crate::client::{ChatClient, ChatMode, StatsClient};

/// A chat widget shared by the requests of one browser session
pub type SharedWidget = Arc<Mutex<ChatWidget<ChatClient>>>;

/// Chat widgets keyed by session id
#[derive(Debug)]
pub struct ChatSessions {
    client: ChatClient,
    // TODO: evict widgets of sessions idle for longer than the cookie lifetime
    widgets: RwLock<HashMap<String, SharedWidget>>,
}

impl ChatSessions {
    pub fn new(client: ChatClient) -> Self {
        Self {
            client,
            widgets: RwLock::new(HashMap::new()),
        }
    }

    /// Widget for `session_id`, created in normal mode on first use
    pub async fn widget(&self, session_id: &str) -> SharedWidget {
        if let Some(widget) = self.widgets.read().await.get(session_id) {
            return Arc::clone(widget);
        }

        let mut widgets = self.widgets.write().await;
        let widget = widgets.entry(session_id.to_string()).or_insert_with(|| {
            tracing::debug!(session_id = %session_id, "Opening chat widget");
            Arc::new(Mutex::new(ChatWidget::new(
                self.client.clone(),
                session_id,
                ChatMode::default(),
            )))
        });
        Arc::clone(widget)
    }

    pub async fn len(&self) -> usize {
        self.widgets.read().await.len()
    }
}

/// Shared application state for all handlers
#[derive(Debug)]
pub struct AppState {
    /// Stats client bound to the server-side API address
    pub stats: StatsClient,
    /// Chat widgets relayed through the server-side API address
    pub chats: ChatSessions,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(stats: StatsClient, chat: ChatClient) -> Self {
        Self {
            stats,
            chats: ChatSessions::new(chat),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
