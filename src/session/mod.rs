//! Chat Session Identity
//!
//! A per-client conversation identifier, created on first use and persisted
//! through a [`KeyValueStore`] so it survives restarts.
//!
//! Identifiers look like `session_<unix millis>_<base36 fragment>`. They are
//! only a correlation key for chat history, so collisions are avoided
//! probabilistically and nothing more.

mod store;

pub use store::{FileStore, KeyValueStore, MemoryStore};

use std::sync::Arc;
use thiserror::Error;

use crate::config::ExecutionContext;

/// Storage key holding the session identifier
pub const SESSION_KEY: &str = "chat_session_id";

/// Errors from session persistence
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Lock error: {0}")]
    Lock(String),
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::Serialization(err.to_string())
    }
}

/// Result type alias for session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Generate a fresh session identifier
pub fn generate_session_id() -> String {
    let timestamp = chrono::Utc::now().timestamp_millis();
    // Low 62 bits of a v4 UUID are all random
    let random = (uuid::Uuid::new_v4().as_u128() as u64) & ((1 << 62) - 1);
    format!("session_{}_{}", timestamp, to_base36(random))
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if value == 0 {
        return "0".to_string();
    }

    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

/// Get-or-create access to the session identifier
#[derive(Clone)]
pub struct SessionIdentity {
    /// `None` on the server path, where nothing is persisted
    store: Option<Arc<dyn KeyValueStore>>,
}

impl SessionIdentity {
    /// Client-side identity backed by `store`
    pub fn client(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store: Some(store) }
    }

    /// Server-side identity: every call fabricates a new identifier
    pub fn server() -> Self {
        Self { store: None }
    }

    pub fn context(&self) -> ExecutionContext {
        match self.store {
            Some(_) => ExecutionContext::Client,
            None => ExecutionContext::Server,
        }
    }

    /// Return the stored identifier, creating and storing one if absent
    pub fn get_session_id(&self) -> SessionResult<String> {
        let Some(store) = &self.store else {
            return Ok(generate_session_id());
        };

        if let Some(existing) = store.get(SESSION_KEY)? {
            if !existing.is_empty() {
                return Ok(existing);
            }
        }

        let session_id = generate_session_id();
        store.set(SESSION_KEY, &session_id)?;
        tracing::info!(session_id = %session_id, "Created chat session");
        Ok(session_id)
    }

    /// Drop the stored identifier and create a new one
    pub fn reset_session(&self) -> SessionResult<String> {
        if let Some(store) = &self.store {
            store.remove(SESSION_KEY)?;
            tracing::info!("Chat session reset");
        }
        self.get_session_id()
    }
}

impl std::fmt::Debug for SessionIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionIdentity")
            .field("context", &self.context())
            .finish()
    }
}
