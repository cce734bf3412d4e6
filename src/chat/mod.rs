//! Chat Widget
//!
//! The conversational widget's model: transcript, typing indicator,
//! mode toggle and error banner, driven as an explicit state machine.
//!
//! ```text
//!            submit                  response
//!   Idle ─────────────▶ Sending ─────────────────▶ Idle
//!    ▲                     │
//!    │     submit          │ failure
//!    └──── Error(reason) ◀─┘
//! ```
//!
//! Changing the mode replaces the transcript with a single greeting and
//! bumps a generation counter; a response that was requested under an older
//! generation is dropped instead of being appended.

mod widget;

pub use widget::{ChatWidget, PendingSend, SendOutcome};

use async_trait::async_trait;

use crate::client::models::{ChatMode, ChatRequest, ChatResponse};
use crate::client::ClientResult;

/// Greeting shown first in normal mode
pub const NORMAL_GREETING: &str = "👋 Привет! Я ваш AI-ассистент.";

/// Greeting shown first in admin mode
pub const ADMIN_GREETING: &str = "👋 Здравствуйте! Я помогу вам с вопросами по статистике диалогов.";

/// Banner shown after a failed send
pub const SEND_ERROR_BANNER: &str = "Произошла ошибка при отправке сообщения";

/// Message appended to the transcript after a failed send
pub const APOLOGY_MESSAGE: &str = "Извините, произошла ошибка. Попробуйте еще раз.";

/// Something that answers chat messages
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn send_message(&self, request: &ChatRequest) -> ClientResult<ChatResponse>;
}

/// Who wrote a transcript message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    Ai,
    User,
}

/// One entry of the in-memory transcript
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
    /// SQL the backend ran to answer, if any
    pub sql_query: Option<String>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            sql_query: None,
        }
    }

    pub fn ai(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Ai,
            text: text.into(),
            sql_query: None,
        }
    }

    /// The greeting that opens a transcript in `mode`
    pub fn greeting(mode: ChatMode) -> Self {
        Self::ai(greeting_text(mode))
    }
}

pub fn greeting_text(mode: ChatMode) -> &'static str {
    match mode {
        ChatMode::Normal => NORMAL_GREETING,
        ChatMode::Admin => ADMIN_GREETING,
    }
}

/// Lifecycle state of the widget
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WidgetState {
    /// Awaiting input
    #[default]
    Idle,
    /// A request is in flight; input is disabled and the typing indicator shown
    Sending,
    /// The last send failed; the banner text is kept until the next submit
    Error(String),
}
