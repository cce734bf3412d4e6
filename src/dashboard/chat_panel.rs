//! Chat Panel View
//!
//! The assistant as a server-rendered panel: transcript, mode switch, error
//! banner and message form. Admin-mode answers show their SQL in a
//! collapsible block.

use maud::{html, Markup};

use super::layout;
use crate::chat::{ChatBackend, ChatWidget, Message, Sender};
use crate::client::models::ChatMode;

/// Form endpoints the panel posts to
pub const CHAT_MESSAGE_PATH: &str = "/chat/message";
pub const CHAT_MODE_PATH: &str = "/chat/mode";
pub const CHAT_RESET_PATH: &str = "/chat/reset";

fn mode_badge(mode: ChatMode) -> &'static str {
    match mode {
        ChatMode::Admin => "🔧 Админ",
        ChatMode::Normal => "💬 Обычный",
    }
}

fn render_message<B: ChatBackend>(widget: &ChatWidget<B>, message: &Message) -> Markup {
    let class = match message.sender {
        Sender::Ai => "bubble bubble-ai",
        Sender::User => "bubble bubble-user",
    };

    html! {
        div class=(class) {
            p { (message.text) }
            @if let Some(sql) = widget.diagnostic_query(message) {
                details class="sql" {
                    summary { "SQL запрос" }
                    pre { code { (sql) } }
                }
            }
        }
    }
}

/// The panel alone
pub fn render_chat_panel<B: ChatBackend>(widget: &ChatWidget<B>) -> Markup {
    html! {
        div class="card chat-panel" {
            div class="card-header" {
                h2 class="card-title" { "AI Ассистент" }
                div class="chat-actions" {
                    form method="post" action=(CHAT_MODE_PATH) {
                        button class="tab active" type="submit" title="Переключить режим" {
                            (mode_badge(widget.mode()))
                        }
                    }
                    form method="post" action=(CHAT_RESET_PATH) {
                        button class="tab" type="submit" title="Новый диалог" { "↺" }
                    }
                }
            }
            div class="chat-transcript" {
                @for message in widget.transcript() {
                    (render_message(widget, message))
                }
            }
            @if let Some(error) = widget.error() {
                div class="error-banner" { (error) }
            }
            form class="chat-input" method="post" action=(CHAT_MESSAGE_PATH) {
                input type="text" name="message" placeholder="Напишите сообщение..."
                    autocomplete="off" autofocus;
                button class="tab active" type="submit" { "Отправить" }
            }
        }
    }
}

/// Complete chat page
pub fn render_chat_page<B: ChatBackend>(widget: &ChatWidget<B>) -> Markup {
    layout("AI Ассистент", render_chat_panel(widget))
}
