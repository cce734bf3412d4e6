//! Chat Routes
//!
//! - GET /chat - Assistant panel for the browser's session
//! - POST /chat/message - Send the `message` form field
//! - POST /chat/mode - Toggle normal/admin mode
//! - POST /chat/reset - Start over with a new session
//!
//! The session id lives in the `chat_session_id` cookie and is issued on the
//! first request that lacks it.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Redirect},
    Form,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use maud::Markup;
use serde::Deserialize;
use std::sync::Arc;

use crate::dashboard::render_chat_page;
use crate::session::{generate_session_id, SESSION_KEY};
use crate::web::state::AppState;

/// Body of POST /chat/message
#[derive(Debug, Deserialize)]
pub struct MessageForm {
    #[serde(default)]
    pub message: String,
}

fn session_cookie(session_id: String) -> Cookie<'static> {
    Cookie::build((SESSION_KEY, session_id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Session id from the cookie, issuing a new one when missing
fn ensure_session(jar: CookieJar) -> (CookieJar, String) {
    let existing = jar
        .get(SESSION_KEY)
        .map(|cookie| cookie.value().to_string())
        .filter(|id| !id.is_empty());

    match existing {
        Some(session_id) => (jar, session_id),
        None => {
            let session_id = generate_session_id();
            tracing::info!(session_id = %session_id, "Created chat session");
            (jar.add(session_cookie(session_id.clone())), session_id)
        }
    }
}

fn page_response(jar: CookieJar, page: Markup) -> impl IntoResponse {
    (jar, [(header::CACHE_CONTROL, "no-store")], page)
}

/// GET /chat
pub async fn chat_page(State(state): State<Arc<AppState>>, jar: CookieJar) -> impl IntoResponse {
    let (jar, session_id) = ensure_session(jar);
    let shared = state.chats.widget(&session_id).await;
    let widget = shared.lock().await;
    page_response(jar, render_chat_page(&*widget))
}

/// POST /chat/message
///
/// Answers with the updated panel. A blank message leaves it unchanged.
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<MessageForm>,
) -> impl IntoResponse {
    let (jar, session_id) = ensure_session(jar);
    let shared = state.chats.widget(&session_id).await;
    let mut widget = shared.lock().await;

    widget.set_input(form.message);
    let outcome = widget.send().await;
    tracing::debug!(?outcome, session_id = %session_id, "Chat message handled");

    page_response(jar, render_chat_page(&*widget))
}

/// POST /chat/mode
pub async fn toggle_mode(State(state): State<Arc<AppState>>, jar: CookieJar) -> impl IntoResponse {
    let (jar, session_id) = ensure_session(jar);
    let shared = state.chats.widget(&session_id).await;
    shared.lock().await.toggle_mode();
    (jar, Redirect::to("/chat"))
}

/// POST /chat/reset
pub async fn reset_session(jar: CookieJar) -> impl IntoResponse {
    let session_id = generate_session_id();
    tracing::info!(session_id = %session_id, "Chat session reset");
    (jar.add(session_cookie(session_id)), Redirect::to("/chat"))
}
