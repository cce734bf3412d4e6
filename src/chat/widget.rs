use crate::client::models::{ChatMode, ChatRequest, ChatResponse};
use crate::client::ClientResult;

use super::{ChatBackend, Message, WidgetState, APOLOGY_MESSAGE, SEND_ERROR_BANNER};

/// A submitted message waiting for its response.
///
/// Produced by [`ChatWidget::begin_send`] and consumed by
/// [`ChatWidget::complete_send`].
#[derive(Debug)]
pub struct PendingSend {
    request: ChatRequest,
    generation: u64,
}

impl PendingSend {
    pub fn request(&self) -> &ChatRequest {
        &self.request
    }
}

/// What a send attempt ended with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Input was blank or a send was already in flight; nothing changed
    Rejected,
    /// The AI answer was appended
    Delivered,
    /// The request failed; banner set and apology appended
    Failed,
    /// The mode changed while the request was in flight; the answer was dropped
    Discarded,
}

/// Conversational widget state
#[derive(Debug)]
pub struct ChatWidget<B> {
    backend: B,
    session_id: String,
    mode: ChatMode,
    transcript: Vec<Message>,
    input: String,
    state: WidgetState,
    generation: u64,
}

impl<B: ChatBackend> ChatWidget<B> {
    /// Create a widget showing the greeting for `mode`
    pub fn new(backend: B, session_id: impl Into<String>, mode: ChatMode) -> Self {
        Self {
            backend,
            session_id: session_id.into(),
            mode,
            transcript: vec![Message::greeting(mode)],
            input: String::new(),
            state: WidgetState::Idle,
            generation: 0,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Point the widget at another session (e.g. after a reset)
    pub fn set_session_id(&mut self, session_id: impl Into<String>) {
        self.session_id = session_id.into();
    }

    pub fn mode(&self) -> ChatMode {
        self.mode
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn state(&self) -> &WidgetState {
        &self.state
    }

    /// Whether the typing indicator is shown
    pub fn is_typing(&self) -> bool {
        self.state == WidgetState::Sending
    }

    /// Banner text after a failed send
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            WidgetState::Error(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Whether a submit would be accepted
    pub fn can_submit(&self) -> bool {
        !self.is_typing() && !self.input.trim().is_empty()
    }

    /// Switch mode and restart the transcript with that mode's greeting.
    ///
    /// Allowed in any state. Setting the current mode again is a no-op. An
    /// in-flight request is not cancelled, but its response will be discarded.
    pub fn set_mode(&mut self, mode: ChatMode) {
        if mode == self.mode {
            return;
        }
        self.mode = mode;
        self.reset_transcript();
        tracing::debug!(mode = %mode, generation = self.generation, "Chat mode changed");
    }

    /// Start over with just the greeting for the current mode. A response
    /// still in flight is discarded when it arrives.
    pub fn reset_transcript(&mut self) {
        self.generation += 1;
        self.transcript = vec![Message::greeting(self.mode)];
    }

    pub fn toggle_mode(&mut self) {
        self.set_mode(self.mode.toggled());
    }

    /// The SQL to display for `message`, shown only in admin mode
    pub fn diagnostic_query<'a>(&self, message: &'a Message) -> Option<&'a str> {
        match self.mode {
            ChatMode::Admin => message.sql_query.as_deref(),
            ChatMode::Normal => None,
        }
    }

    /// Accept the current input: append it, clear input and error, enter
    /// `Sending`. Returns `None` (and changes nothing) when the submit is
    /// rejected.
    pub fn begin_send(&mut self) -> Option<PendingSend> {
        if !self.can_submit() {
            return None;
        }

        let text = std::mem::take(&mut self.input);
        self.transcript.push(Message::user(text.clone()));
        self.state = WidgetState::Sending;

        Some(PendingSend {
            request: ChatRequest {
                message: text,
                mode: self.mode,
                session_id: self.session_id.clone(),
            },
            generation: self.generation,
        })
    }

    /// Apply the result of a request started by [`begin_send`](Self::begin_send)
    pub fn complete_send(
        &mut self,
        pending: PendingSend,
        result: ClientResult<ChatResponse>,
    ) -> SendOutcome {
        if pending.generation != self.generation {
            tracing::debug!(
                requested = pending.generation,
                current = self.generation,
                "Dropping chat response from before a mode change"
            );
            if self.is_typing() {
                self.state = WidgetState::Idle;
            }
            return SendOutcome::Discarded;
        }

        match result {
            Ok(response) => {
                self.transcript.push(Message {
                    sql_query: response.sql_query,
                    ..Message::ai(response.message)
                });
                self.state = WidgetState::Idle;
                SendOutcome::Delivered
            }
            Err(e) => {
                tracing::error!(error = %e, session_id = %self.session_id, "Chat error");
                self.state = WidgetState::Error(SEND_ERROR_BANNER.to_string());
                self.transcript.push(Message::ai(APOLOGY_MESSAGE));
                SendOutcome::Failed
            }
        }
    }

    /// Submit the current input and wait for the answer
    pub async fn send(&mut self) -> SendOutcome {
        let Some(pending) = self.begin_send() else {
            return SendOutcome::Rejected;
        };
        let result = self.backend.send_message(pending.request()).await;
        self.complete_send(pending, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{Sender, ADMIN_GREETING, NORMAL_GREETING};
    use crate::client::ClientError;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Backend answering from a script and recording what it was sent
    #[derive(Default)]
    struct ScriptedBackend {
        replies: Mutex<VecDeque<ClientResult<ChatResponse>>>,
        seen: Mutex<Vec<ChatRequest>>,
    }

    impl ScriptedBackend {
        fn replying(replies: Vec<ClientResult<ChatResponse>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                seen: Mutex::default(),
            }
        }
    }

    #[async_trait]
    impl ChatBackend for ScriptedBackend {
        async fn send_message(&self, request: &ChatRequest) -> ClientResult<ChatResponse> {
            self.seen.lock().unwrap().push(request.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .expect("no scripted reply left")
        }
    }

    fn reply(text: &str, sql: Option<&str>, mode: ChatMode) -> ClientResult<ChatResponse> {
        Ok(ChatResponse {
            message: text.to_string(),
            sql_query: sql.map(str::to_string),
            mode,
        })
    }

    fn failure() -> ClientResult<ChatResponse> {
        Err(ClientError::Status {
            context: "Failed to send message",
            status: 500,
            status_text: "Internal Server Error".to_string(),
        })
    }

    fn widget(replies: Vec<ClientResult<ChatResponse>>) -> ChatWidget<ScriptedBackend> {
        ChatWidget::new(
            ScriptedBackend::replying(replies),
            "session_1_abc",
            ChatMode::Normal,
        )
    }

    #[test]
    fn test_starts_with_greeting() {
        let w = widget(vec![]);
        assert_eq!(w.transcript(), &[Message::ai(NORMAL_GREETING)]);
        assert_eq!(w.state(), &WidgetState::Idle);

        let admin = ChatWidget::new(ScriptedBackend::default(), "s", ChatMode::Admin);
        assert_eq!(admin.transcript()[0].text, ADMIN_GREETING);
    }

    #[tokio::test]
    async fn test_greeting_scenario() {
        let mut w = widget(vec![reply("Привет! Чем помогу?", None, ChatMode::Normal)]);
        w.set_input("Привет");

        assert_eq!(w.send().await, SendOutcome::Delivered);
        assert_eq!(
            w.transcript(),
            &[
                Message::ai(NORMAL_GREETING),
                Message::user("Привет"),
                Message::ai("Привет! Чем помогу?"),
            ]
        );
        assert_eq!(w.state(), &WidgetState::Idle);
        assert_eq!(w.input(), "");

        let seen = w.backend().seen.lock().unwrap();
        assert_eq!(seen[0].session_id, "session_1_abc");
        assert_eq!(seen[0].mode, ChatMode::Normal);
    }

    #[tokio::test]
    async fn test_blank_input_rejected() {
        let mut w = widget(vec![]);
        for blank in ["", "   ", "\n\t"] {
            w.set_input(blank);
            assert!(!w.can_submit());
            assert_eq!(w.send().await, SendOutcome::Rejected);
            assert_eq!(w.transcript().len(), 1);
        }
        assert!(w.backend().seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_submit_rejected_while_sending() {
        let mut w = widget(vec![]);
        w.set_input("первое");
        let pending = w.begin_send().unwrap();
        assert!(w.is_typing());

        w.set_input("второе");
        assert!(w.begin_send().is_none());
        assert_eq!(w.transcript().len(), 2);
        assert_eq!(w.input(), "второе");

        w.complete_send(pending, reply("ok", None, ChatMode::Normal));
        assert!(w.can_submit());
    }

    #[tokio::test]
    async fn test_failed_send() {
        let mut w = widget(vec![failure()]);
        w.set_input("Сколько сообщений?");

        assert_eq!(w.send().await, SendOutcome::Failed);
        assert_eq!(w.transcript().len(), 3);
        assert_eq!(w.transcript()[1], Message::user("Сколько сообщений?"));
        assert_eq!(w.transcript()[2], Message::ai(APOLOGY_MESSAGE));
        assert_eq!(w.error(), Some(SEND_ERROR_BANNER));
        assert!(!w.is_typing());
    }

    #[tokio::test]
    async fn test_next_submit_clears_error() {
        let mut w = widget(vec![failure(), reply("готово", None, ChatMode::Normal)]);
        w.set_input("раз");
        w.send().await;
        assert!(w.error().is_some());

        w.set_input("два");
        let pending = w.begin_send().unwrap();
        assert_eq!(w.error(), None);
        assert_eq!(w.state(), &WidgetState::Sending);

        let result = w.backend().send_message(pending.request()).await;
        assert_eq!(w.complete_send(pending, result), SendOutcome::Delivered);
        assert_eq!(w.transcript().len(), 5);
    }

    #[tokio::test]
    async fn test_toggle_resets_transcript() {
        let mut w = widget(vec![reply("a", None, ChatMode::Normal)]);
        w.set_input("q");
        w.send().await;
        assert_eq!(w.transcript().len(), 3);

        w.toggle_mode();
        assert_eq!(w.mode(), ChatMode::Admin);
        assert_eq!(w.transcript(), &[Message::ai(ADMIN_GREETING)]);

        w.toggle_mode();
        assert_eq!(w.transcript(), &[Message::ai(NORMAL_GREETING)]);
    }

    #[tokio::test]
    async fn test_setting_current_mode_keeps_transcript() {
        let mut w = widget(vec![reply("a", None, ChatMode::Normal)]);
        w.set_input("q");
        w.send().await;

        w.set_mode(ChatMode::Normal);
        assert_eq!(w.transcript().len(), 3);
        assert_eq!(w.mode(), ChatMode::Normal);
    }

    #[test]
    fn test_reset_transcript_discards_in_flight_answer() {
        let mut w = widget(vec![]);
        w.set_input("вопрос");
        let pending = w.begin_send().unwrap();

        w.reset_transcript();
        assert_eq!(w.transcript(), &[Message::ai(NORMAL_GREETING)]);

        let outcome = w.complete_send(pending, reply("поздно", None, ChatMode::Normal));
        assert_eq!(outcome, SendOutcome::Discarded);
        assert_eq!(w.transcript().len(), 1);
        assert_eq!(w.state(), &WidgetState::Idle);
    }

    #[tokio::test]
    async fn test_sql_shown_only_in_admin_mode() {
        let mut w = widget(vec![reply(
            "Всего 42 сообщения",
            Some("SELECT COUNT(*) FROM messages"),
            ChatMode::Admin,
        )]);
        w.set_mode(ChatMode::Admin);
        w.set_input("Сколько сообщений?");
        w.send().await;

        let answer = w.transcript().last().unwrap().clone();
        assert_eq!(answer.sender, Sender::Ai);
        assert_eq!(
            w.diagnostic_query(&answer),
            Some("SELECT COUNT(*) FROM messages")
        );

        w.set_mode(ChatMode::Normal);
        assert_eq!(w.diagnostic_query(&answer), None);
    }

    #[test]
    fn test_stale_response_discarded_after_mode_change() {
        let mut w = widget(vec![]);
        w.set_input("вопрос");
        let pending = w.begin_send().unwrap();

        w.toggle_mode();
        assert!(w.is_typing(), "toggle does not cancel the in-flight send");

        let outcome = w.complete_send(pending, reply("старый ответ", None, ChatMode::Normal));
        assert_eq!(outcome, SendOutcome::Discarded);
        assert_eq!(w.transcript(), &[Message::ai(ADMIN_GREETING)]);
        assert_eq!(w.state(), &WidgetState::Idle);
    }

    #[test]
    fn test_stale_failure_does_not_set_error() {
        let mut w = widget(vec![]);
        w.set_input("вопрос");
        let pending = w.begin_send().unwrap();
        w.set_mode(ChatMode::Admin);

        assert_eq!(w.complete_send(pending, failure()), SendOutcome::Discarded);
        assert_eq!(w.error(), None);
        assert_eq!(w.transcript().len(), 1);
    }

    #[test]
    fn test_session_id_used_in_requests() {
        let mut w = widget(vec![]);
        w.set_session_id("session_2_xyz");
        w.set_input("привет");
        let pending = w.begin_send().unwrap();
        assert_eq!(pending.request().session_id, "session_2_xyz");
        assert_eq!(pending.request().message, "привет");
    }
}
