// src/chat.rs
//! Chat widget state: transcript, in-flight guard and panel visibility

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

use crate::core::ServiceClient;
use crate::i18n::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Body of `POST /api/chat`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub history: Vec<ChatMessage>,
    pub lang: Language,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub reply: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Chat service failed: {0:#}")]
    Service(#[from] anyhow::Error),
}

#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, ChatError>;
}

pub struct HttpChatTransport {
    client: Arc<ServiceClient>,
    endpoint: String,
}

impl HttpChatTransport {
    pub fn new(client: Arc<ServiceClient>, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl ChatTransport for HttpChatTransport {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, ChatError> {
        Ok(self.client.post_json(&self.endpoint, request).await?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Input was empty after trimming; nothing happened.
    Rejected,
    /// Another send is in flight; nothing happened.
    Busy,
    Replied,
    /// The request failed and the localized placeholder was appended.
    Failed,
}

/// Clears the in-flight flag on every exit path of `send`.
struct LoadingGuard<'a>(&'a AtomicBool);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// One visitor's conversation.
#[derive(Debug, Default)]
pub struct ChatSession {
    transcript: Mutex<Vec<ChatMessage>>,
    loading: AtomicBool,
    open: AtomicBool,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    fn messages(&self) -> MutexGuard<'_, Vec<ChatMessage>> {
        self.transcript.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.messages().clone()
    }

    pub fn len(&self) -> usize {
        self.messages().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages().is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    pub fn toggle(&self) -> bool {
        !self.open.fetch_xor(true, Ordering::AcqRel)
    }

    pub fn close(&self) {
        self.open.store(false, Ordering::Release);
    }

    /// Global key handler; Escape closes the panel. Returns whether the key was
    /// handled.
    pub fn handle_key(&self, key: &str) -> bool {
        if key == "Escape" {
            self.close();
            true
        } else {
            false
        }
    }

    /// Sends `input` with the full transcript as history.
    ///
    /// Every accepted send appends exactly one user and one assistant message,
    /// in that order. Transport failures become the localized placeholder for
    /// `language` and are never returned to the caller.
    pub async fn send(
        &self,
        transport: &dyn ChatTransport,
        input: &str,
        language: Language,
    ) -> SendOutcome {
        let message = input.trim();
        if message.is_empty() {
            return SendOutcome::Rejected;
        }

        if self
            .loading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Ignoring chat message while a reply is pending");
            return SendOutcome::Busy;
        }
        let _loading = LoadingGuard(&self.loading);

        let history = {
            let mut transcript = self.messages();
            transcript.push(ChatMessage::user(message));
            transcript.clone()
        };

        let request = ChatRequest {
            message: message.to_string(),
            history,
            lang: language,
        };

        let (reply, outcome) = match transport.send(&request).await {
            Ok(reply) => (reply.reply.unwrap_or_default(), SendOutcome::Replied),
            Err(e) => {
                warn!("{}", e);
                (
                    language.texts().chat_unreachable.to_string(),
                    SendOutcome::Failed,
                )
            }
        };

        self.messages().push(ChatMessage::assistant(reply));
        outcome
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::service_client::tests::serve_canned;
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    /// Answers from a script and records every request.
    #[derive(Default)]
    pub(crate) struct ScriptedTransport {
        script: Mutex<VecDeque<Option<Option<String>>>>,
        pub requests: Mutex<Vec<ChatRequest>>,
    }

    impl ScriptedTransport {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn reply(self, text: &str) -> Self {
            self.push(Some(Some(text.to_string())))
        }

        pub(crate) fn reply_without_text(self) -> Self {
            self.push(Some(None))
        }

        pub(crate) fn fail(self) -> Self {
            self.push(None)
        }

        fn push(self, step: Option<Option<String>>) -> Self {
            self.script.lock().unwrap().push_back(step);
            self
        }

        pub(crate) fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ChatTransport for ScriptedTransport {
        async fn send(&self, request: &ChatRequest) -> Result<ChatReply, ChatError> {
            self.requests.lock().unwrap().push(request.clone());
            match self.script.lock().unwrap().pop_front() {
                Some(Some(reply)) => Ok(ChatReply { reply }),
                Some(None) | None => Err(anyhow::anyhow!("connection refused").into()),
            }
        }
    }

    /// Holds every request until released.
    struct GatedTransport {
        calls: AtomicUsize,
        release: Notify,
    }

    #[async_trait]
    impl ChatTransport for GatedTransport {
        async fn send(&self, _request: &ChatRequest) -> Result<ChatReply, ChatError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.release.notified().await;
            Ok(ChatReply {
                reply: Some("done".to_string()),
            })
        }
    }

    #[tokio::test]
    async fn test_blank_input_is_rejected_without_a_request() {
        let session = ChatSession::new();
        let transport = ScriptedTransport::new().reply("unused");

        for input in ["", "   ", "\n\t"] {
            assert_eq!(
                session.send(&transport, input, Language::En).await,
                SendOutcome::Rejected
            );
        }
        assert!(session.is_empty());
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_request_carries_trimmed_message_and_full_history() {
        let session = ChatSession::new();
        let transport = ScriptedTransport::new().reply("first answer").reply("second answer");

        session.send(&transport, "  hello  ", Language::Tr).await;
        session.send(&transport, "projects?", Language::En).await;

        let requests = transport.requests.lock().unwrap();
        assert_eq!(requests[0].message, "hello");
        assert_eq!(requests[0].history, vec![ChatMessage::user("hello")]);
        assert_eq!(requests[0].lang, Language::Tr);

        assert_eq!(
            requests[1].history,
            vec![
                ChatMessage::user("hello"),
                ChatMessage::assistant("first answer"),
                ChatMessage::user("projects?"),
            ]
        );
        assert_eq!(requests[1].lang, Language::En);
    }

    #[tokio::test]
    async fn test_transcript_grows_by_two_per_send_in_order() {
        let session = ChatSession::new();
        let transport = ScriptedTransport::new()
            .reply("a1")
            .fail()
            .reply_without_text()
            .fail()
            .reply("a5");

        let mut outcomes = Vec::new();
        for i in 1..=5 {
            outcomes.push(session.send(&transport, &format!("q{}", i), Language::En).await);
        }

        assert_eq!(
            outcomes,
            vec![
                SendOutcome::Replied,
                SendOutcome::Failed,
                SendOutcome::Replied,
                SendOutcome::Failed,
                SendOutcome::Replied,
            ]
        );

        let transcript = session.transcript();
        assert_eq!(transcript.len(), 10);
        for (i, pair) in transcript.chunks(2).enumerate() {
            assert_eq!(pair[0], ChatMessage::user(format!("q{}", i + 1)));
            assert_eq!(pair[1].role, Role::Assistant);
        }
        assert_eq!(transcript[1].content, "a1");
        assert_eq!(transcript[3].content, Language::En.texts().chat_unreachable);
        assert_eq!(transcript[5].content, "");
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn test_failure_placeholder_follows_send_language() {
        let session = ChatSession::new();
        let transport = ScriptedTransport::new().fail();

        assert_eq!(
            session.send(&transport, "merhaba", Language::Tr).await,
            SendOutcome::Failed
        );
        let last = session.transcript().pop().unwrap();
        assert_eq!(last, ChatMessage::assistant("⚠️ Yanıt alınamadı. Sunucu çalışıyor mu?"));
    }

    #[tokio::test]
    async fn test_send_while_in_flight_is_ignored() {
        let session = Arc::new(ChatSession::new());
        let transport = Arc::new(GatedTransport {
            calls: AtomicUsize::new(0),
            release: Notify::new(),
        });

        let first = {
            let session = session.clone();
            let transport = transport.clone();
            tokio::spawn(async move {
                session
                    .send(transport.as_ref(), "first", Language::En)
                    .await
            })
        };

        while transport.calls.load(Ordering::SeqCst) == 0 {
            tokio::task::yield_now().await;
        }
        assert!(session.is_loading());

        assert_eq!(
            session.send(transport.as_ref(), "second", Language::En).await,
            SendOutcome::Busy
        );
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
        assert_eq!(session.transcript(), vec![ChatMessage::user("first")]);

        transport.release.notify_one();
        assert_eq!(first.await.unwrap(), SendOutcome::Replied);
        assert_eq!(session.len(), 2);
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn test_unreachable_chat_service_appends_placeholder() {
        let client = Arc::new(ServiceClient::new("http://127.0.0.1:9", None).unwrap());
        let transport = HttpChatTransport::new(client, "/api/chat");
        let session = ChatSession::new();

        assert_eq!(
            session.send(&transport, "hello?", Language::En).await,
            SendOutcome::Failed
        );
        let last = session.transcript().pop().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(last.content, "⚠️ Could not get a response. Is the server running?");
    }

    #[tokio::test]
    async fn test_non_json_chat_body_appends_placeholder() {
        for (status, body) in [
            ("200 OK", "<html>gateway</html>"),
            ("502 Bad Gateway", "upstream down"),
        ] {
            let base = serve_canned(status, "text/html", body).await;
            let client = Arc::new(ServiceClient::new(base, None).unwrap());
            let transport = HttpChatTransport::new(client, "/api/chat");
            let session = ChatSession::new();

            assert_eq!(
                session.send(&transport, "merhaba", Language::Tr).await,
                SendOutcome::Failed
            );
            let last = session.transcript().pop().unwrap();
            assert_eq!(last, ChatMessage::assistant(Language::Tr.texts().chat_unreachable));
        }
    }

    #[tokio::test]
    async fn test_http_reply_is_appended() {
        let base = serve_canned("200 OK", "application/json", r#"{"reply": "Merhaba!"}"#).await;
        let client = Arc::new(ServiceClient::new(base, None).unwrap());
        let transport = HttpChatTransport::new(client, "/api/chat");
        let session = ChatSession::new();

        assert_eq!(
            session.send(&transport, "selam", Language::Tr).await,
            SendOutcome::Replied
        );
        assert_eq!(session.transcript().pop().unwrap(), ChatMessage::assistant("Merhaba!"));
    }

    #[test]
    fn test_panel_visibility() {
        let session = ChatSession::new();
        assert!(!session.is_open());
        assert!(session.toggle());
        assert!(session.is_open());
        assert!(!session.handle_key("Enter"));
        assert!(session.is_open());
        assert!(session.handle_key("Escape"));
        assert!(!session.is_open());
        session.toggle();
        session.close();
        assert!(!session.is_open());
    }

    #[test]
    fn test_request_wire_format() {
        let request = ChatRequest {
            message: "hi".to_string(),
            history: vec![ChatMessage::user("hi")],
            lang: Language::Tr,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "message": "hi",
                "history": [{"role": "user", "content": "hi"}],
                "lang": "tr"
            })
        );

        let reply: ChatReply = serde_json::from_str(r#"{"reply": null}"#).unwrap();
        assert!(reply.reply.is_none());
        let reply: ChatReply = serde_json::from_str("{}").unwrap();
        assert!(reply.reply.is_none());
    }
}
