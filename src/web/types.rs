// src/web/types.rs

use rocket::form::FromForm;
use rocket::http::{Cookie, CookieJar, SameSite};
use rocket::serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::chat::{ChatSession, ChatTransport};
use crate::core::LoadOutcome;
use crate::preferences::{KeyValueStore, PreferenceError};
use crate::render::SiteProfile;

pub const SESSION_COOKIE: &str = "sid";

/// Preferences live in the visitor's cookies, the browser-side counterpart of
/// local storage.
pub struct CookieStore<'a> {
    jar: &'a CookieJar<'a>,
}

impl<'a> CookieStore<'a> {
    pub fn new(jar: &'a CookieJar<'a>) -> Self {
        Self { jar }
    }
}

impl KeyValueStore for CookieStore<'_> {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        Ok(self.jar.get_pending(key).map(|c| c.value().to_string()))
    }

    fn set(&self, key: &str, value: String) -> Result<(), PreferenceError> {
        self.jar.add(
            Cookie::build((key.to_string(), value))
                .path("/")
                .same_site(SameSite::Lax)
                .permanent(),
        );
        Ok(())
    }
}

/// Sessions idle this long are dropped on the next session creation.
pub const SESSION_IDLE_TIMEOUT: Duration = Duration::from_secs(24 * 60 * 60);

struct SessionEntry {
    session: Arc<ChatSession>,
    last_seen: Instant,
}

/// Chat sessions keyed by the visitor's session cookie.
pub struct ChatSessions {
    sessions: RwLock<HashMap<Uuid, SessionEntry>>,
    idle_timeout: Duration,
}

impl Default for ChatSessions {
    fn default() -> Self {
        Self::with_idle_timeout(SESSION_IDLE_TIMEOUT)
    }
}

impl ChatSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_idle_timeout(idle_timeout: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_timeout,
        }
    }

    /// The visitor's existing session, if any. Never creates one.
    pub async fn find(&self, jar: &CookieJar<'_>) -> Option<Arc<ChatSession>> {
        let id = session_id(jar)?;
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&id)?;
        if entry.last_seen.elapsed() >= self.idle_timeout {
            sessions.remove(&id);
            return None;
        }
        entry.last_seen = Instant::now();
        Some(entry.session.clone())
    }

    /// The visitor's session, created under a freshly minted id when the cookie
    /// is missing or names no live session.
    pub async fn for_visitor(&self, jar: &CookieJar<'_>) -> Arc<ChatSession> {
        if let Some(session) = self.find(jar).await {
            return session;
        }

        let id = Uuid::new_v4();
        let session = Arc::new(ChatSession::new());
        {
            let mut sessions = self.sessions.write().await;
            let before = sessions.len();
            sessions.retain(|_, entry| entry.last_seen.elapsed() < self.idle_timeout);
            if sessions.len() < before {
                debug!("Expired {} idle chat sessions", before - sessions.len());
            }
            sessions.insert(
                id,
                SessionEntry {
                    session: session.clone(),
                    last_seen: Instant::now(),
                },
            );
        }

        debug!("Starting chat session {}", id);
        jar.add(
            Cookie::build((SESSION_COOKIE, id.to_string()))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax),
        );
        session
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

fn session_id(jar: &CookieJar<'_>) -> Option<Uuid> {
    jar.get_pending(SESSION_COOKIE)
        .and_then(|c| Uuid::parse_str(c.value()).ok())
}

/// Shared host state.
pub struct PortfolioState {
    /// `None` until the startup load resolves.
    pub cv: Arc<RwLock<Option<LoadOutcome>>>,
    pub sessions: ChatSessions,
    pub transport: Arc<dyn ChatTransport>,
    pub site: SiteProfile,
}

impl PortfolioState {
    pub fn new(transport: Arc<dyn ChatTransport>, site: SiteProfile) -> Self {
        Self {
            cv: Arc::new(RwLock::new(None)),
            sessions: ChatSessions::new(),
            transport,
            site,
        }
    }
}

#[derive(FromForm)]
pub struct ChatSendForm {
    pub message: String,
}

#[derive(FromForm)]
pub struct ChatKeyForm {
    pub key: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub error_code: String,
}

impl ErrorResponse {
    pub fn new(error: &str, error_code: &str) -> Self {
        Self {
            success: false,
            error: error.to_string(),
            error_code: error_code.to_string(),
        }
    }
}
