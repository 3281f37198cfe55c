// src/web/handlers.rs
use crate::app_state::AppState;
use crate::chat::{ChatMessage, SendOutcome};
use crate::core::LoadOutcome;
use crate::i18n::{Language, Theme};
use crate::render::render_page;
use crate::web::types::*;

use rocket::form::Form;
use rocket::http::{CookieJar, Status};
use rocket::response::content::RawHtml;
use rocket::response::Redirect;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{debug, info, warn};

/// Visitors who never used the chat get an empty, unstored session.
async fn visitor_state<'a>(
    jar: &'a CookieJar<'a>,
    state: &PortfolioState,
) -> AppState<CookieStore<'a>> {
    let chat = state.sessions.find(jar).await.unwrap_or_default();
    AppState::restore(CookieStore::new(jar), chat)
}

pub async fn index_handler(
    jar: &CookieJar<'_>,
    state: &State<PortfolioState>,
) -> RawHtml<String> {
    let cv = state.cv.read().await;
    let document = cv.as_ref().and_then(LoadOutcome::document);
    if cv.is_none() {
        debug!("CV still loading, rendering without a document");
    }

    let app = visitor_state(jar, state).await;
    RawHtml(render_page(&app.view(document, &state.site)))
}

pub async fn set_language_handler(
    code: &str,
    jar: &CookieJar<'_>,
    state: &State<PortfolioState>,
) -> Result<Redirect, Status> {
    let language: Language = code.parse().map_err(|e| {
        warn!("{}", e);
        Status::NotFound
    })?;

    let mut app = visitor_state(jar, state).await;
    app.set_language(language);
    Ok(Redirect::to("/"))
}

pub async fn set_theme_handler(
    name: &str,
    jar: &CookieJar<'_>,
    state: &State<PortfolioState>,
) -> Result<Redirect, Status> {
    let theme: Theme = name.parse().map_err(|e| {
        warn!("{}", e);
        Status::NotFound
    })?;

    let mut app = visitor_state(jar, state).await;
    app.set_theme(theme);
    Ok(Redirect::to("/"))
}

pub async fn chat_toggle_handler(jar: &CookieJar<'_>, state: &State<PortfolioState>) -> Redirect {
    let open = state.sessions.for_visitor(jar).await.toggle();
    debug!("Chat panel {}", if open { "opened" } else { "closed" });
    Redirect::to("/")
}

pub async fn chat_close_handler(jar: &CookieJar<'_>, state: &State<PortfolioState>) -> Redirect {
    if let Some(chat) = state.sessions.find(jar).await {
        chat.close();
    }
    Redirect::to("/")
}

pub async fn chat_key_handler(
    form: Form<ChatKeyForm>,
    jar: &CookieJar<'_>,
    state: &State<PortfolioState>,
) -> Redirect {
    if let Some(chat) = state.sessions.find(jar).await {
        chat.handle_key(&form.key);
    }
    Redirect::to("/")
}

pub async fn chat_send_handler(
    form: Form<ChatSendForm>,
    jar: &CookieJar<'_>,
    state: &State<PortfolioState>,
) -> Redirect {
    let chat = state.sessions.for_visitor(jar).await;
    let app = AppState::restore(CookieStore::new(jar), chat);
    let outcome = app.send_chat(state.transport.as_ref(), &form.message).await;

    match outcome {
        SendOutcome::Replied => info!("Chat reply received ({} messages)", app.chat().len()),
        SendOutcome::Failed => warn!("Chat reply failed, placeholder shown"),
        SendOutcome::Busy | SendOutcome::Rejected => debug!("Chat message ignored: {:?}", outcome),
    }
    Redirect::to("/")
}

pub async fn chat_transcript_handler(
    jar: &CookieJar<'_>,
    state: &State<PortfolioState>,
) -> Json<Vec<ChatMessage>> {
    let transcript = match state.sessions.find(jar).await {
        Some(chat) => chat.transcript(),
        None => Vec::new(),
    };
    Json(transcript)
}

pub async fn health_handler() -> Json<&'static str> {
    Json("OK")
}
