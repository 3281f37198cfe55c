// src/web/mod.rs

pub mod handlers;
pub mod types;

pub use handlers::*;
pub use types::*;

use crate::chat::{ChatMessage, ChatTransport, HttpChatTransport};
use crate::config::PortfolioConfig;
use anyhow::Result;
use rocket::form::Form;
use rocket::fs::FileServer;
use rocket::http::{CookieJar, Status};
use rocket::response::content::RawHtml;
use rocket::response::Redirect;
use rocket::serde::json::Json;
use rocket::{catchers, get, post, routes, Build, Rocket, State};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};

#[get("/")]
pub async fn index(jar: &CookieJar<'_>, state: &State<PortfolioState>) -> RawHtml<String> {
    handlers::index_handler(jar, state).await
}

#[post("/preferences/lang/<code>")]
pub async fn set_language(
    code: &str,
    jar: &CookieJar<'_>,
    state: &State<PortfolioState>,
) -> Result<Redirect, Status> {
    handlers::set_language_handler(code, jar, state).await
}

#[post("/preferences/theme/<name>")]
pub async fn set_theme(
    name: &str,
    jar: &CookieJar<'_>,
    state: &State<PortfolioState>,
) -> Result<Redirect, Status> {
    handlers::set_theme_handler(name, jar, state).await
}

#[post("/chat/toggle")]
pub async fn chat_toggle(jar: &CookieJar<'_>, state: &State<PortfolioState>) -> Redirect {
    handlers::chat_toggle_handler(jar, state).await
}

#[post("/chat/close")]
pub async fn chat_close(jar: &CookieJar<'_>, state: &State<PortfolioState>) -> Redirect {
    handlers::chat_close_handler(jar, state).await
}

#[post("/chat/key", data = "<form>")]
pub async fn chat_key(
    form: Form<ChatKeyForm>,
    jar: &CookieJar<'_>,
    state: &State<PortfolioState>,
) -> Redirect {
    handlers::chat_key_handler(form, jar, state).await
}

#[post("/chat/send", data = "<form>")]
pub async fn chat_send(
    form: Form<ChatSendForm>,
    jar: &CookieJar<'_>,
    state: &State<PortfolioState>,
) -> Redirect {
    handlers::chat_send_handler(form, jar, state).await
}

#[get("/chat/transcript")]
pub async fn chat_transcript(
    jar: &CookieJar<'_>,
    state: &State<PortfolioState>,
) -> Json<Vec<ChatMessage>> {
    handlers::chat_transcript_handler(jar, state).await
}

#[get("/health")]
pub async fn health() -> Json<&'static str> {
    handlers::health_handler().await
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<ErrorResponse> {
    Json(ErrorResponse::new("Invalid request format", "BAD_REQUEST"))
}

#[rocket::catch(404)]
pub fn not_found() -> Json<ErrorResponse> {
    Json(ErrorResponse::new("Not found", "NOT_FOUND"))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<ErrorResponse> {
    Json(ErrorResponse::new("Internal server error", "INTERNAL_ERROR"))
}

/// Routes, catchers and state, without binding a port.
pub fn build_rocket(state: PortfolioState, static_dir: Option<&Path>) -> Rocket<Build> {
    let mut rocket = rocket::build()
        .manage(state)
        .register("/", catchers![bad_request, not_found, internal_error])
        .mount(
            "/",
            routes![
                index,
                set_language,
                set_theme,
                chat_toggle,
                chat_close,
                chat_key,
                chat_send,
                chat_transcript,
                health,
            ],
        );

    match static_dir {
        Some(dir) if dir.is_dir() => {
            info!("Serving static files from {}", dir.display());
            rocket = rocket.mount("/", FileServer::from(dir));
        }
        Some(dir) => warn!("Static directory {} not found, skipping", dir.display()),
        None => {}
    }
    rocket
}

// Main server start function
pub async fn start_web_server(config: PortfolioConfig) -> Result<()> {
    let client = config.service_client()?;
    let transport: Arc<dyn ChatTransport> = Arc::new(HttpChatTransport::new(
        client.clone(),
        config.chat_endpoint.clone(),
    ));
    let loader = config.cv_loader(client);

    let state = PortfolioState::new(transport, config.site.clone());

    // Pages render without a document until this resolves.
    let cv = state.cv.clone();
    tokio::spawn(async move {
        let outcome = loader.load().await;
        info!("CV load finished: {}", outcome.label());
        *cv.write().await = Some(outcome);
    });

    info!("Starting portfolio server on port {}", config.port);
    info!("API: {}", config.api_base_url);

    let figment = rocket::Config::figment()
        .merge(("port", config.port))
        .merge(("address", "0.0.0.0"));

    if let Err(e) = build_rocket(state, config.static_dir.as_deref())
        .configure(figment)
        .launch()
        .await
    {
        error!("Rocket failed: {}", e);
        return Err(anyhow::anyhow!("Server failed: {}", e));
    }

    Ok(())
}
