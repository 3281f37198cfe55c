pub mod app_state;
pub mod chat;
pub mod cli;
pub mod config;
pub mod core;
pub mod i18n;
pub mod preferences;
pub mod render;
pub mod types;
pub mod utils;
pub mod web;

pub use app_state::AppState;
pub use config::PortfolioConfig;
pub use i18n::{Language, Theme};
pub use web::start_web_server;
