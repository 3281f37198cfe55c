// src/app_state.rs
//! Top-level UI state for one visitor

use std::sync::Arc;
use tracing::debug;

use crate::chat::{ChatSession, ChatTransport, SendOutcome};
use crate::i18n::{Language, Theme};
use crate::preferences::{KeyValueStore, PreferenceStore, Preferences, LANGUAGE_KEY, THEME_KEY};
use crate::render::{build_page, PageView, SiteProfile};
use crate::types::CvDocument;

/// Owns the visitor's preferences and chat session. Preference setters persist
/// immediately.
pub struct AppState<S: KeyValueStore> {
    store: PreferenceStore<S>,
    preferences: Preferences,
    chat: Arc<ChatSession>,
}

impl<S: KeyValueStore> AppState<S> {
    pub fn restore(store: S, chat: Arc<ChatSession>) -> Self {
        let store = PreferenceStore::new(store);
        let preferences = store.load();
        Self {
            store,
            preferences,
            chat,
        }
    }

    pub fn preferences(&self) -> Preferences {
        self.preferences
    }

    pub fn language(&self) -> Language {
        self.preferences.language
    }

    pub fn theme(&self) -> Theme {
        self.preferences.theme
    }

    pub fn set_language(&mut self, language: Language) {
        debug!("Language set to {}", language);
        self.preferences.language = language;
        self.store.write(LANGUAGE_KEY, &language);
    }

    pub fn set_theme(&mut self, theme: Theme) {
        debug!("Theme set to {}", theme);
        self.preferences.theme = theme;
        self.store.write(THEME_KEY, &theme);
    }

    pub fn chat(&self) -> &ChatSession {
        &self.chat
    }

    pub async fn send_chat(&self, transport: &dyn ChatTransport, input: &str) -> SendOutcome {
        self.chat.send(transport, input, self.language()).await
    }

    pub fn view(&self, cv: Option<&CvDocument>, site: &SiteProfile) -> PageView {
        build_page(cv, self.preferences, &self.chat, site)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::tests::ScriptedTransport;
    use crate::preferences::MemoryStore;

    #[test]
    fn test_restore_uses_persisted_values() {
        let store = MemoryStore::new();
        store.set(LANGUAGE_KEY, "\"en\"".to_string()).unwrap();
        store.set(THEME_KEY, "garbage".to_string()).unwrap();

        let app = AppState::restore(store, Arc::new(ChatSession::new()));
        assert_eq!(app.language(), Language::En);
        assert_eq!(app.theme(), Theme::Light);
    }

    #[test]
    fn test_setters_persist_and_rerender() {
        let mut app = AppState::restore(MemoryStore::new(), Arc::new(ChatSession::new()));
        let site = SiteProfile::default();

        app.set_language(Language::En);
        app.set_theme(Theme::Dark);
        let page = app.view(None, &site);
        assert_eq!(page.language, Language::En);
        assert_eq!(page.theme, Theme::Dark);

        let restored = AppState::restore(app.store.into_inner(), Arc::new(ChatSession::new()));
        assert_eq!(
            restored.preferences(),
            Preferences {
                language: Language::En,
                theme: Theme::Dark
            }
        );
    }

    #[tokio::test]
    async fn test_chat_uses_active_language() {
        let mut app = AppState::restore(MemoryStore::new(), Arc::new(ChatSession::new()));
        app.set_language(Language::En);
        let transport = ScriptedTransport::new().fail();

        assert_eq!(app.send_chat(&transport, "hi").await, SendOutcome::Failed);
        assert_eq!(transport.requests.lock().unwrap()[0].lang, Language::En);
        assert_eq!(
            app.chat().transcript().last().unwrap().content,
            Language::En.texts().chat_unreachable
        );
    }
}
