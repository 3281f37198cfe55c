// src/preferences.rs
//! Language and theme preferences kept in a client-side key-value store

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

use crate::i18n::{Language, Theme};

pub const LANGUAGE_KEY: &str = "lang";
pub const THEME_KEY: &str = "theme";

#[derive(Debug, thiserror::Error)]
pub enum PreferenceError {
    #[error("Preference store unavailable: {0}")]
    Unavailable(String),
    #[error("Failed to encode preference: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Raw string storage, in the manner of a browser's local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError>;
    fn set(&self, key: &str, value: String) -> Result<(), PreferenceError>;
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PreferenceError> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| PreferenceError::Unavailable(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<(), PreferenceError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| PreferenceError::Unavailable(e.to_string()))?;
        entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// JSON-encoded reads and writes over a [`KeyValueStore`] that never fail.
pub struct PreferenceStore<S> {
    store: S,
}

impl<S: KeyValueStore> PreferenceStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns `default` when the key is missing, empty, unreadable or does not
    /// decode to a `T`.
    pub fn read<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.store.get(key) {
            Ok(Some(raw)) if !raw.is_empty() => match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(e) => {
                    debug!("Ignoring malformed preference {}={:?}: {}", key, raw, e);
                    default
                }
            },
            Ok(_) => default,
            Err(e) => {
                debug!("Ignoring unreadable preference {}: {}", key, e);
                default
            }
        }
    }

    /// Best effort; a failed write only loses the preference.
    pub fn write<T: Serialize>(&self, key: &str, value: &T) {
        let result = serde_json::to_string(value)
            .map_err(PreferenceError::from)
            .and_then(|encoded| self.store.set(key, encoded));

        if let Err(e) = result {
            debug!("Failed to persist preference {}: {}", key, e);
        }
    }

    pub fn load(&self) -> Preferences {
        Preferences {
            language: self.read(LANGUAGE_KEY, Language::default()),
            theme: self.read(THEME_KEY, Theme::default()),
        }
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Preferences {
    pub language: Language,
    pub theme: Theme,
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, PreferenceError> {
            Err(PreferenceError::Unavailable("disk on fire".to_string()))
        }

        fn set(&self, _key: &str, _value: String) -> Result<(), PreferenceError> {
            Err(PreferenceError::Unavailable("disk on fire".to_string()))
        }
    }

    fn store_with(key: &str, raw: &str) -> PreferenceStore<MemoryStore> {
        let store = MemoryStore::new();
        store.set(key, raw.to_string()).unwrap();
        PreferenceStore::new(store)
    }

    #[test]
    fn test_missing_key_returns_default() {
        let prefs = PreferenceStore::new(MemoryStore::new());
        assert_eq!(prefs.read(LANGUAGE_KEY, Language::En), Language::En);
    }

    #[test]
    fn test_malformed_values_return_default() {
        for raw in ["", "tr", "\"de\"", "{not json", "42", "null", "[\"en\"]"] {
            let prefs = store_with(LANGUAGE_KEY, raw);
            assert_eq!(
                prefs.read(LANGUAGE_KEY, Language::Tr),
                Language::Tr,
                "raw value {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_read_decodes_json_scalars() {
        let prefs = store_with(THEME_KEY, "\"dark\"");
        assert_eq!(prefs.read(THEME_KEY, Theme::Light), Theme::Dark);
    }

    #[test]
    fn test_write_then_load() {
        let prefs = PreferenceStore::new(MemoryStore::new());
        prefs.write(LANGUAGE_KEY, &Language::En);
        prefs.write(THEME_KEY, &Theme::Dark);

        assert_eq!(
            prefs.load(),
            Preferences {
                language: Language::En,
                theme: Theme::Dark
            }
        );
        assert_eq!(
            prefs.into_inner().get(LANGUAGE_KEY).unwrap().as_deref(),
            Some("\"en\"")
        );
    }

    #[test]
    fn test_preferences_are_independent() {
        let prefs = store_with(THEME_KEY, "\"dark\"");
        let loaded = prefs.load();
        assert_eq!(loaded.language, Language::Tr);
        assert_eq!(loaded.theme, Theme::Dark);
    }

    #[test]
    fn test_broken_store_never_raises() {
        let prefs = PreferenceStore::new(BrokenStore);
        prefs.write(THEME_KEY, &Theme::Dark);
        assert_eq!(prefs.load(), Preferences::default());
    }
}
