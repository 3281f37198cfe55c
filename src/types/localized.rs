// src/types/localized.rs
//! Values that are either plain or given per language

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::i18n::Language;

/// Codes consulted after the active and fallback languages, in order.
const LAST_RESORT_CODES: [&str; 2] = ["tr", "en"];

/// A field that the CV document may give once for every language or as a
/// `{ "tr": ..., "en": ... }` object.
///
/// The distinction is structural: any JSON object is read as a per-language
/// mapping, anything else as a plain value. `T` must therefore not itself be
/// deserializable from a JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocalizedValue<T> {
    ByLanguage(BTreeMap<String, Option<T>>),
    Plain(T),
}

impl<T> LocalizedValue<T> {
    pub fn resolve(&self, language: Language, fallback: Language) -> Option<&T> {
        match self {
            LocalizedValue::Plain(value) => Some(value),
            LocalizedValue::ByLanguage(map) => [language.code(), fallback.code()]
                .into_iter()
                .chain(LAST_RESORT_CODES)
                .find_map(|code| map.get(code).and_then(Option::as_ref)),
        }
    }
}

impl<T> From<T> for LocalizedValue<T> {
    fn from(value: T) -> Self {
        LocalizedValue::Plain(value)
    }
}

/// Resolve an optional localized field for `language`, consulting `fallback`,
/// then `tr`, then `en`.
pub fn resolve<T>(
    value: Option<&LocalizedValue<T>>,
    language: Language,
    fallback: Language,
) -> Option<&T> {
    value.and_then(|v| v.resolve(language, fallback))
}
