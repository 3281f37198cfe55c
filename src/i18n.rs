// src/i18n.rs
//! Supported languages, themes and the fixed UI text catalog

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Tr,
    En,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::Tr, Language::En];

    pub fn code(self) -> &'static str {
        match self {
            Language::Tr => "tr",
            Language::En => "en",
        }
    }

    pub fn texts(self) -> &'static UiText {
        match self {
            Language::Tr => &TR,
            Language::En => &EN,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tr" => Ok(Language::Tr),
            "en" => Ok(Language::En),
            other => anyhow::bail!("Unsupported language: {}. Use tr or en", other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn name(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => anyhow::bail!("Unsupported theme: {}. Use light or dark", other),
        }
    }
}

/// Every user-facing label of the document, per language.
#[derive(Debug, PartialEq)]
pub struct UiText {
    pub nav_home: &'static str,
    pub nav_about: &'static str,
    pub nav_experience: &'static str,
    pub nav_projects: &'static str,
    pub nav_skills: &'static str,
    pub nav_awards: &'static str,
    pub nav_articles: &'static str,
    pub nav_references: &'static str,
    pub nav_contact: &'static str,

    pub title_about: &'static str,
    pub title_experience: &'static str,
    pub title_projects: &'static str,
    pub title_skills: &'static str,
    pub title_awards: &'static str,
    pub title_articles: &'static str,
    pub title_references: &'static str,
    pub title_contact: &'static str,

    pub download_cv: &'static str,
    pub view_on_github: &'static str,
    pub read_on_medium: &'static str,
    pub contact_invitation: &'static str,

    pub chat_launcher: &'static str,
    pub chat_title: &'static str,
    pub chat_empty: &'static str,
    pub chat_loading: &'static str,
    pub chat_placeholder: &'static str,
    pub chat_send: &'static str,
    pub chat_close: &'static str,
    pub chat_unreachable: &'static str,
}

static TR: UiText = UiText {
    nav_home: "Ana Sayfa",
    nav_about: "Hakkımda",
    nav_experience: "Deneyim",
    nav_projects: "Projeler",
    nav_skills: "Yetenekler",
    nav_awards: "Ödüller",
    nav_articles: "Yazılar",
    nav_references: "Referanslar",
    nav_contact: "İletişim",

    title_about: "📖 Hakkımda",
    title_experience: "💼 Deneyim & Eğitim",
    title_projects: "🚀 Öne Çıkan Projeler",
    title_skills: "🛠️ Yetenekler",
    title_awards: "🏆 Ödüller",
    title_articles: "📝 Son Yazılar",
    title_references: "📞 Referanslar",
    title_contact: "📧 İletişim",

    download_cv: "📥 Download CV",
    view_on_github: "🔗 GitHub'da Görüntüle",
    read_on_medium: "📖 Read on Medium",
    contact_invitation: "Yeni fırsatlar ve işbirlikleri hakkında konuşmak için benimle iletişime geçebilirsiniz. E-posta veya LinkedIn üzerinden bana ulaşabilirsiniz.",

    chat_launcher: "AI Asistanına sor!",
    chat_title: "AI Portföy Asistanı",
    chat_empty: "Merhaba! CV, projeler ve deneyimlerle ilgili soru sorabilirsin.",
    chat_loading: "Yanıt oluşturuluyor…",
    chat_placeholder: "Mesajınızı yazın…",
    chat_send: "Gönder",
    chat_close: "Kapat",
    chat_unreachable: "⚠️ Yanıt alınamadı. Sunucu çalışıyor mu?",
};

static EN: UiText = UiText {
    nav_home: "Home",
    nav_about: "About",
    nav_experience: "Experience",
    nav_projects: "Projects",
    nav_skills: "Skills",
    nav_awards: "Awards",
    nav_articles: "Articles",
    nav_references: "References",
    nav_contact: "Contact",

    title_about: "📖 About Me",
    title_experience: "💼 Experience & Education",
    title_projects: "🚀 Featured Projects",
    title_skills: "🛠️ Skills",
    title_awards: "🏆 Awards & Achievements",
    title_articles: "📝 Latest Articles",
    title_references: "📞 References",
    title_contact: "📧 Get In Touch",

    download_cv: "📥 Download CV",
    view_on_github: "🔗 View on GitHub",
    read_on_medium: "📖 Read on Medium",
    contact_invitation: "I'm always interested in hearing about new opportunities and collaborations. Feel free to reach out via email or LinkedIn.",

    chat_launcher: "Ask the AI assistant!",
    chat_title: "AI Portfolio Assistant",
    chat_empty: "Hi! Ask anything about the CV, projects, and experience.",
    chat_loading: "Generating…",
    chat_placeholder: "Type your message…",
    chat_send: "Send",
    chat_close: "Close",
    chat_unreachable: "⚠️ Could not get a response. Is the server running?",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_codes_round_trip_through_from_str() {
        for lang in Language::ALL {
            assert_eq!(lang.code().parse::<Language>().unwrap(), lang);
        }
        assert!("de".parse::<Language>().is_err());
        assert!("TR".parse::<Language>().is_err());
    }

    #[test]
    fn test_theme_parse() {
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("sepia".parse::<Theme>().is_err());
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Language::default(), Language::Tr);
        assert_eq!(Theme::default(), Theme::Light);
    }

    #[test]
    fn test_unreachable_placeholder_is_localized() {
        assert_eq!(
            Language::Tr.texts().chat_unreachable,
            "⚠️ Yanıt alınamadı. Sunucu çalışıyor mu?"
        );
        assert_eq!(
            Language::En.texts().chat_unreachable,
            "⚠️ Could not get a response. Is the server running?"
        );
    }
}
