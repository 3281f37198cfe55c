// src/render/page.rs
//! Page model: what the document shows for a given CV, language, theme and chat

use serde::{Deserialize, Serialize};

use crate::chat::{ChatMessage, ChatSession};
use crate::i18n::{Language, Theme, UiText};
use crate::preferences::Preferences;
use crate::types::{resolve, CvDocument, Project};
use crate::utils::{initial_of, non_blank};

/// Height of the fixed header; anchors scroll this far above their target.
pub const SCROLL_OFFSET_PX: u32 = 70;

pub const MAX_ARTICLES: usize = 5;

/// Projects shown in the featured section, matched by exact name.
pub const FEATURED_PROJECTS: [&str; 4] = [
    "AI-Powered Portfolio Chatbot",
    "FinTurk Finansal Asistan",
    "Customer Churn Prediction",
    "Energy Consumption Prediction API",
];

/// Site-level content that does not come from the CV document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteProfile {
    /// Used when the document has no name.
    pub display_name: String,
    /// Used when the document has no title.
    pub display_title: String,
    pub profile_image: Option<String>,
    pub cv_download: Option<String>,
    pub social: Vec<SocialLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialLink {
    pub label: String,
    pub href: String,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionId {
    Home,
    About,
    Experience,
    Projects,
    Skills,
    Awards,
    Articles,
    References,
    Contact,
}

impl SectionId {
    pub const ALL: [SectionId; 9] = [
        SectionId::Home,
        SectionId::About,
        SectionId::Experience,
        SectionId::Projects,
        SectionId::Skills,
        SectionId::Awards,
        SectionId::Articles,
        SectionId::References,
        SectionId::Contact,
    ];

    pub fn anchor(self) -> &'static str {
        match self {
            SectionId::Home => "home",
            SectionId::About => "about",
            SectionId::Experience => "experience",
            SectionId::Projects => "projects",
            SectionId::Skills => "skills",
            SectionId::Awards => "awards",
            SectionId::Articles => "articles",
            SectionId::References => "references",
            SectionId::Contact => "contact",
        }
    }

    pub fn nav_label(self, t: &UiText) -> &'static str {
        match self {
            SectionId::Home => t.nav_home,
            SectionId::About => t.nav_about,
            SectionId::Experience => t.nav_experience,
            SectionId::Projects => t.nav_projects,
            SectionId::Skills => t.nav_skills,
            SectionId::Awards => t.nav_awards,
            SectionId::Articles => t.nav_articles,
            SectionId::References => t.nav_references,
            SectionId::Contact => t.nav_contact,
        }
    }

    pub fn title(self, t: &UiText) -> &'static str {
        match self {
            SectionId::Home => t.nav_home,
            SectionId::About => t.title_about,
            SectionId::Experience => t.title_experience,
            SectionId::Projects => t.title_projects,
            SectionId::Skills => t.title_skills,
            SectionId::Awards => t.title_awards,
            SectionId::Articles => t.title_articles,
            SectionId::References => t.title_references,
            SectionId::Contact => t.title_contact,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollTarget {
    Top,
    Anchor {
        id: &'static str,
        offset_px: u32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavEntry {
    pub section: SectionId,
    pub label: &'static str,
    pub target: ScrollTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAction {
    Language(Language),
    Theme(Theme),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toggle {
    pub label: &'static str,
    pub tooltip: &'static str,
    pub action: ToggleAction,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Avatar {
    /// `initial` is shown instead when the image fails to load.
    Image {
        src: String,
        alt: String,
        initial: String,
    },
    Initial(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Hero {
    pub name: String,
    pub title: String,
    pub avatar: Avatar,
    pub download: Option<(String, &'static str)>,
    pub social: Vec<SocialLink>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExperienceCard {
    pub title: String,
    pub company: String,
    pub duration: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EducationCard {
    pub degree: String,
    pub institution: String,
    pub years: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectCard {
    pub name: String,
    pub technology: String,
    pub description: String,
    pub features: Vec<String>,
    pub github: Option<(String, &'static str)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkillGroup {
    pub category: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AwardCard {
    pub name: String,
    pub organization: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArticleCard {
    pub title: String,
    pub summary: String,
    pub link: Option<(String, &'static str)>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceCard {
    pub name: String,
    pub title: String,
    pub organization: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContactButton {
    pub label: &'static str,
    pub href: String,
    pub external: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SectionBody {
    About {
        profile: Option<String>,
        institution: Option<String>,
    },
    Experience {
        experience: Vec<ExperienceCard>,
        education: Vec<EducationCard>,
    },
    Projects(Vec<ProjectCard>),
    Skills(Vec<SkillGroup>),
    Awards(Vec<AwardCard>),
    Articles(Vec<ArticleCard>),
    References(Vec<ReferenceCard>),
    Contact {
        invitation: &'static str,
        buttons: Vec<ContactButton>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub id: SectionId,
    pub title: &'static str,
    pub body: SectionBody,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatPanel {
    pub open: bool,
    pub loading: bool,
    pub messages: Vec<ChatMessage>,
    /// Set when the open panel should scroll to its last message after layout.
    pub scroll_to_latest: bool,
    pub texts: &'static UiText,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub language: Language,
    pub theme: Theme,
    pub nav: Vec<NavEntry>,
    pub toggles: Vec<Toggle>,
    pub hero: Hero,
    pub sections: Vec<Section>,
    pub chat: ChatPanel,
}

impl PageView {
    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn projects(&self) -> &[ProjectCard] {
        match self.section(SectionId::Projects).map(|s| &s.body) {
            Some(SectionBody::Projects(cards)) => cards,
            _ => &[],
        }
    }
}

/// Keeps the projects named in [`FEATURED_PROJECTS`], preserving document order.
pub fn featured_projects(projects: &[Project]) -> Vec<&Project> {
    projects
        .iter()
        .filter(|p| {
            p.name
                .as_deref()
                .is_some_and(|name| FEATURED_PROJECTS.contains(&name))
        })
        .collect()
}

fn text(value: Option<&String>) -> String {
    value.cloned().unwrap_or_default()
}

/// Builds the whole page. A missing document renders every optional section
/// as absent.
pub fn build_page(
    cv: Option<&CvDocument>,
    preferences: Preferences,
    chat: &ChatSession,
    site: &SiteProfile,
) -> PageView {
    let Preferences { language, theme } = preferences;
    let t = language.texts();

    let mut sections = Vec::with_capacity(SectionId::ALL.len() - 1);
    sections.push(about_section(cv, t));

    if let Some(cv) = cv {
        if !cv.experience.is_empty() || !cv.education.is_empty() {
            sections.push(experience_section(cv, t));
        }

        let projects = project_cards(cv, language);
        if !projects.is_empty() {
            sections.push(Section {
                id: SectionId::Projects,
                title: SectionId::Projects.title(t),
                body: SectionBody::Projects(projects),
            });
        }

        if !cv.skills.is_empty() {
            sections.push(Section {
                id: SectionId::Skills,
                title: SectionId::Skills.title(t),
                body: SectionBody::Skills(
                    cv.skills
                        .iter()
                        .map(|c| SkillGroup {
                            category: c.name.clone(),
                            tags: c.tags.clone(),
                        })
                        .collect(),
                ),
            });
        }

        if !cv.awards.is_empty() {
            sections.push(Section {
                id: SectionId::Awards,
                title: SectionId::Awards.title(t),
                body: SectionBody::Awards(
                    cv.awards
                        .iter()
                        .map(|a| AwardCard {
                            name: text(a.name.as_ref()),
                            organization: text(a.organization.as_ref()),
                            description: text(a.description.as_ref()),
                        })
                        .collect(),
                ),
            });
        }

        if !cv.articles.is_empty() {
            sections.push(Section {
                id: SectionId::Articles,
                title: SectionId::Articles.title(t),
                body: SectionBody::Articles(article_cards(cv, language)),
            });
        }

        if !cv.references.is_empty() {
            sections.push(Section {
                id: SectionId::References,
                title: SectionId::References.title(t),
                body: SectionBody::References(
                    cv.references
                        .iter()
                        .map(|r| ReferenceCard {
                            name: text(r.name.as_ref()),
                            title: text(r.title.as_ref()),
                            organization: text(r.organization.as_ref()),
                        })
                        .collect(),
                ),
            });
        }
    }

    sections.push(contact_section(cv, t));

    let nav = std::iter::once(NavEntry {
        section: SectionId::Home,
        label: SectionId::Home.nav_label(t),
        target: ScrollTarget::Top,
    })
    .chain(sections.iter().map(|s| NavEntry {
        section: s.id,
        label: s.id.nav_label(t),
        target: ScrollTarget::Anchor {
            id: s.id.anchor(),
            offset_px: SCROLL_OFFSET_PX,
        },
    }))
    .collect();

    let messages = chat.transcript();
    let open = chat.is_open();

    PageView {
        language,
        theme,
        nav,
        toggles: toggles(preferences),
        hero: hero(cv, t, site),
        sections,
        chat: ChatPanel {
            open,
            loading: chat.is_loading(),
            scroll_to_latest: open && !messages.is_empty(),
            messages,
            texts: t,
        },
    }
}

fn toggles(preferences: Preferences) -> Vec<Toggle> {
    vec![
        Toggle {
            label: "EN",
            tooltip: "English",
            action: ToggleAction::Language(Language::En),
            selected: preferences.language == Language::En,
        },
        Toggle {
            label: "🇹🇷",
            tooltip: "Türkçe",
            action: ToggleAction::Language(Language::Tr),
            selected: preferences.language == Language::Tr,
        },
        Toggle {
            label: "☀️",
            tooltip: "Light Mode",
            action: ToggleAction::Theme(Theme::Light),
            selected: preferences.theme == Theme::Light,
        },
        Toggle {
            label: "🌙",
            tooltip: "Dark Mode",
            action: ToggleAction::Theme(Theme::Dark),
            selected: preferences.theme == Theme::Dark,
        },
    ]
}

fn hero(cv: Option<&CvDocument>, t: &UiText, site: &SiteProfile) -> Hero {
    let name = cv
        .and_then(|cv| cv.name.clone())
        .unwrap_or_else(|| site.display_name.clone());
    let title = cv
        .and_then(|cv| cv.title.clone())
        .unwrap_or_else(|| site.display_title.clone());

    let avatar = match &site.profile_image {
        Some(src) => Avatar::Image {
            src: src.clone(),
            alt: name.clone(),
            initial: initial_of(&name),
        },
        None => Avatar::Initial(initial_of(&name)),
    };

    Hero {
        avatar,
        download: site.cv_download.clone().map(|href| (href, t.download_cv)),
        social: site.social.clone(),
        name,
        title,
    }
}

fn about_section(cv: Option<&CvDocument>, t: &UiText) -> Section {
    let profile = cv.and_then(|cv| non_blank(cv.profile.as_ref())).map(str::to_string);
    let institution = cv
        .and_then(|cv| cv.education.first())
        .and_then(|edu| non_blank(edu.institution.as_ref()))
        .map(str::to_string);

    Section {
        id: SectionId::About,
        title: SectionId::About.title(t),
        body: SectionBody::About {
            profile,
            institution,
        },
    }
}

fn experience_section(cv: &CvDocument, t: &UiText) -> Section {
    Section {
        id: SectionId::Experience,
        title: SectionId::Experience.title(t),
        body: SectionBody::Experience {
            experience: cv
                .experience
                .iter()
                .map(|e| ExperienceCard {
                    title: text(e.title.as_ref()),
                    company: text(e.company.as_ref()),
                    duration: text(e.duration.as_ref()),
                    description: text(e.description.as_ref()),
                })
                .collect(),
            education: cv
                .education
                .iter()
                .map(|e| EducationCard {
                    degree: text(e.degree.as_ref()),
                    institution: text(e.institution.as_ref()),
                    years: text(e.years.as_ref()),
                })
                .collect(),
        },
    }
}

fn project_cards(cv: &CvDocument, language: Language) -> Vec<ProjectCard> {
    let t = language.texts();
    featured_projects(&cv.projects)
        .into_iter()
        .map(|p| ProjectCard {
            name: text(p.name.as_ref()),
            technology: text(p.technology.as_ref()),
            description: resolve(p.description.as_ref(), language, Language::En)
                .cloned()
                .unwrap_or_default(),
            features: resolve(p.features.as_ref(), language, Language::En)
                .cloned()
                .unwrap_or_default(),
            github: non_blank(p.github.as_ref()).map(|href| (href.to_string(), t.view_on_github)),
        })
        .collect()
}

fn article_cards(cv: &CvDocument, language: Language) -> Vec<ArticleCard> {
    let t = language.texts();
    cv.articles
        .iter()
        .take(MAX_ARTICLES)
        .map(|a| {
            let summary = match language {
                Language::Tr => a.summary_tr.as_ref(),
                Language::En => a.summary_en.as_ref(),
            };
            ArticleCard {
                title: text(a.title.as_ref()),
                summary: text(summary),
                link: non_blank(a.url.as_ref()).map(|href| (href.to_string(), t.read_on_medium)),
            }
        })
        .collect()
}

fn contact_section(cv: Option<&CvDocument>, t: &UiText) -> Section {
    let email = cv.and_then(|cv| cv.email.as_deref()).unwrap_or_default();
    let link = |name: &str| {
        cv.and_then(|cv| cv.link(name))
            .unwrap_or("#")
            .to_string()
    };

    Section {
        id: SectionId::Contact,
        title: SectionId::Contact.title(t),
        body: SectionBody::Contact {
            invitation: t.contact_invitation,
            buttons: vec![
                ContactButton {
                    label: "📧 Mail Me",
                    href: format!("mailto:{}", email),
                    external: false,
                },
                ContactButton {
                    label: "💼 LinkedIn",
                    href: link("linkedin"),
                    external: true,
                },
                ContactButton {
                    label: "🔗 GitHub",
                    href: link("github"),
                    external: true,
                },
                ContactButton {
                    label: "✍️ Medium",
                    href: link("medium"),
                    external: true,
                },
            ],
        },
    }
}
