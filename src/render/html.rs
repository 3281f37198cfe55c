// src/render/html.rs
//! HTML output for a [`PageView`]

use crate::chat::Role;
use crate::render::page::*;
use crate::utils::escape_html as esc;

pub const LANGUAGE_ROUTE: &str = "/preferences/lang";
pub const THEME_ROUTE: &str = "/preferences/theme";
pub const CHAT_TOGGLE_ROUTE: &str = "/chat/toggle";
pub const CHAT_CLOSE_ROUTE: &str = "/chat/close";
pub const CHAT_KEY_ROUTE: &str = "/chat/key";
pub const CHAT_SEND_ROUTE: &str = "/chat/send";

const STYLE: &str = r#"
:root { --bg: #f8fafc; --fg: #1e293b; --card: #ffffff; --accent: #3b5bdb; --muted: #64748b; }
[data-theme="dark"] { --bg: #0f172a; --fg: #e2e8f0; --card: #1e293b; --accent: #748ffc; --muted: #94a3b8; }
body { margin: 0; background: var(--bg); color: var(--fg); font-family: system-ui, sans-serif; }
.nav-menu { position: fixed; top: 0; left: 0; right: 0; height: 70px; background: var(--card); z-index: 10; }
.nav-menu-content { display: flex; justify-content: space-between; align-items: center; height: 100%; padding: 0 24px; }
.nav-link { margin-right: 16px; color: var(--fg); text-decoration: none; }
.nav-menu-toggles form { display: inline; }
.nav-toggle-btn.selected { outline: 2px solid var(--accent); }
.main-content { max-width: 960px; margin: 0 auto; padding: 90px 16px 40px; }
.portfolio-section { scroll-margin-top: 70px; margin: 48px 0; }
.section-title { text-align: center; }
.hero-section { text-align: center; }
.hero-profile-img { width: 160px; height: 160px; border-radius: 50%; object-fit: cover; }
.hero-initial { display: inline-flex; align-items: center; justify-content: center; color: #fff; font-size: 3rem; font-weight: 700; background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); }
.hero-initial[hidden] { display: none; }
.experience-card, .education-card, .project-card, .award-card, .article-card, .reference-card, .skill-category { background: var(--card); border-radius: 12px; padding: 16px; margin: 12px 0; }
.skill-tag { display: inline-block; margin: 4px; padding: 4px 10px; border-radius: 999px; border: 1px solid var(--accent); }
.institution { text-align: center; color: var(--accent); font-weight: 500; margin-top: 20px; font-size: 1.25em; }
.contact-buttons { display: flex; justify-content: center; gap: 20px; flex-wrap: wrap; }
.contact-buttons a { color: var(--accent); border: 2px solid var(--accent); border-radius: 8px; padding: 10px 20px; text-decoration: none; }
#floating-chat-root { position: fixed; right: 24px; bottom: 24px; z-index: 20; }
#floating-chat-panel { display: none; width: 360px; background: var(--card); border-radius: 12px; }
#floating-chat-panel.is-visible { display: block; }
.chat-body { max-height: 360px; overflow-y: auto; padding: 12px; }
.chat-msg.user { text-align: right; }
.chat-msg-bubble { display: inline-block; padding: 8px 12px; border-radius: 12px; margin: 4px 0; }
"#;

const SCRIPT: &str = r#"
document.querySelectorAll('a[data-scroll-target]').forEach(function (link) {
  link.addEventListener('click', function (event) {
    event.preventDefault();
    var target = link.getAttribute('data-scroll-target');
    if (target === 'top') { window.scrollTo({ top: 0, behavior: 'smooth' }); return; }
    var el = document.getElementById(target);
    if (!el) return;
    var offset = parseInt(link.getAttribute('data-scroll-offset') || '0', 10);
    var top = el.getBoundingClientRect().top + window.pageYOffset - offset;
    window.scrollTo({ top: top, behavior: 'smooth' });
  });
});
document.addEventListener('keydown', function (event) {
  if (event.key !== 'Escape') return;
  var panel = document.getElementById('floating-chat-panel');
  if (!panel || !panel.classList.contains('is-visible')) return;
  var form = document.getElementById('chat-key-form');
  form.elements['key'].value = event.key;
  form.submit();
});
(function () {
  var panel = document.getElementById('floating-chat-panel');
  if (!panel || panel.getAttribute('data-scroll-latest') !== 'true') return;
  requestAnimationFrame(function () {
    var bottom = document.getElementById('chat-bottom');
    if (bottom) bottom.scrollIntoView({ block: 'end' });
  });
})();
"#;

fn text_div(class: &str, value: &str) -> String {
    format!("<div class=\"{}\">{}</div>\n", class, esc(value))
}

fn external_link(class: &str, href: &str, label: &str) -> String {
    format!(
        "<a class=\"{}\" href=\"{}\" target=\"_blank\" rel=\"noreferrer\">{}</a>\n",
        class,
        esc(href),
        esc(label)
    )
}

/// Renders the full document.
pub fn render_page(page: &PageView) -> String {
    let mut html = String::with_capacity(16 * 1024);

    html.push_str("<!DOCTYPE html>\n");
    html.push_str(&format!(
        "<html lang=\"{}\" data-theme=\"{}\">\n",
        page.language, page.theme
    ));
    html.push_str("<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!("<title>{}</title>\n", esc(&page.hero.name)));
    html.push_str(&format!("<style>{}</style>\n</head>\n", STYLE));
    html.push_str(&format!(
        "<body class=\"stApp\" data-theme=\"{}\">\n",
        page.theme
    ));

    render_nav(&mut html, page);

    html.push_str("<div class=\"main-content\">\n");
    render_hero(&mut html, &page.hero);
    for section in &page.sections {
        render_section(&mut html, section);
    }
    html.push_str("</div>\n");

    render_chat(&mut html, &page.chat);

    html.push_str(&format!("<script>{}</script>\n", SCRIPT));
    html.push_str("</body>\n</html>\n");
    html
}

fn render_nav(html: &mut String, page: &PageView) {
    html.push_str("<div class=\"nav-menu\"><div class=\"nav-menu-content\">\n");
    html.push_str("<div class=\"nav-menu-links\">\n");
    for entry in &page.nav {
        match entry.target {
            ScrollTarget::Top => html.push_str(&format!(
                "<a href=\"#\" class=\"nav-link\" data-scroll-target=\"top\">{}</a>\n",
                esc(entry.label)
            )),
            ScrollTarget::Anchor { id, offset_px } => html.push_str(&format!(
                "<a href=\"#{id}\" class=\"nav-link\" data-scroll-target=\"{id}\" data-scroll-offset=\"{offset}\">{label}</a>\n",
                id = id,
                offset = offset_px,
                label = esc(entry.label)
            )),
        }
    }
    html.push_str("</div>\n<div class=\"nav-menu-toggles\">\n");
    for toggle in &page.toggles {
        let action = match toggle.action {
            ToggleAction::Language(lang) => format!("{}/{}", LANGUAGE_ROUTE, lang),
            ToggleAction::Theme(theme) => format!("{}/{}", THEME_ROUTE, theme),
        };
        html.push_str(&format!(
            "<form method=\"post\" action=\"{}\"><button class=\"nav-toggle-btn{}\" title=\"{}\" type=\"submit\">{}</button></form>\n",
            action,
            if toggle.selected { " selected" } else { "" },
            esc(toggle.tooltip),
            esc(toggle.label)
        ));
    }
    html.push_str("</div>\n</div></div>\n");
}

fn render_hero(html: &mut String, hero: &Hero) {
    html.push_str("<div class=\"hero-section\" id=\"home\">\n");
    match &hero.avatar {
        Avatar::Image { src, alt, initial } => html.push_str(&format!(
            "<img src=\"{}\" alt=\"{}\" class=\"hero-profile-img\" onerror=\"this.hidden=true;this.nextElementSibling.hidden=false;\">\n<div class=\"hero-profile-img hero-initial\" hidden>{}</div>\n",
            esc(src),
            esc(alt),
            esc(initial)
        )),
        Avatar::Initial(initial) => html.push_str(&format!(
            "<div class=\"hero-profile-img hero-initial\">{}</div>\n",
            esc(initial)
        )),
    }
    html.push_str(&format!("<h1 class=\"hero-name\">{}</h1>\n", esc(&hero.name)));
    html.push_str(&format!("<h2 class=\"hero-title\">{}</h2>\n", esc(&hero.title)));
    if let Some((href, label)) = &hero.download {
        html.push_str(&format!(
            "<a href=\"{}\" download class=\"download-cv-btn\">{}</a>\n",
            esc(href),
            esc(label)
        ));
    }
    if !hero.social.is_empty() {
        html.push_str("<div class=\"social-links\">\n");
        for link in &hero.social {
            let content = match &link.icon {
                Some(icon) => format!("<img src=\"{}\" alt=\"{}\">", esc(icon), esc(&link.label)),
                None => esc(&link.label),
            };
            html.push_str(&format!(
                "<a href=\"{}\" target=\"_blank\" rel=\"noreferrer\">{}</a>\n",
                esc(&link.href),
                content
            ));
        }
        html.push_str("</div>\n");
    }
    html.push_str("</div>\n");
}

fn render_section(html: &mut String, section: &Section) {
    html.push_str(&format!(
        "<div class=\"portfolio-section\" id=\"{}\">\n<h2 class=\"section-title\">{}</h2>\n",
        section.id.anchor(),
        esc(section.title)
    ));

    match &section.body {
        SectionBody::About {
            profile,
            institution,
        } => {
            if let Some(profile) = profile {
                html.push_str(&text_div("about-content", profile));
            }
            if let Some(institution) = institution {
                html.push_str(&format!(
                    "<p class=\"institution\">🎓 {}</p>\n",
                    esc(institution)
                ));
            }
        }
        SectionBody::Experience {
            experience,
            education,
        } => {
            for exp in experience {
                html.push_str("<div class=\"experience-card\">\n");
                html.push_str(&text_div("experience-title", &exp.title));
                html.push_str(&text_div("experience-company", &exp.company));
                html.push_str(&text_div("experience-duration", &exp.duration));
                html.push_str(&text_div("experience-description", &exp.description));
                html.push_str("</div>\n");
            }
            for edu in education {
                html.push_str("<div class=\"education-card\">\n");
                html.push_str(&text_div("education-title", &edu.degree));
                html.push_str(&text_div("education-institution", &edu.institution));
                html.push_str(&text_div("education-years", &edu.years));
                html.push_str("</div>\n");
            }
        }
        SectionBody::Projects(projects) => {
            html.push_str("<div class=\"projects-grid\">\n");
            for project in projects {
                html.push_str("<div class=\"project-card\">\n");
                html.push_str(&text_div("project-name", &project.name));
                html.push_str(&text_div("project-tech", &project.technology));
                html.push_str(&text_div("project-description", &project.description));
                if !project.features.is_empty() {
                    html.push_str("<div class=\"project-features\">\n");
                    for feature in &project.features {
                        html.push_str(&text_div("project-feature", feature));
                    }
                    html.push_str("</div>\n");
                }
                if let Some((href, label)) = &project.github {
                    html.push_str(&external_link("project-link", href, label));
                }
                html.push_str("</div>\n");
            }
            html.push_str("</div>\n");
        }
        SectionBody::Skills(groups) => {
            html.push_str("<div class=\"skills-container\">\n");
            for group in groups {
                html.push_str("<div class=\"skill-category\">\n");
                html.push_str(&text_div("skill-category-title", &group.category));
                html.push_str("<div>");
                for tag in &group.tags {
                    html.push_str(&format!("<span class=\"skill-tag\">{}</span>", esc(tag)));
                }
                html.push_str("</div>\n</div>\n");
            }
            html.push_str("</div>\n");
        }
        SectionBody::Awards(awards) => {
            for award in awards {
                html.push_str("<div class=\"award-card\">\n");
                html.push_str(&text_div("award-name", &award.name));
                html.push_str(&text_div("award-org", &award.organization));
                html.push_str(&text_div("award-description", &award.description));
                html.push_str("</div>\n");
            }
        }
        SectionBody::Articles(articles) => {
            html.push_str("<div class=\"articles-grid\">\n");
            for article in articles {
                html.push_str("<div class=\"article-card\">\n");
                html.push_str(&text_div("article-title", &article.title));
                html.push_str(&text_div("article-summary", &article.summary));
                if let Some((href, label)) = &article.link {
                    html.push_str(&external_link("article-link", href, label));
                }
                html.push_str("</div>\n");
            }
            html.push_str("</div>\n");
        }
        SectionBody::References(references) => {
            html.push_str("<div class=\"reference-list\">\n");
            for reference in references {
                html.push_str("<div class=\"reference-card\">\n");
                html.push_str(&text_div("reference-name", &reference.name));
                html.push_str(&text_div("reference-title", &reference.title));
                html.push_str(&text_div("reference-org", &reference.organization));
                html.push_str("</div>\n");
            }
            html.push_str("</div>\n");
        }
        SectionBody::Contact {
            invitation,
            buttons,
        } => {
            html.push_str(&format!(
                "<p class=\"contact-invitation\">{}</p>\n<div class=\"contact-buttons\">\n",
                esc(invitation)
            ));
            for button in buttons {
                if button.external {
                    html.push_str(&external_link("contact-button", &button.href, button.label));
                } else {
                    html.push_str(&format!(
                        "<a class=\"contact-button\" href=\"{}\">{}</a>\n",
                        esc(&button.href),
                        esc(button.label)
                    ));
                }
            }
            html.push_str("</div>\n");
        }
    }

    html.push_str("</div>\n");
}

fn render_chat(html: &mut String, chat: &ChatPanel) {
    let t = chat.texts;

    html.push_str("<div id=\"floating-chat-root\">\n");
    html.push_str(&format!(
        "<form method=\"post\" action=\"{}\"><button id=\"floating-chat-launcher\" type=\"submit\"><span>{}</span><div class=\"icon\">🤖</div></button></form>\n",
        CHAT_TOGGLE_ROUTE,
        esc(t.chat_launcher)
    ));

    html.push_str(&format!(
        "<div id=\"floating-chat-panel\" class=\"{}\" data-scroll-latest=\"{}\">\n",
        if chat.open { "is-visible" } else { "" },
        chat.scroll_to_latest
    ));
    html.push_str(&format!(
        "<header><div>{}</div><form method=\"post\" action=\"{}\"><button id=\"floating-chat-close\" aria-label=\"{}\" type=\"submit\">×</button></form></header>\n",
        esc(t.chat_title),
        CHAT_CLOSE_ROUTE,
        esc(t.chat_close)
    ));

    html.push_str("<div class=\"chat-body\">\n");
    if chat.messages.is_empty() {
        html.push_str(&text_div("chat-empty", t.chat_empty));
    }
    for message in &chat.messages {
        let role = match message.role {
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        html.push_str(&format!(
            "<div class=\"chat-msg {}\"><div class=\"chat-msg-bubble\">{}</div></div>\n",
            role,
            esc(&message.content)
        ));
    }
    if chat.loading {
        html.push_str(&text_div("chat-loading", t.chat_loading));
    }
    html.push_str("<div id=\"chat-bottom\"></div>\n</div>\n");

    html.push_str(&format!(
        "<form class=\"chat-input-row\" method=\"post\" action=\"{}\"><input name=\"message\" value=\"\" placeholder=\"{}\" autocomplete=\"off\"><button type=\"submit\"{}>{}</button></form>\n",
        CHAT_SEND_ROUTE,
        esc(t.chat_placeholder),
        if chat.loading { " disabled" } else { "" },
        esc(t.chat_send)
    ));
    html.push_str("</div>\n");

    html.push_str(&format!(
        "<form id=\"chat-key-form\" method=\"post\" action=\"{}\" hidden><input type=\"hidden\" name=\"key\" value=\"\"></form>\n",
        CHAT_KEY_ROUTE
    ));
    html.push_str("</div>\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatSession;
    use crate::i18n::{Language, Theme};
    use crate::preferences::Preferences;
    use crate::types::CvDocument;
    use scraper::{Html, Selector};
    use serde_json::json;

    fn render(cv: Option<serde_json::Value>, language: Language, theme: Theme) -> Html {
        let cv: Option<CvDocument> = cv.map(|v| serde_json::from_value(v).unwrap());
        let page = build_page(
            cv.as_ref(),
            Preferences { language, theme },
            &ChatSession::new(),
            &SiteProfile::default(),
        );
        Html::parse_document(&render_page(&page))
    }

    fn texts(doc: &Html, selector: &str) -> Vec<String> {
        let selector = Selector::parse(selector).unwrap();
        doc.select(&selector)
            .map(|e| e.text().collect::<String>())
            .collect()
    }

    #[test]
    fn test_document_carries_theme_and_language() {
        let doc = render(None, Language::En, Theme::Dark);
        let html = Selector::parse("html").unwrap();
        let root = doc.select(&html).next().unwrap();
        assert_eq!(root.value().attr("lang"), Some("en"));
        assert_eq!(root.value().attr("data-theme"), Some("dark"));
    }

    #[test]
    fn test_empty_document_still_renders_about_and_contact() {
        let doc = render(None, Language::Tr, Theme::Light);
        let ids: Vec<String> = doc
            .select(&Selector::parse(".portfolio-section").unwrap())
            .filter_map(|e| e.value().attr("id").map(str::to_string))
            .collect();
        assert_eq!(ids, vec!["about", "contact"]);
        assert_eq!(texts(&doc, ".chat-empty").len(), 1);
    }

    #[test]
    fn test_project_description_is_localized_in_markup() {
        let cv = json!({
            "name": "X",
            "projects": [{"name": "AI-Powered Portfolio Chatbot", "description": {"tr": "A", "en": "B"}}]
        });

        let en = render(Some(cv.clone()), Language::En, Theme::Light);
        assert_eq!(texts(&en, ".project-card .project-description"), vec!["B"]);
        assert_eq!(texts(&en, ".hero-name"), vec!["X"]);

        let tr = render(Some(cv), Language::Tr, Theme::Light);
        assert_eq!(texts(&tr, ".project-card .project-description"), vec!["A"]);
    }

    #[test]
    fn test_unlisted_project_renders_no_cards() {
        let doc = render(
            Some(json!({"name": "X", "projects": [{"name": "Unlisted Project"}]})),
            Language::En,
            Theme::Light,
        );
        assert!(texts(&doc, ".project-card").is_empty());
    }

    #[test]
    fn test_nav_links_carry_scroll_offset() {
        let doc = render(Some(json!({"skills": {"ML": ["sklearn"]}})), Language::En, Theme::Light);
        let selector = Selector::parse("a.nav-link[data-scroll-target=\"skills\"]").unwrap();
        let link = doc.select(&selector).next().unwrap();
        assert_eq!(link.value().attr("data-scroll-offset"), Some("70"));
        assert_eq!(link.value().attr("href"), Some("#skills"));
    }

    #[test]
    fn test_text_is_escaped() {
        let doc = render(
            Some(json!({"name": "<script>alert(1)</script>", "profile": "a & b"})),
            Language::En,
            Theme::Light,
        );
        assert_eq!(texts(&doc, ".hero-name"), vec!["<script>alert(1)</script>"]);
        assert_eq!(texts(&doc, ".about-content"), vec!["a & b"]);
        // Only the page's own script element exists.
        assert_eq!(texts(&doc, "script").len(), 1);
    }

    #[test]
    fn test_profile_image_falls_back_to_initial() {
        let site = SiteProfile {
            profile_image: Some("/missing.png".to_string()),
            ..Default::default()
        };
        let cv: CvDocument = serde_json::from_value(json!({"name": "Betül"})).unwrap();
        let page = build_page(
            Some(&cv),
            Preferences::default(),
            &ChatSession::new(),
            &site,
        );
        let doc = Html::parse_document(&render_page(&page));

        let img = doc
            .select(&Selector::parse("img.hero-profile-img").unwrap())
            .next()
            .unwrap();
        assert_eq!(img.value().attr("src"), Some("/missing.png"));
        assert!(img.value().attr("onerror").unwrap().contains("nextElementSibling"));

        let initial = doc
            .select(&Selector::parse(".hero-initial").unwrap())
            .next()
            .unwrap();
        assert!(initial.value().attr("hidden").is_some());
        assert_eq!(initial.text().collect::<String>(), "B");
    }

    #[test]
    fn test_toggle_forms_point_at_preference_routes() {
        let doc = render(None, Language::Tr, Theme::Light);
        let actions: Vec<String> = doc
            .select(&Selector::parse(".nav-menu-toggles form").unwrap())
            .filter_map(|e| e.value().attr("action").map(str::to_string))
            .collect();
        assert_eq!(
            actions,
            vec![
                "/preferences/lang/en",
                "/preferences/lang/tr",
                "/preferences/theme/light",
                "/preferences/theme/dark"
            ]
        );
    }
}
