// src/render/mod.rs
//! Pure rendering: CV document + preferences + chat state in, page out

pub mod html;
pub mod page;

pub use html::render_page;
pub use page::{build_page, featured_projects, PageView, SectionId, SiteProfile, SocialLink};
