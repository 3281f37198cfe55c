// src/types/mod.rs
pub mod cv_data;
pub mod localized;

pub use cv_data::{
    Article, Award, CvDocument, Education, Experience, Project, Reference, SkillCategory, SkillSet,
};
pub use localized::{resolve, LocalizedValue};
