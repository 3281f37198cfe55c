// src/types/cv_data.rs
//! CV document as served by the CV API or the static fallback file

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

use super::localized::LocalizedValue;

// ===== Document =====

/// Every field is optional; a missing field renders as empty content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CvDocument {
    pub name: Option<String>,
    pub title: Option<String>,
    pub location: Option<String>,
    pub profile: Option<String>,
    pub email: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub links: HashMap<String, String>,
    #[serde(deserialize_with = "null_as_default")]
    pub education: Vec<Education>,
    #[serde(deserialize_with = "null_as_default")]
    pub experience: Vec<Experience>,
    #[serde(deserialize_with = "null_as_default")]
    pub projects: Vec<Project>,
    pub skills: SkillSet,
    #[serde(deserialize_with = "null_as_default")]
    pub awards: Vec<Award>,
    #[serde(
        rename = "medium_articles",
        alias = "articles",
        deserialize_with = "null_as_default"
    )]
    pub articles: Vec<Article>,
    #[serde(deserialize_with = "null_as_default")]
    pub references: Vec<Reference>,
}

/// Treats an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl CvDocument {
    pub fn link(&self, name: &str) -> Option<&str> {
        self.links.get(name).map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    pub institution: Option<String>,
    pub degree: Option<String>,
    pub years: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    pub title: Option<String>,
    pub company: Option<String>,
    pub duration: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub name: Option<String>,
    pub technology: Option<String>,
    pub description: Option<LocalizedValue<String>>,
    pub features: Option<LocalizedValue<Vec<String>>>,
    pub github: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Award {
    pub name: Option<String>,
    pub organization: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Article {
    pub title: Option<String>,
    pub url: Option<String>,
    pub summary_tr: Option<String>,
    pub summary_en: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reference {
    pub name: Option<String>,
    pub title: Option<String>,
    pub organization: Option<String>,
}

// ===== Skills =====

/// Skill categories in the order the document lists them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillSet(pub Vec<SkillCategory>);

#[derive(Debug, Clone, PartialEq)]
pub struct SkillCategory {
    pub name: String,
    pub tags: Vec<String>,
}

impl SkillSet {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkillCategory> {
        self.0.iter()
    }
}

impl Serialize for SkillSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for category in &self.0 {
            map.serialize_entry(&category.name, &category.tags)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SkillSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SkillSetVisitor;

        impl<'de> Visitor<'de> for SkillSetVisitor {
            type Value = SkillSet;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of skill category to a list of skills")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<SkillSet, A::Error> {
                let mut categories = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, tags)) = access.next_entry::<String, Option<Vec<String>>>()? {
                    categories.push(SkillCategory {
                        name,
                        tags: tags.unwrap_or_default(),
                    });
                }
                Ok(SkillSet(categories))
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<SkillSet, E> {
                Ok(SkillSet::default())
            }
        }

        deserializer.deserialize_any(SkillSetVisitor)
    }
}
