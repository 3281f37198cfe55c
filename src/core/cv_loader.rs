// src/core/cv_loader.rs
//! Loads the CV document once, from a primary source with a static fallback

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::core::ServiceClient;
use crate::types::CvDocument;

/// Somewhere a CV document can be read from.
#[async_trait]
pub trait CvSource: Send + Sync {
    fn describe(&self) -> String;
    async fn fetch(&self) -> Result<CvDocument>;
}

/// `GET` against the CV service; non-2xx and undecodable bodies are failures.
pub struct HttpCvSource {
    client: Arc<ServiceClient>,
    endpoint: String,
}

impl HttpCvSource {
    pub fn new(client: Arc<ServiceClient>, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl CvSource for HttpCvSource {
    fn describe(&self) -> String {
        self.client.url(&self.endpoint)
    }

    async fn fetch(&self) -> Result<CvDocument> {
        self.client.get(&self.endpoint).await
    }
}

/// A static JSON file on disk.
pub struct FileCvSource {
    path: PathBuf,
}

impl FileCvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CvSource for FileCvSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<CvDocument> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read file: {}", self.path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse CV document: {}", self.path.display()))
    }
}

/// Which source, if any, produced the document. Sources are never merged.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Primary(CvDocument),
    Fallback(CvDocument),
    Empty,
}

impl LoadOutcome {
    pub fn document(&self) -> Option<&CvDocument> {
        match self {
            LoadOutcome::Primary(cv) | LoadOutcome::Fallback(cv) => Some(cv),
            LoadOutcome::Empty => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LoadOutcome::Primary(_) => "primary",
            LoadOutcome::Fallback(_) => "fallback",
            LoadOutcome::Empty => "empty",
        }
    }
}

pub struct CvLoader {
    primary: Box<dyn CvSource>,
    fallback: Box<dyn CvSource>,
}

impl CvLoader {
    pub fn new(primary: Box<dyn CvSource>, fallback: Box<dyn CvSource>) -> Self {
        Self { primary, fallback }
    }

    /// One attempt per source, no retry.
    pub async fn load(&self) -> LoadOutcome {
        match self.primary.fetch().await {
            Ok(cv) => {
                info!("Loaded CV from {}", self.primary.describe());
                return LoadOutcome::Primary(cv);
            }
            Err(e) => warn!(
                "Primary CV source {} failed: {:#}",
                self.primary.describe(),
                e
            ),
        }

        match self.fallback.fetch().await {
            Ok(cv) => {
                info!("Loaded CV from fallback {}", self.fallback.describe());
                LoadOutcome::Fallback(cv)
            }
            Err(e) => {
                warn!(
                    "Fallback CV source {} failed, rendering without a document: {:#}",
                    self.fallback.describe(),
                    e
                );
                LoadOutcome::Empty
            }
        }
    }
}
