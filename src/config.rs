// src/config.rs
//! Host configuration: `config.yaml`, then environment, then command line

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::core::{CvLoader, CvSource, FileCvSource, HttpCvSource, ServiceClient};
use crate::render::SiteProfile;

const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Where the CV is read from when the CV service fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackSource {
    /// Fetched with `GET`; relative paths are joined to the API base URL.
    Url(String),
    Path(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioConfig {
    pub api_base_url: String,
    pub cv_endpoint: String,
    pub chat_endpoint: String,
    /// Written as `fallback_cv: {path: ...}` or `fallback_cv: {url: ...}`.
    #[serde(with = "serde_yaml::with::singleton_map")]
    pub fallback_cv: FallbackSource,
    /// Served at `/` below the document routes.
    pub static_dir: Option<PathBuf>,
    pub port: u16,
    /// No timeout when unset.
    pub timeout_seconds: Option<u64>,
    pub site: SiteProfile,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000".to_string(),
            cv_endpoint: "/api/cv".to_string(),
            chat_endpoint: "/api/chat".to_string(),
            fallback_cv: FallbackSource::Path(PathBuf::from("static/betul-cv.json")),
            static_dir: Some(PathBuf::from("static")),
            port: 8080,
            timeout_seconds: None,
            site: SiteProfile::default(),
        }
    }
}

impl PortfolioConfig {
    /// Reads `path` (which must exist) or `./config.yaml` (which may be
    /// absent), then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from_path(path)?,
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::load_from_path(&path)?
                } else {
                    info!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                    Self::default()
                }
            }
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// `PORTFOLIO_API_URL` and `ROCKET_PORT`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = lookup("PORTFOLIO_API_URL") {
            self.api_base_url = url;
        }
        if let Some(port) = lookup("ROCKET_PORT") {
            self.port = port
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("ROCKET_PORT must be a valid port number"))?;
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    pub fn service_client(&self) -> Result<Arc<ServiceClient>> {
        Ok(Arc::new(ServiceClient::new(
            self.api_base_url.clone(),
            self.timeout(),
        )?))
    }

    pub fn cv_loader(&self, client: Arc<ServiceClient>) -> CvLoader {
        let fallback: Box<dyn CvSource> = match &self.fallback_cv {
            FallbackSource::Url(url) => Box::new(HttpCvSource::new(client.clone(), url.clone())),
            FallbackSource::Path(path) => Box::new(FileCvSource::new(path.clone())),
        };
        CvLoader::new(
            Box::new(HttpCvSource::new(client, self.cv_endpoint.clone())),
            fallback,
        )
    }
}
