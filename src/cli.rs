// src/cli.rs
use crate::config::PortfolioConfig;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "portfolio")]
#[command(about = "Serve the bilingual portfolio page and its chat assistant")]
pub struct PortfolioCli {
    /// YAML configuration file
    #[arg(long, env = "PORTFOLIO_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub port: Option<u16>,

    /// Base URL of the CV and chat service
    #[arg(long)]
    pub api_url: Option<String>,
}

impl PortfolioCli {
    /// Flags win over the file and the environment.
    pub fn apply(&self, config: &mut PortfolioConfig) {
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(url) = &self.api_url {
            config.api_base_url = url.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let cli = PortfolioCli::parse_from([
            "portfolio",
            "--port",
            "9100",
            "--api-url",
            "http://api:8000",
        ]);
        let mut config = PortfolioConfig::default();
        cli.apply(&mut config);
        assert_eq!(config.port, 9100);
        assert_eq!(config.api_base_url, "http://api:8000");
    }

    #[test]
    fn test_absent_flags_keep_config() {
        let cli = PortfolioCli::parse_from(["portfolio"]);
        let mut config = PortfolioConfig::default();
        cli.apply(&mut config);
        assert_eq!(config, PortfolioConfig::default());
    }
}
