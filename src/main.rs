use anyhow::Result;
use clap::Parser;
use portfolio::cli::PortfolioCli;
use portfolio::{start_web_server, PortfolioConfig};
use tracing::info;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

#[tokio::main]
async fn main() -> Result<()> {
    Registry::default()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or(EnvFilter::new("portfolio=INFO,rocket::server=OFF")),
        )
        .init();

    let cli = PortfolioCli::parse();

    let mut config = PortfolioConfig::load(cli.config.as_deref())?;
    cli.apply(&mut config);

    info!("Starting portfolio");
    info!(
        "Environment: {}",
        std::env::var("ENVIRONMENT").unwrap_or_else(|_| "local".to_string())
    );
    info!("Fallback CV: {:?}", config.fallback_cv);

    start_web_server(config).await
}
