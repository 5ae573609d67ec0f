//! Digital Farmer - Backend Server

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use chrono::Utc;
use digital_farmer::{
    create_app,
    external::{AgronomyProvider, GeminiClient},
    AppState, Config, FarmService,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "digital_farmer=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting Digital Farmer Server");
    tracing::info!("Environment: {}", config.environment);

    let provider: Option<Arc<dyn AgronomyProvider>> = match GeminiClient::from_config(&config.ai) {
        Some(client) => {
            let client = client.context("Failed to build AI provider client")?;
            tracing::info!("AI provider configured (model {})", config.ai.model);
            Some(Arc::new(client))
        }
        None => {
            tracing::warn!("No AI API key configured; using local fallbacks for every provider call");
            None
        }
    };

    let farm = FarmService::new(provider, config.farm.default_location.clone());
    if config.farm.seed_demo {
        farm.seed_demo(Utc::now().date_naive()).await?;
    }

    // Create application state
    let state = AppState {
        farm,
        config: Arc::new(config.clone()),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let host: std::net::IpAddr = config
        .server
        .host
        .parse()
        .context("Invalid server host")?;
    let addr = SocketAddr::new(host, config.server.port);
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
