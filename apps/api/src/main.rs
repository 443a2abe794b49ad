mod analysis;
mod config;
mod db;
mod errors;
mod extraction;
mod models;
mod providers;
mod routes;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::orchestrator::{AnalysisOrchestrator, DEFAULT_PROVIDER};
use crate::config::Config;
use crate::db::create_pool;
use crate::providers::http::HttpAnalyst;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{AnalysisStore, MemoryStore, PgStore};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Matcher API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize analysis store
    let store: Arc<dyn AnalysisStore> = match &config.database_url {
        Some(url) => Arc::new(PgStore::new(create_pool(url).await?)),
        None => {
            warn!("DATABASE_URL not set; analyses are kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };

    // Initialize provider client and orchestrator
    let analyst = HttpAnalyst::new(config.provider_timeout, config.public_url.clone())
        .context("Failed to build provider HTTP client")?;
    if config.default_provider_key.is_none() {
        warn!("No default {DEFAULT_PROVIDER} key configured; requests without apiSettings use text similarity");
    }
    let orchestrator = AnalysisOrchestrator::new(
        Arc::new(analyst),
        config.default_provider_key.clone(),
        config.provider_timeout,
    );
    info!(
        "Analysis orchestrator initialized (provider timeout: {:?})",
        config.provider_timeout
    );

    let state = AppState {
        store,
        orchestrator,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS to the deployed frontend origin

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
