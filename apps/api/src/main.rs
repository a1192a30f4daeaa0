mod auth;
mod config;
mod db;
mod documents;
mod errors;
mod llm_client;
mod models;
mod recommendation;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::recommendation::analyzer::LlmSemanticAnalyzer;
use crate::recommendation::repository::PgInstitutionSource;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("yeirin_api={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting yeirin-api v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (read-only credentials)
    let pool = create_pool(&config.database_url).await?;

    // Initialize LLM client
    let llm = LlmClient::new(config.openai_api_key.clone(), config.openai_model.clone());
    info!("LLM client initialized (model: {})", config.openai_model);

    // Plain HTTP client for the Gotenberg conversion proxy
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(60))
        .build()?;

    // Wire pipeline collaborators behind their seams
    let analyzer = Arc::new(LlmSemanticAnalyzer::new(
        llm.clone(),
        Duration::from_secs(config.analysis_timeout_secs),
    ));
    let institutions = Arc::new(PgInstitutionSource::new(pool));

    let state = AppState {
        llm,
        http,
        config: config.clone(),
        analyzer,
        institutions,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // internal service behind the gateway

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
