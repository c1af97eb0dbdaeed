mod ai;
mod auth;
mod config;
mod db;
mod errors;
mod extract;
mod llm_client;
mod models;
mod resumes;
mod routes;
mod state;
mod templates;
mod users;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::otp::LogOtpSender;
use crate::config::{AppEnv, Config};
use crate::db::{create_pool, run_migrations};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    run_migrations(&db).await?;

    // Initialize LLM client
    let llm = LlmClient::new(config.gemini_api_key.clone(), config.gemini_api_base.clone())?;
    if llm.is_configured() {
        info!("LLM client initialized (model: {})", llm_client::MODEL);
    } else {
        warn!("GEMINI_API_KEY not set; AI routes will report a missing key");
    }

    if config.app_env == AppEnv::Development {
        match config.dev_fallback_user() {
            Some(id) => warn!("Development mode: token-less requests act as user {id}"),
            None => info!("Development mode without DEV_USER_ID; all protected routes need a token"),
        }
    }

    let state = AppState {
        db,
        llm,
        config: config.clone(),
        otp_sender: Arc::new(LogOtpSender),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
