mod config;
mod errors;
mod llm_client;
mod matching;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values only)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ResumeFit API v{}", env!("CARGO_PKG_VERSION"));

    if config.openai_api_key.is_empty() {
        warn!("OPENAI_API_KEY is not set; provider calls will fail authentication");
    }

    // Initialize LLM client (one instance, shared read-only by every request)
    let llm = LlmClient::new(&config)?;
    match config.llm_timeout {
        Some(timeout) => info!(
            "LLM client initialized (model: {}, timeout: {}s)",
            llm_client::MODEL,
            timeout.as_secs()
        ),
        None => info!(
            "LLM client initialized (model: {}, no timeout)",
            llm_client::MODEL
        ),
    }

    info!(
        "CORS allowed origin: {}",
        config.frontend_origin.to_str().unwrap_or("<non-ascii>")
    );

    let addr = SocketAddr::new(config.host, config.port);

    // Build app state
    let state = AppState {
        llm: Arc::new(llm),
        config,
    };

    // Build router
    let app = build_router(state).layer(TraceLayer::new_for_http());

    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
