mod config;
mod errors;
mod evaluation;
mod llm_client;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, EvaluatorConfig};
use crate::evaluation::extractor::PdfTextExtractor;
use crate::evaluation::orchestrator::Evaluator;
use crate::llm_client::OpenAiClient;
use crate::routes::build_router;
use crate::state::AppState;

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

    info!("Starting Fitcheck API v{}", env!("CARGO_PKG_VERSION"));

    // One client serves both the embedding and the reasoning backend
    let backend = Arc::new(
        OpenAiClient::new(
            config.openai_api_key.clone(),
            &config.openai_base_url,
            config.models.clone(),
            config.backend_timeout,
        )
        .context("Failed to build backend HTTP client")?,
    );
    if config.openai_api_key.is_none() {
        warn!("OPENAI_API_KEY is not set; evaluations will fail with BACKEND_UNAVAILABLE");
    }
    info!(
        "Backend client initialized (rubric model: {}, embedding model: {}, timeout: {:?})",
        backend.models().rubric_model,
        backend.models().embedding_model,
        config.backend_timeout
    );

    let evaluator = Evaluator::new(
        Arc::new(PdfTextExtractor),
        backend.clone(),
        backend,
        EvaluatorConfig::default(),
    );
    info!(
        "Evaluator ready: min_words={}, chunk_max_words={}",
        evaluator.config().min_words,
        evaluator.config().chunk_max_words
    );

    let state = AppState {
        evaluator: Arc::new(evaluator),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web form has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
