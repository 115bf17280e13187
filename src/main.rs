//! Data Science Mentor - level-aware LLM tutor
//!
//! Serves a single chat page and forwards each question, together with the
//! session transcript and a level-dependent instruction, to a hosted model.

mod api;
mod config;
mod llm;
mod runtime;
mod state_machine;
mod system_prompt;
mod tutor;

use api::{create_router, AppState};
use config::ServerConfig;
use llm::{LlmConfig, ModelRegistry};
use runtime::{spawn_idle_sweeper, RegistryLlmClient, SessionManager};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ds_mentor=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = ServerConfig::from_env();

    // Initialize LLM registry
    let llm_config = LlmConfig::from_env();
    let llm_registry = Arc::new(ModelRegistry::new(&llm_config));

    if llm_registry.has_models() {
        tracing::info!(
            models = ?llm_registry.available_models(),
            default = %llm_registry.default_model_id(),
            "LLM registry initialized"
        );
    } else {
        tracing::warn!("No LLM credentials configured. Set GOOGLE_API_KEY or LLM_GATEWAY.");
    }

    tracing::info!(
        subject = %config.subject,
        temperature = config.temperature,
        history_limit = ?config.history_limit,
        session_ttl_secs = ?config.session_ttl.map(|ttl| ttl.as_secs()),
        "Tutor configured"
    );

    let sessions = Arc::new(
        SessionManager::new(
            Arc::new(RegistryLlmClient::new(llm_registry.clone())),
            config.assembler(),
        )
        .with_idle_ttl(config.session_ttl),
    );

    // Sweep at most once a minute, more often for short TTLs
    if let Some(ttl) = config.session_ttl {
        spawn_idle_sweeper(sessions.clone(), ttl.min(Duration::from_secs(60)));
    }

    let state = AppState::new(sessions, llm_registry);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new().gzip(true).br(true).deflate(true);

    let app = create_router(state).layer(cors).layer(compression);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Data Science Mentor listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}
