//! alignpath-agent - study analysis microservice
//!
//! Routes:
//! - `GET /health`
//! - `POST /analyze-performance`
//! - `POST /personalize-lesson`

use alignpath_agent::config::{AgentConfig, Args};
use alignpath_agent::services::GeminiClient;
use alignpath_agent::{build_router, AppState};
use alignpath_common::config::TomlConfig;
use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Missing .env is normal outside development
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,alignpath_agent=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting alignpath-agent v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    if let Ok(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }

    let args = Args::parse();
    let toml = TomlConfig::load_optional(args.config.as_deref())
        .context("Failed to load config file")?;
    let config = AgentConfig::resolve(args, toml.agent).context("Invalid configuration")?;

    info!(
        model = %config.gemini.model,
        timeout_secs = config.gemini.timeout.map(|t| t.as_secs()).unwrap_or(0),
        "Text model configured"
    );
    match &config.shared_token {
        Some(_) => info!("Authorization: shared token required"),
        None => info!("Authorization: open mode (no shared token configured)"),
    }

    let client = GeminiClient::new(config.gemini.clone()).context("Failed to build Gemini client")?;
    let state = AppState::new(Arc::new(client), config.shared_token.clone());
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;
    info!("Listening on http://{}", config.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received terminate signal, shutting down"),
    }
}
