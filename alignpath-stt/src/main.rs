//! alignpath-stt - speech-to-text microservice
//!
//! Routes:
//! - `GET /health`
//! - `POST /transcribe`

use alignpath_common::config::TomlConfig;
use alignpath_stt::config::{Args, SttConfig};
use alignpath_stt::{build_router, init_model, AppState};
use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,alignpath_stt=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting alignpath-stt v{} [{}] built {} ({})",
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
    let config = SttConfig::resolve(args, toml.stt).context("Invalid configuration")?;

    info!(
        model = %config.model.file_name(),
        dir = %config.model.model_dir.display(),
        max_upload_bytes = config.max_upload_bytes,
        "Transcription settings"
    );

    // Loading can take seconds; keep it off the async workers
    let model_config = config.clone();
    let model = tokio::task::spawn_blocking(move || init_model(&model_config))
        .await
        .context("Model initialization task failed")?;

    let app = build_router(AppState::new(model, config.max_upload_bytes));

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
