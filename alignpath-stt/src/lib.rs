//! alignpath-stt library interface
//!
//! Speech-to-text over an uploaded recording. The model is loaded once at
//! startup into [`AppState::model`]; when it is absent every transcription
//! request is answered with 503.

pub mod api;
pub mod assemble;
pub mod audio;
pub mod config;
pub mod error;
pub mod transcriber;
#[cfg(feature = "whisper")]
pub mod whisper;

pub use crate::error::{ApiError, ApiResult};

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use config::SttConfig;
use transcriber::{load_backend, ModelHandle};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub model: ModelHandle,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(model: ModelHandle, max_upload_bytes: usize) -> Self {
        Self {
            model,
            max_upload_bytes,
        }
    }
}

/// Load the transcription model described by `config`
///
/// Skipped or failed loads yield `None`; the service still starts.
pub fn init_model(config: &SttConfig) -> ModelHandle {
    if config.skip_model_init {
        info!("Skipping model initialization (STT_SKIP_MODEL_INIT)");
        return None;
    }

    match load_backend(&config.model) {
        Ok(model) => {
            info!("Transcription model loaded: {}", model.name());
            Some(model)
        }
        Err(e) => {
            warn!("Transcription model not loaded: {}", e);
            None
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::post;

    Router::new()
        .route("/transcribe", post(api::transcribe))
        .merge(api::health_routes())
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Args;
    use alignpath_common::config::SttToml;

    #[test]
    fn test_skip_flag_leaves_model_empty() {
        let toml = SttToml {
            skip_model_init: Some(true),
            ..SttToml::default()
        };
        let config = SttConfig::resolve(Args::default(), toml).unwrap();
        assert!(init_model(&config).is_none());
    }

    #[test]
    fn test_missing_model_file_leaves_model_empty() {
        let dir = tempfile::tempdir().unwrap();
        let toml = SttToml {
            model_dir: Some(dir.path().display().to_string()),
            ..SttToml::default()
        };
        let config = SttConfig::resolve(Args::default(), toml).unwrap();
        assert!(init_model(&config).is_none());
    }
}
