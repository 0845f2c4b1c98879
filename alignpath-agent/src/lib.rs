//! alignpath-agent library interface
//!
//! Study performance analysis and lesson personalization over a generative
//! text model. The binary wires [`build_router`] to a [`GeminiClient`];
//! tests wire it to an in-process fake.
//!
//! [`GeminiClient`]: services::GeminiClient

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod prompt;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use alignpath_common::api::SharedToken;
use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use services::{TextModel, Tutor};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub tutor: Tutor,
    /// `None` accepts every request
    pub shared_token: Option<SharedToken>,
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(model: Arc<dyn TextModel>, shared_token: Option<SharedToken>) -> Self {
        Self {
            tutor: Tutor::new(model),
            shared_token,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
///
/// `/health` is public; the model-backed routes sit behind the shared token.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::post;

    let protected = Router::new()
        .route("/analyze-performance", post(api::analyze_performance))
        .route("/personalize-lesson", post(api::personalize_lesson))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth_middleware,
        ));

    Router::new()
        .merge(protected)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
