//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub module: String,
    pub version: String,
    pub model: String,
    pub uptime_seconds: u64,
}

/// GET /health
///
/// Public; never requires the shared token.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = Utc::now().signed_duration_since(state.startup_time);

    Json(HealthResponse {
        ok: true,
        module: "alignpath-agent".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: state.tutor.model_name().to_string(),
        uptime_seconds: uptime.num_seconds().max(0) as u64,
    })
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
