//! Study performance analysis endpoint

use axum::{extract::State, Json};
use tracing::info;

use crate::error::ApiResult;
use crate::models::{StudyAnalysisResponse, WrongAnswer};
use crate::AppState;

/// POST /analyze-performance
///
/// Body is the ordered list of wrong answers. Unusable model output is served
/// as the fixed fallback analysis with status 200.
pub async fn analyze_performance(
    State(state): State<AppState>,
    Json(answers): Json<Vec<WrongAnswer>>,
) -> ApiResult<Json<StudyAnalysisResponse>> {
    info!(answers = answers.len(), "Analyzing study performance");

    let validated = state.tutor.analyze_performance(&answers).await?;
    Ok(Json(validated.into_inner()))
}
