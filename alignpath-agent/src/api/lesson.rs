//! Lesson personalization endpoint

use axum::{extract::State, Json};
use tracing::info;

use crate::error::ApiResult;
use crate::models::{PersonalizeLessonRequest, PersonalizedLessonResponse};
use crate::AppState;

/// POST /personalize-lesson
pub async fn personalize_lesson(
    State(state): State<AppState>,
    Json(request): Json<PersonalizeLessonRequest>,
) -> ApiResult<Json<PersonalizedLessonResponse>> {
    info!(
        lesson_chars = request.lesson.lesson_text.len(),
        learning_style = %request.preferences.preferred_learning_style,
        "Personalizing lesson"
    );

    let validated = state.tutor.personalize_lesson(&request).await?;
    Ok(Json(validated.into_inner()))
}
