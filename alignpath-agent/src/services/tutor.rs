//! Tutor pipeline
//!
//! One request, one model call:
//! PromptTask::render → TextModel::generate → extract_json → validate.
//!
//! Upstream failures propagate; unusable replies become the fallback document.

use alignpath_common::normalize::{
    extract_json, validate, ResponseSchema, ResponseSource, Validated, ValidationError,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use super::text_model::{ModelError, TextModel};
use crate::models::{
    PersonalizeLessonRequest, PersonalizedLessonResponse, StudyAnalysisResponse, WrongAnswer,
};
use crate::prompt::PromptTask;

#[derive(Debug, Error)]
pub enum TutorError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Runs analysis and personalization tasks against a text model
#[derive(Clone)]
pub struct Tutor {
    model: Arc<dyn TextModel>,
}

impl Tutor {
    pub fn new(model: Arc<dyn TextModel>) -> Self {
        Self { model }
    }

    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    pub async fn analyze_performance(
        &self,
        answers: &[WrongAnswer],
    ) -> Result<Validated<StudyAnalysisResponse>, TutorError> {
        self.run(PromptTask::PerformanceAnalysis(answers)).await
    }

    pub async fn personalize_lesson(
        &self,
        request: &PersonalizeLessonRequest,
    ) -> Result<Validated<PersonalizedLessonResponse>, TutorError> {
        self.run(PromptTask::LessonPersonalization {
            preferences: &request.preferences,
            lesson_text: &request.lesson.lesson_text,
        })
        .await
    }

    async fn run<T: ResponseSchema>(
        &self,
        task: PromptTask<'_>,
    ) -> Result<Validated<T>, TutorError> {
        let prompt = task.render();
        let reply = self.model.generate(&prompt).await?;
        let validated = validate::<T>(extract_json(&reply))?;

        match &validated.source {
            ResponseSource::Model(strategy) => info!(
                task = task.name(),
                strategy = strategy.name(),
                "Model reply validated"
            ),
            ResponseSource::Fallback(reason) => info!(
                task = task.name(),
                reason = ?reason,
                "Served fallback document"
            ),
        }

        Ok(validated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LessonInput, Priority, UserPreferences};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replays a canned reply and records the prompt it was given
    struct CannedModel {
        reply: Result<String, fn() -> ModelError>,
        prompts: Mutex<Vec<String>>,
    }

    impl CannedModel {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn failing(error: fn() -> ModelError) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(error),
                prompts: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl TextModel for CannedModel {
        async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Ok(reply) => Ok(reply.clone()),
                Err(make) => Err(make()),
            }
        }

        fn model_name(&self) -> &str {
            "canned"
        }
    }

    fn wrong_answer() -> WrongAnswer {
        WrongAnswer {
            question: "Capital of France?".to_string(),
            user_answer: "Lyon".to_string(),
            correct_answer: "Paris".to_string(),
            lesson_topic: "Geography".to_string(),
        }
    }

    #[tokio::test]
    async fn test_analysis_uses_model_reply() {
        let model = CannedModel::replying(
            r#"```json
{"overall_performance": "Good", "weak_areas": ["Capitals"],
 "recommendations": [{"topic": "Capitals", "reason": "Missed Paris", "priority": "medium"}],
 "study_plan": "Flashcards"}
```"#,
        );
        let tutor = Tutor::new(model.clone());

        let validated = tutor.analyze_performance(&[wrong_answer()]).await.unwrap();
        assert!(!validated.is_fallback());
        assert_eq!(validated.value.recommendations[0].priority, Priority::Medium);

        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("- Correct Answer: Paris"));
    }

    #[tokio::test]
    async fn test_prose_reply_serves_fallback() {
        let tutor = Tutor::new(CannedModel::replying("I am unable to help with that."));
        let validated = tutor.analyze_performance(&[wrong_answer()]).await.unwrap();
        assert!(validated.is_fallback());
        assert_eq!(validated.value, StudyAnalysisResponse::fallback());
    }

    #[tokio::test]
    async fn test_model_error_propagates() {
        let tutor = Tutor::new(CannedModel::failing(|| ModelError::EmptyResponse));
        let result = tutor.analyze_performance(&[wrong_answer()]).await;
        assert!(matches!(
            result,
            Err(TutorError::Model(ModelError::EmptyResponse))
        ));
    }

    #[tokio::test]
    async fn test_personalization_prompt_carries_lesson() {
        let model = CannedModel::replying("{}");
        let tutor = Tutor::new(model.clone());
        let request = PersonalizeLessonRequest {
            preferences: UserPreferences {
                hobbies: "music".to_string(),
                preferred_learning_style: "auditory".to_string(),
                bio: "Loves guitar".to_string(),
            },
            lesson: LessonInput {
                lesson_text: "Sound waves travel through air.".to_string(),
            },
        };

        let validated = tutor.personalize_lesson(&request).await.unwrap();
        assert!(validated.is_fallback());
        assert_eq!(validated.value.lesson.learning_approach, "Standard approach");

        let prompts = model.prompts.lock().unwrap();
        assert!(prompts[0].contains("Sound waves travel through air."));
        assert!(prompts[0].contains("- Hobbies: music"));
    }
}
