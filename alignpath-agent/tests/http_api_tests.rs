//! HTTP API integration tests
//!
//! The router is driven in-process with a scripted text model.

use alignpath_agent::models::{PersonalizedLessonResponse, StudyAnalysisResponse};
use alignpath_agent::services::{ModelError, TextModel};
use alignpath_agent::{build_router, AppState};
use alignpath_common::api::SharedToken;
use alignpath_common::normalize::ResponseSchema;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

/// Text model that returns a fixed reply and counts calls
struct ScriptedModel {
    reply: Option<String>,
    calls: AtomicUsize,
}

impl ScriptedModel {
    fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(reply.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    fn empty() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextModel for ScriptedModel {
    async fn generate(&self, _prompt: &str) -> Result<String, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone().ok_or(ModelError::EmptyResponse)
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

fn app(model: Arc<ScriptedModel>, token: Option<&str>) -> Router {
    let token = SharedToken::from_config(token.map(str::to_string));
    build_router(AppState::new(model, token))
}

fn post_json(uri: &str, body: Value, authorization: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn wrong_answers() -> Value {
    json!([
        {
            "question": "What is 7 x 8?",
            "user_answer": "54",
            "correct_answer": "56",
            "lesson_topic": "Multiplication"
        }
    ])
}

fn lesson_request() -> Value {
    json!({
        "preferences": {
            "hobbies": "basketball",
            "preferred_learning_style": "kinesthetic",
            "bio": "Likes hands-on projects"
        },
        "lesson": {"lesson_text": "Photosynthesis converts light into chemical energy."}
    })
}

const GOOD_ANALYSIS: &str = r#"Here is the analysis:
```json
{
  "overall_performance": "Solid arithmetic, shaky times tables",
  "weak_areas": ["Multiplication facts"],
  "recommendations": [
    {
      "topic": "Times tables",
      "reason": "Missed 7 x 8",
      "priority": "High",
      "suggested_resources": ["Flashcards"],
      "practice_exercises": ["Skip counting by 7"]
    }
  ],
  "study_plan": "Ten minutes of drills per day"
}
```"#;

// ========================================
// Health
// ========================================

#[tokio::test]
async fn test_health_is_public() {
    let model = ScriptedModel::empty();
    let app = app(model.clone(), Some("xyz"));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["module"], "alignpath-agent");
    assert_eq!(model.calls(), 0);
}

// ========================================
// Authorization
// ========================================

#[tokio::test]
async fn test_missing_token_rejected_before_model_call() {
    let model = ScriptedModel::replying(GOOD_ANALYSIS);
    let app = app(model.clone(), Some("xyz"));

    let response = app
        .oneshot(post_json("/analyze-performance", wrong_answers(), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["detail"], "Unauthorized");
    assert_eq!(body["code"], "UNAUTHORIZED");
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_wrong_token_rejected() {
    let model = ScriptedModel::replying(GOOD_ANALYSIS);
    let app = app(model.clone(), Some("xyz"));

    let response = app
        .oneshot(post_json(
            "/personalize-lesson",
            lesson_request(),
            Some("Bearer wrong"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_lesson_route_requires_token() {
    let model = ScriptedModel::replying("{}");
    let app = app(model.clone(), Some("xyz"));

    let response = app
        .oneshot(post_json("/personalize-lesson", lesson_request(), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_padded_token_must_match_exactly() {
    let model = ScriptedModel::replying(GOOD_ANALYSIS);

    let trimmed = app(model.clone(), Some(" xyz "))
        .oneshot(post_json(
            "/analyze-performance",
            wrong_answers(),
            Some("Bearer xyz"),
        ))
        .await
        .unwrap();
    assert_eq!(trimmed.status(), StatusCode::UNAUTHORIZED);

    let verbatim = app(model.clone(), Some(" xyz "))
        .oneshot(post_json(
            "/analyze-performance",
            wrong_answers(),
            Some("Bearer  xyz "),
        ))
        .await
        .unwrap();
    assert_eq!(verbatim.status(), StatusCode::OK);
    assert_eq!(model.calls(), 1);
}

#[tokio::test]
async fn test_auth_checked_before_body_parsing() {
    let model = ScriptedModel::replying(GOOD_ANALYSIS);
    let app = app(model, Some("xyz"));

    let request = Request::builder()
        .method("POST")
        .uri("/analyze-performance")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_matching_token_accepted() {
    let model = ScriptedModel::replying(GOOD_ANALYSIS);
    let app = app(model.clone(), Some("xyz"));

    let response = app
        .oneshot(post_json(
            "/analyze-performance",
            wrong_answers(),
            Some("Bearer xyz"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(model.calls(), 1);
}

#[tokio::test]
async fn test_open_mode_accepts_any_header() {
    let model = ScriptedModel::replying(GOOD_ANALYSIS);

    for authorization in [None, Some("Bearer anything"), Some("garbage")] {
        let response = app(model.clone(), None)
            .oneshot(post_json("/analyze-performance", wrong_answers(), authorization))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
    assert_eq!(model.calls(), 3);
}

// ========================================
// Analysis
// ========================================

#[tokio::test]
async fn test_analysis_body_conforms_to_schema() {
    let app = app(ScriptedModel::replying(GOOD_ANALYSIS), None);

    let response = app
        .oneshot(post_json("/analyze-performance", wrong_answers(), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    let conformed = StudyAnalysisResponse::shape().conform(&body).unwrap();
    assert_eq!(conformed, body);
    assert_eq!(body["recommendations"][0]["priority"], "high");
    assert_eq!(body["weak_areas"], json!(["Multiplication facts"]));
}

#[tokio::test]
async fn test_prose_reply_serves_fallback_analysis() {
    let app = app(ScriptedModel::replying("Sorry, I cannot do that."), None);

    let response = app
        .oneshot(post_json("/analyze-performance", wrong_answers(), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(
        body,
        json!({
            "overall_performance": "Analysis could not be completed",
            "weak_areas": [],
            "recommendations": [],
            "study_plan": "Please try again with more specific wrong answers"
        })
    );
    assert!(StudyAnalysisResponse::shape().conform(&body).is_ok());
}

#[tokio::test]
async fn test_unknown_priority_serves_fallback() {
    let reply = r#"{"overall_performance": "ok", "weak_areas": [],
        "recommendations": [{"topic": "t", "reason": "r", "priority": "urgent"}],
        "study_plan": "p"}"#;
    let app = app(ScriptedModel::replying(reply), None);

    let response = app
        .oneshot(post_json("/analyze-performance", wrong_answers(), None))
        .await
        .unwrap();

    let body = body_json(response).await;
    assert_eq!(body["overall_performance"], "Analysis could not be completed");
}

#[tokio::test]
async fn test_null_lists_come_back_empty() {
    let reply = r#"{"overall_performance": "ok", "weak_areas": null,
        "recommendations": [{"topic": "t", "reason": "r", "priority": "LOW",
            "suggested_resources": null}],
        "study_plan": "p"}"#;
    let app = app(ScriptedModel::replying(reply), None);

    let response = app
        .oneshot(post_json("/analyze-performance", wrong_answers(), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["overall_performance"], "ok");
    assert_eq!(body["weak_areas"], json!([]));
    assert_eq!(body["recommendations"][0]["priority"], "low");
    assert_eq!(body["recommendations"][0]["suggested_resources"], json!([]));
    assert_eq!(body["recommendations"][0]["practice_exercises"], json!([]));
    assert_eq!(StudyAnalysisResponse::shape().conform(&body).unwrap(), body);
}

#[tokio::test]
async fn test_null_recommendations_come_back_empty() {
    let reply = r#"{"overall_performance": "ok", "recommendations": null, "study_plan": "p"}"#;
    let app = app(ScriptedModel::replying(reply), None);

    let response = app
        .oneshot(post_json("/analyze-performance", wrong_answers(), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["recommendations"], json!([]));
    assert_eq!(body["study_plan"], "p");
    assert_eq!(StudyAnalysisResponse::shape().conform(&body).unwrap(), body);
}

#[tokio::test]
async fn test_empty_model_reply_is_bad_gateway() {
    let app = app(ScriptedModel::empty(), None);

    let response = app
        .oneshot(post_json("/analyze-performance", wrong_answers(), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert_eq!(body["code"], "BAD_GATEWAY");
    assert_eq!(body["detail"], "Model returned empty response");
}

#[tokio::test]
async fn test_empty_answer_list_is_accepted() {
    let model = ScriptedModel::replying("{}");
    let response = app(model.clone(), None)
        .oneshot(post_json("/analyze-performance", json!([]), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(model.calls(), 1);
}

#[tokio::test]
async fn test_malformed_request_body_is_client_error() {
    let model = ScriptedModel::replying(GOOD_ANALYSIS);
    let response = app(model.clone(), None)
        .oneshot(post_json(
            "/analyze-performance",
            json!([{"question": "q"}]),
            None,
        ))
        .await
        .unwrap();

    assert!(response.status().is_client_error());
    assert_eq!(model.calls(), 0);
}

// ========================================
// Personalization
// ========================================

#[tokio::test]
async fn test_personalized_lesson_from_model() {
    let reply = r#"{"lesson": {
        "title": "Photosynthesis on the Court",
        "personalized_content": "Think of chlorophyll as a point guard...",
        "learning_approach": "Hands-on analogies",
        "practical_examples": ["Leaf experiment"],
        "next_steps": ["Grow a plant"],
        "difficulty": "ignored"
    }}"#;
    let app = app(ScriptedModel::replying(reply), None);

    let response = app
        .oneshot(post_json("/personalize-lesson", lesson_request(), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["lesson"]["title"], "Photosynthesis on the Court");
    assert!(body["lesson"].get("difficulty").is_none());
    assert!(PersonalizedLessonResponse::shape().conform(&body).is_ok());
}

#[tokio::test]
async fn test_lesson_fallback_when_lists_have_wrong_type() {
    let reply = r#"{"lesson": {"title": "T", "personalized_content": "C",
        "learning_approach": "A", "practical_examples": "not a list"}}"#;
    let app = app(ScriptedModel::replying(reply), None);

    let response = app
        .oneshot(post_json("/personalize-lesson", lesson_request(), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(
        body,
        json!({"lesson": {
            "title": "Personalized Lesson",
            "personalized_content": "Content could not be personalized",
            "learning_approach": "Standard approach",
            "practical_examples": [],
            "next_steps": []
        }})
    );
    assert_eq!(PersonalizedLessonResponse::shape().conform(&body).unwrap(), body);
}

#[tokio::test]
async fn test_empty_model_reply_on_lesson_is_bad_gateway() {
    let app = app(ScriptedModel::empty(), None);

    let response = app
        .oneshot(post_json("/personalize-lesson", lesson_request(), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert_eq!(body["code"], "BAD_GATEWAY");
    assert_eq!(body["detail"], "Model returned empty response");
}

#[tokio::test]
async fn test_lesson_fallback_when_lesson_is_not_an_object() {
    for reply in [
        r#"{"lesson": null}"#,
        r#"{"lesson": "Photosynthesis, but about basketball"}"#,
        r#"{"lesson": [{"title": "T"}]}"#,
    ] {
        let model = ScriptedModel::replying(reply);
        let response = app(model.clone(), None)
            .oneshot(post_json("/personalize-lesson", lesson_request(), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK, "reply {}", reply);
        let body = body_json(response).await;
        assert_eq!(body["lesson"]["title"], "Personalized Lesson", "reply {}", reply);
        assert_eq!(PersonalizedLessonResponse::shape().conform(&body).unwrap(), body);
        assert_eq!(model.calls(), 1);
    }
}
