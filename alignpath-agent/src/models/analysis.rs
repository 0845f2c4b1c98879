//! Performance analysis models

use alignpath_common::normalize::{Field, ResponseSchema, Shape};
use serde::{Deserialize, Serialize};

pub const FALLBACK_OVERALL_PERFORMANCE: &str = "Analysis could not be completed";
pub const FALLBACK_STUDY_PLAN: &str = "Please try again with more specific wrong answers";

/// One missed quiz question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrongAnswer {
    pub question: String,
    pub user_answer: String,
    pub correct_answer: String,
    pub lesson_topic: String,
}

/// Recommendation urgency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub const VALUES: &'static [&'static str] = &["high", "medium", "low"];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyRecommendation {
    pub topic: String,
    pub reason: String,
    pub priority: Priority,
    #[serde(default)]
    pub suggested_resources: Vec<String>,
    #[serde(default)]
    pub practice_exercises: Vec<String>,
}

/// Body of `POST /analyze-performance`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyAnalysisResponse {
    pub overall_performance: String,
    #[serde(default)]
    pub weak_areas: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<StudyRecommendation>,
    pub study_plan: String,
}

impl StudyRecommendation {
    fn shape() -> Shape {
        Shape::Object(vec![
            Field::required("topic", Shape::Text("Specific topic to focus on")),
            Field::required(
                "reason",
                Shape::Text("Why this topic needs attention based on wrong answers"),
            ),
            Field::required("priority", Shape::Choice(Priority::VALUES)),
            Field::optional(
                "suggested_resources",
                Shape::TextList(&["Resource 1 for this topic", "Resource 2 for this topic"]),
            ),
            Field::optional(
                "practice_exercises",
                Shape::TextList(&[
                    "Exercise 1 to practice this topic",
                    "Exercise 2 to practice this topic",
                ]),
            ),
        ])
    }
}

impl ResponseSchema for StudyAnalysisResponse {
    fn shape() -> Shape {
        Shape::Object(vec![
            Field::required(
                "overall_performance",
                Shape::Text(
                    "Brief assessment of overall performance (e.g., 'Good understanding of basics but needs work on advanced concepts')",
                ),
            ),
            Field::optional(
                "weak_areas",
                Shape::TextList(&[
                    "Area 1 that needs improvement",
                    "Area 2 that needs improvement",
                    "Area 3 that needs improvement",
                ]),
            ),
            Field::optional(
                "recommendations",
                Shape::List(Box::new(StudyRecommendation::shape())),
            ),
            Field::required(
                "study_plan",
                Shape::Text("A step-by-step study plan to address the identified weaknesses"),
            ),
        ])
    }

    fn fallback() -> Self {
        Self {
            overall_performance: FALLBACK_OVERALL_PERFORMANCE.to_string(),
            weak_areas: Vec::new(),
            recommendations: Vec::new(),
            study_plan: FALLBACK_STUDY_PLAN.to_string(),
        }
    }
}
