//! Lesson personalization models

use alignpath_common::normalize::{Field, ResponseSchema, Shape};
use serde::{Deserialize, Serialize};

/// Learner profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreferences {
    pub hobbies: String,
    pub preferred_learning_style: String,
    pub bio: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonInput {
    pub lesson_text: String,
}

/// Body of `POST /personalize-lesson`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalizeLessonRequest {
    pub preferences: UserPreferences,
    pub lesson: LessonInput,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalizedLesson {
    pub title: String,
    pub personalized_content: String,
    pub learning_approach: String,
    #[serde(default)]
    pub practical_examples: Vec<String>,
    #[serde(default)]
    pub next_steps: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalizedLessonResponse {
    pub lesson: PersonalizedLesson,
}

impl ResponseSchema for PersonalizedLessonResponse {
    fn shape() -> Shape {
        let lesson = Shape::Object(vec![
            Field::required("title", Shape::Text("Personalized lesson title")),
            Field::required(
                "personalized_content",
                Shape::Text("The main lesson content adapted to their preferences"),
            ),
            Field::required(
                "learning_approach",
                Shape::Text("Explanation of how this lesson is tailored to their learning style"),
            ),
            Field::optional(
                "practical_examples",
                Shape::TextList(&[
                    "Example 1 related to their hobbies",
                    "Example 2 related to their interests",
                    "Example 3 that connects to their background",
                ]),
            ),
            Field::optional(
                "next_steps",
                Shape::TextList(&[
                    "Step 1 based on their profile",
                    "Step 2 tailored to their interests",
                    "Step 3 that builds on their background",
                ]),
            ),
        ]);
        Shape::Object(vec![Field::required("lesson", lesson)])
    }

    fn fallback() -> Self {
        Self {
            lesson: PersonalizedLesson {
                title: "Personalized Lesson".to_string(),
                personalized_content: "Content could not be personalized".to_string(),
                learning_approach: "Standard approach".to_string(),
                practical_examples: Vec::new(),
                next_steps: Vec::new(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alignpath_common::normalize::normalize_reply;

    #[test]
    fn test_request_parses_wire_format() {
        let request: PersonalizeLessonRequest = serde_json::from_str(
            r#"{
                "preferences": {"hobbies": "chess", "preferred_learning_style": "visual", "bio": "grade 9"},
                "lesson": {"lesson_text": "Linear equations"}
            }"#,
        )
        .unwrap();
        assert_eq!(request.preferences.hobbies, "chess");
        assert_eq!(request.lesson.lesson_text, "Linear equations");
    }

    #[test]
    fn test_bare_lesson_object_falls_back() {
        // The lesson must be wrapped in {"lesson": ...}
        let reply = r#"{"title": "T", "personalized_content": "C", "learning_approach": "A"}"#;
        let validated = normalize_reply::<PersonalizedLessonResponse>(reply).unwrap();
        assert!(validated.is_fallback());
        assert_eq!(validated.value.lesson.title, "Personalized Lesson");
    }

    #[test]
    fn test_wrapped_lesson_accepted() {
        let reply = r#"Sure: {"lesson": {"title": "Chess and Algebra", "personalized_content": "C", "learning_approach": "Visual", "next_steps": ["Practice"]}}"#;
        let lesson = normalize_reply::<PersonalizedLessonResponse>(reply)
            .unwrap()
            .into_inner()
            .lesson;
        assert_eq!(lesson.title, "Chess and Algebra");
        assert!(lesson.practical_examples.is_empty());
        assert_eq!(lesson.next_steps, vec!["Practice".to_string()]);
    }
}
