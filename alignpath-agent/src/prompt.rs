//! Prompt construction
//!
//! Each task renders a fixed instruction string: a persona preamble, the input
//! as labeled text, a numbered task list, and the response schema example. The
//! schema example comes from the response type's canonical
//! [`Shape`](alignpath_common::normalize::Shape), the same definition the
//! validator applies to the reply.

use alignpath_common::normalize::ResponseSchema;
use std::fmt::Write;

use crate::models::{
    PersonalizedLessonResponse, StudyAnalysisResponse, UserPreferences, WrongAnswer,
};

const SCHEMA_INTRO: &str = "Respond in pure JSON matching this schema:";

const ANALYSIS_PREAMBLE: &str = "You are an expert educational AI that analyzes student performance and provides personalized study recommendations.";

const ANALYSIS_TASKS: &[&str] = &[
    "Overall performance assessment",
    "Identify weak areas and knowledge gaps",
    "Suggest specific topics to focus on or revise",
    "Create a personalized study plan",
    "Provide specific resources and practice exercises",
];

const LESSON_PREAMBLE: &str =
    "You are an expert educational AI that personalizes lessons based on user preferences.";

const LESSON_TASKS: &[&str] = &[
    "Adapts the content to match their learning style",
    "Incorporates examples from their hobbies and interests",
    "Uses language and references that resonate with their background",
    "Provides practical examples they can relate to",
    "Suggests next steps based on their profile",
];

/// A prompt-producing task and its input
#[derive(Debug, Clone, Copy)]
pub enum PromptTask<'a> {
    PerformanceAnalysis(&'a [WrongAnswer]),
    LessonPersonalization {
        preferences: &'a UserPreferences,
        lesson_text: &'a str,
    },
}

impl PromptTask<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            PromptTask::PerformanceAnalysis(_) => "performance_analysis",
            PromptTask::LessonPersonalization { .. } => "lesson_personalization",
        }
    }

    /// Render the full instruction string
    pub fn render(&self) -> String {
        match self {
            PromptTask::PerformanceAnalysis(answers) => render_analysis(answers),
            PromptTask::LessonPersonalization {
                preferences,
                lesson_text,
            } => render_lesson(preferences, lesson_text),
        }
    }
}

fn render_analysis(answers: &[WrongAnswer]) -> String {
    let mut prompt = String::new();
    let _ = writeln!(prompt, "{}\n", ANALYSIS_PREAMBLE);
    let _ = writeln!(prompt, "Wrong Answers Analysis:");
    for (i, answer) in answers.iter().enumerate() {
        let _ = writeln!(prompt, "\nQuestion {}:", i + 1);
        let _ = writeln!(prompt, "- Topic: {}", answer.lesson_topic);
        let _ = writeln!(prompt, "- Question: {}", answer.question);
        let _ = writeln!(prompt, "- User's Answer: {}", answer.user_answer);
        let _ = writeln!(prompt, "- Correct Answer: {}", answer.correct_answer);
    }
    prompt.push('\n');
    push_tasks(&mut prompt, "Analyze these wrong answers and provide:", ANALYSIS_TASKS);
    push_schema::<StudyAnalysisResponse>(&mut prompt);
    prompt
}

fn render_lesson(preferences: &UserPreferences, lesson_text: &str) -> String {
    let mut prompt = String::new();
    let _ = writeln!(prompt, "{}\n", LESSON_PREAMBLE);
    let _ = writeln!(prompt, "User Profile:");
    let _ = writeln!(prompt, "- Hobbies: {}", preferences.hobbies);
    let _ = writeln!(
        prompt,
        "- Preferred Learning Style: {}",
        preferences.preferred_learning_style
    );
    let _ = writeln!(prompt, "- Bio: {}\n", preferences.bio);
    let _ = writeln!(prompt, "Original Lesson:");
    let _ = writeln!(prompt, "{}\n", lesson_text);
    push_tasks(
        &mut prompt,
        "Create a personalized version of this lesson that:",
        LESSON_TASKS,
    );
    push_schema::<PersonalizedLessonResponse>(&mut prompt);
    prompt
}

fn push_tasks(prompt: &mut String, lead: &str, tasks: &[&str]) {
    let _ = writeln!(prompt, "Task:");
    let _ = writeln!(prompt, "{}", lead);
    for (i, task) in tasks.iter().enumerate() {
        let _ = writeln!(prompt, "{}. {}", i + 1, task);
    }
    prompt.push('\n');
}

fn push_schema<T: ResponseSchema>(prompt: &mut String) {
    let _ = writeln!(prompt, "{}\n", SCHEMA_INTRO);
    let _ = writeln!(prompt, "{}", T::shape().render());
}
