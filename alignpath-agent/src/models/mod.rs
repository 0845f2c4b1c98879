//! Request and response models for the text-analysis service
//!
//! Response types implement [`ResponseSchema`](alignpath_common::normalize::ResponseSchema):
//! their canonical shape is rendered into prompts and used to validate model
//! replies.

pub mod analysis;
pub mod lesson;

pub use analysis::{Priority, StudyAnalysisResponse, StudyRecommendation, WrongAnswer};
pub use lesson::{
    LessonInput, PersonalizeLessonRequest, PersonalizedLesson, PersonalizedLessonResponse,
    UserPreferences,
};
