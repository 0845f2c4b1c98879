//! Services for the text-analysis microservice
//!
//! - [`text_model`]: model invocation contract and its errors
//! - [`gemini_client`]: Gemini `generateContent` over HTTPS
//! - [`tutor`]: prompt → model → extraction → validation pipeline per task

pub mod gemini_client;
pub mod text_model;
pub mod tutor;

pub use gemini_client::{GeminiClient, GeminiConfig};
pub use text_model::{ModelError, TextModel};
pub use tutor::{Tutor, TutorError};
