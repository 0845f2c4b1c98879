//! Response normalization for model output
//!
//! Turns a model's raw reply into a fully populated, typed response:
//! [`extract`] recovers JSON from the text, [`schema`] declares what a valid
//! document looks like, and [`validate`] either accepts the recovered document
//! or substitutes the response type's fallback.

pub mod extract;
pub mod schema;
pub mod validate;

pub use extract::{extract_json, ExtractStrategy, Extraction};
pub use schema::{Field, ResponseSchema, SchemaViolation, Shape};
pub use validate::{
    normalize_reply, validate, FallbackReason, ResponseSource, Validated, ValidationError,
};
