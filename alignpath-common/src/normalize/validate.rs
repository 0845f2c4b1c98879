//! Fallback validation of recovered model output
//!
//! Malformed upstream data never becomes an error here: a missing or
//! non-conforming document is replaced by [`ResponseSchema::fallback`]. The
//! only error is [`ValidationError::Construction`], raised when a document that
//! passed [`Shape::conform`](super::Shape::conform) still cannot be built into
//! the target type, which means the declared shape and the Rust type disagree.

use thiserror::Error;
use tracing::warn;

use super::extract::{extract_json, ExtractStrategy, Extraction};
use super::schema::{ResponseSchema, SchemaViolation};

/// Shape and type disagree for a conforming document
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Response construction failed: {0}")]
    Construction(#[from] serde_json::Error),
}

/// Why the fallback document was used
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// No JSON could be recovered from the reply
    NotFound,
    /// JSON was recovered but did not match the schema
    SchemaViolation(SchemaViolation),
}

/// Where a validated response came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseSource {
    Model(ExtractStrategy),
    Fallback(FallbackReason),
}

/// Fully populated response plus its provenance
#[derive(Debug, Clone)]
pub struct Validated<T> {
    pub value: T,
    pub source: ResponseSource,
}

impl<T> Validated<T> {
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, ResponseSource::Fallback(_))
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

/// Produce a typed response from an extraction result
pub fn validate<T: ResponseSchema>(
    extraction: Extraction,
) -> Result<Validated<T>, ValidationError> {
    let (value, strategy) = match extraction {
        Extraction::Found { value, strategy } => (value, strategy),
        Extraction::NotFound => {
            warn!("No JSON recovered from model reply, using fallback document");
            return Ok(fallback(FallbackReason::NotFound));
        }
    };

    match T::shape().conform(&value) {
        Ok(normalized) => Ok(Validated {
            value: serde_json::from_value(normalized)?,
            source: ResponseSource::Model(strategy),
        }),
        Err(violation) => {
            warn!(%violation, "Model reply does not match schema, using fallback document");
            Ok(fallback(FallbackReason::SchemaViolation(violation)))
        }
    }
}

/// Extract and validate in one step
pub fn normalize_reply<T: ResponseSchema>(reply: &str) -> Result<Validated<T>, ValidationError> {
    validate(extract_json(reply))
}

fn fallback<T: ResponseSchema>(reason: FallbackReason) -> Validated<T> {
    Validated {
        value: T::fallback(),
        source: ResponseSource::Fallback(reason),
    }
}
