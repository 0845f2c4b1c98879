//! Text model invocation contract

use async_trait::async_trait;
use thiserror::Error;

/// Upstream model failures
///
/// Every variant is surfaced to callers as 502 Bad Gateway. There is no retry.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Model call timed out after {0}s")]
    Timeout(u64),

    #[error("Model API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Failed to parse model response: {0}")]
    Parse(String),

    #[error("Model returned empty response")]
    EmptyResponse,
}

/// A generative model that turns one prompt into one reply
///
/// Implementations must never return an empty or whitespace-only reply; that
/// case is [`ModelError::EmptyResponse`].
#[async_trait]
pub trait TextModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError>;

    /// Model identifier for logs
    fn model_name(&self) -> &str;
}
