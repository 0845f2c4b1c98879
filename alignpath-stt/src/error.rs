//! Error types for alignpath-stt

use alignpath_common::api::ErrorBody;
use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::transcriber::TranscribeError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// No transcription model loaded (503)
    #[error("Transcription model not loaded")]
    ModelUnavailable,

    /// Malformed multipart request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Upload exceeds the configured body limit (413)
    #[error("{0}")]
    PayloadTooLarge(String),

    /// File handling or inference failed (500); the message reaches the caller
    #[error("{0}")]
    Transcription(String),
}

impl From<TranscribeError> for ApiError {
    fn from(err: TranscribeError) -> Self {
        ApiError::Transcription(err.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Transcription(err.to_string())
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        match err.status() {
            StatusCode::PAYLOAD_TOO_LARGE => ApiError::PayloadTooLarge(err.body_text()),
            _ => ApiError::BadRequest(err.body_text()),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::ModelUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Transcription(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::ModelUnavailable => "SERVICE_UNAVAILABLE",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            ApiError::Transcription(_) => "TRANSCRIPTION_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Transcription failed: {}", self);
        }
        (status, Json(ErrorBody::new(self.code(), self.to_string()))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_unavailable_detail() {
        let err = ApiError::ModelUnavailable;
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.to_string(), "Transcription model not loaded");
    }

    #[test]
    fn test_payload_too_large_status() {
        let err = ApiError::PayloadTooLarge("length limit exceeded".to_string());
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(err.code(), "PAYLOAD_TOO_LARGE");
    }

    #[test]
    fn test_transcribe_error_keeps_message() {
        let err = ApiError::from(TranscribeError::Inference("bad tensor".to_string()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "TRANSCRIPTION_ERROR");
        assert_eq!(err.to_string(), "Inference failed: bad tensor");
    }
}
