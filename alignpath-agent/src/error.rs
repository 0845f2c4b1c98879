//! Error types for alignpath-agent
//!
//! Every failure is returned as `{"detail": ..., "code": ...}`.

use alignpath_common::api::{ApiAuthError, ErrorBody};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::services::{ModelError, TutorError};

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or wrong shared token (401)
    #[error("Unauthorized")]
    Unauthorized(#[from] ApiAuthError),

    /// Model call failed or returned nothing usable (502)
    #[error("{0}")]
    BadGateway(#[from] ModelError),

    /// Response construction failed (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<TutorError> for ApiError {
    fn from(err: TutorError) -> Self {
        match err {
            TutorError::Model(e) => ApiError::BadGateway(e),
            TutorError::Validation(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::BadGateway(_) => "BAD_GATEWAY",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(code = self.code(), "{}", self);
        }

        // Internal details stay in the log
        let detail = match &self {
            ApiError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        (status, Json(ErrorBody::new(self.code(), detail))).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use alignpath_common::normalize::ValidationError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(ApiAuthError::InvalidToken).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(ModelError::EmptyResponse).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::from(TutorError::Model(ModelError::Timeout(5))).status(),
            StatusCode::BAD_GATEWAY
        );

        let drift = serde_json::from_str::<u32>("\"x\"").unwrap_err();
        let err = ApiError::from(TutorError::Validation(ValidationError::Construction(drift)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_unauthorized_detail_matches_existing_callers() {
        assert_eq!(
            ApiError::from(ApiAuthError::MissingHeader).to_string(),
            "Unauthorized"
        );
    }

    #[test]
    fn test_empty_response_detail() {
        assert_eq!(
            ApiError::from(ModelError::EmptyResponse).to_string(),
            "Model returned empty response"
        );
    }
}
