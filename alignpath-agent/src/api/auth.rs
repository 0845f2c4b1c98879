//! Shared-token middleware
//!
//! Applied to protected routes only. Runs before the body is read, so a
//! rejected request never reaches JSON parsing or the model.

use alignpath_common::api::authorize;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::error::ApiError;
use crate::AppState;

pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    if let Err(e) = authorize(state.shared_token.as_ref(), header) {
        warn!(path = %request.uri().path(), reason = %e, "Rejected unauthorized request");
        return Err(e.into());
    }

    Ok(next.run(request).await)
}
