//! Shared API response types

use serde::{Deserialize, Serialize};

/// Error envelope returned by every AlignPath service
///
/// `detail` carries the human-readable message (the key existing callers
/// already read); `code` is a stable machine-readable identifier.
///
/// # Examples
///
/// ```
/// use alignpath_common::api::ErrorBody;
///
/// let body = ErrorBody::new("UNAUTHORIZED", "Unauthorized");
/// let json = serde_json::to_value(&body).unwrap();
/// assert_eq!(json["detail"], "Unauthorized");
/// assert_eq!(json["code"], "UNAUTHORIZED");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
    pub code: String,
}

impl ErrorBody {
    pub fn new(code: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            code: code.into(),
        }
    }
}
