//! Shared-token request authorization
//!
//! A service may be started with an optional shared secret. When one is
//! configured, callers must present `Authorization: Bearer <secret>`; when none
//! is configured every request is accepted (open mode).
//!
//! The comparison is plain string equality on the whole header value.

use std::fmt;

// ========================================
// Error Types
// ========================================

/// Authorization failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiAuthError {
    /// A token is configured but the request carried no `Authorization` header
    MissingHeader,

    /// The header did not equal `Bearer <secret>`
    InvalidToken,
}

impl fmt::Display for ApiAuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiAuthError::MissingHeader => write!(f, "Missing Authorization header"),
            ApiAuthError::InvalidToken => write!(f, "Invalid bearer token"),
        }
    }
}

impl std::error::Error for ApiAuthError {}

// ========================================
// Shared Token
// ========================================

/// Pre-shared secret configured at process start
///
/// The secret itself is never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct SharedToken(String);

impl SharedToken {
    /// Build a token from optional configuration
    ///
    /// Only an absent or empty value counts as "not configured". Any other
    /// value, whitespace included, is kept exactly as given.
    ///
    /// # Examples
    ///
    /// ```
    /// use alignpath_common::api::SharedToken;
    ///
    /// assert!(SharedToken::from_config(Some("xyz".to_string())).is_some());
    /// assert!(SharedToken::from_config(Some("   ".to_string())).is_some());
    /// assert!(SharedToken::from_config(Some(String::new())).is_none());
    /// assert!(SharedToken::from_config(None).is_none());
    /// ```
    pub fn from_config(value: Option<String>) -> Option<Self> {
        value.filter(|v| !v.is_empty()).map(SharedToken)
    }

    /// Whether the secret has leading or trailing whitespace
    pub fn has_surrounding_whitespace(&self) -> bool {
        self.0.trim() != self.0
    }

    /// The exact header value a caller must send
    pub fn expected_header(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for SharedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedToken(***)")
    }
}

// ========================================
// Authorization Gate
// ========================================

/// Decide whether a request may proceed
///
/// # Examples
///
/// ```
/// use alignpath_common::api::{authorize, ApiAuthError, SharedToken};
///
/// let token = SharedToken::from_config(Some("xyz".to_string()));
/// assert!(authorize(token.as_ref(), Some("Bearer xyz")).is_ok());
/// assert_eq!(
///     authorize(token.as_ref(), Some("Bearer wrong")),
///     Err(ApiAuthError::InvalidToken)
/// );
///
/// // Open mode
/// assert!(authorize(None, None).is_ok());
/// ```
pub fn authorize(token: Option<&SharedToken>, header: Option<&str>) -> Result<(), ApiAuthError> {
    let Some(token) = token else {
        return Ok(());
    };

    match header {
        None => Err(ApiAuthError::MissingHeader),
        Some(value) if value == token.expected_header() => Ok(()),
        Some(_) => Err(ApiAuthError::InvalidToken),
    }
}

// ========================================
// Tests
// ========================================
