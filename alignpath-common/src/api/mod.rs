//! API module for shared HTTP API functionality
//!
//! Provides the request authorization gate and the error envelope used by both
//! AlignPath microservices:
//! - alignpath-agent (text analysis)
//! - alignpath-stt (speech to text)
//!
//! # Design Principle
//!
//! This module contains ONLY pure functions and shared types. Each service wraps
//! them with its own Axum middleware and `IntoResponse` impls.

pub mod auth;
pub mod types;

pub use auth::{authorize, ApiAuthError, SharedToken};
pub use types::ErrorBody;
