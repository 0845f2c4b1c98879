//! # AlignPath Common Library
//!
//! Shared code for the AlignPath AI microservices:
//! - Shared-token authorization gate
//! - JSON recovery from free-form model replies
//! - Canonical response schemas and fallback validation
//! - TOML configuration loading
//! - Common error types

pub mod api;
pub mod config;
pub mod error;
pub mod normalize;

pub use error::{Error, Result};
