//! HTTP API handlers for alignpath-stt

pub mod health;
pub mod transcribe;

pub use health::health_routes;
pub use transcribe::transcribe;
