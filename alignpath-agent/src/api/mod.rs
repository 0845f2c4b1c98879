//! HTTP API handlers for alignpath-agent

pub mod analysis;
pub mod auth;
pub mod health;
pub mod lesson;

pub use analysis::analyze_performance;
pub use auth::auth_middleware;
pub use health::health_routes;
pub use lesson::personalize_lesson;
