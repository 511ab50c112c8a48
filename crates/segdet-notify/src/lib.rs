//! Job completion notification receiver.
//!
//! This crate provides:
//! - HTTP intake for SNS and EventBridge deliveries
//! - Mapping of dispatch outcomes onto HTTP status codes
//! - Health, readiness and Prometheus endpoints

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod routes;
pub mod state;

pub use config::NotifyConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
