//! Correlation store error types.

use segdet_signing::SigningError;
use thiserror::Error;

/// Result type for correlation store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in correlation store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A live record already exists for the job id (duplicate job start).
    #[error("Job already registered: {0}")]
    AlreadyRegistered(String),

    /// No live record for the job id.
    #[error("Pending operation not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A persisted record could not be decoded.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Signed request error: {0}")]
    Signing(#[from] SigningError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    pub fn already_registered(job_id: impl Into<String>) -> Self {
        Self::AlreadyRegistered(job_id.into())
    }

    pub fn not_found(job_id: impl Into<String>) -> Self {
        Self::NotFound(job_id.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn invalid_record(msg: impl Into<String>) -> Self {
        Self::InvalidRecord(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_already_registered(&self) -> bool {
        matches!(self, Self::AlreadyRegistered(_))
    }
}
