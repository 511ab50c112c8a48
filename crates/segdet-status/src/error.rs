//! Status crate error types.

use segdet_models::{JobId, ServiceKind};
use segdet_signing::SigningError;
use segdet_store::StoreError;
use thiserror::Error;

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Result type for resume operations.
pub type ResumeResult<T> = Result<T, ResumeError>;

/// Envelope parsing failures.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The envelope is not a job notification (e.g. a subscription confirmation).
    #[error("Ignored envelope: {0}")]
    Ignored(String),

    #[error("Malformed envelope: {0}")]
    Malformed(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TransportError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }

    pub fn ignored(msg: impl Into<String>) -> Self {
        Self::Ignored(msg.into())
    }
}

/// Orchestrator resume failures.
#[derive(Debug, Error)]
pub enum ResumeError {
    /// Token already consumed, timed out or unknown to the orchestrator.
    #[error("Stale continuation token: {0}")]
    StaleToken(String),

    /// Orchestrator rejected the call for another reason (throttling,
    /// validation, server error). The token may still be live.
    #[error("Resume rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// Orchestrator unreachable.
    #[error("Resume transport error: {0}")]
    Transport(SigningError),
}

impl ResumeError {
    /// True only when the orchestrator reported the token itself as consumed,
    /// timed out or unknown: redelivery cannot help. Every other failure,
    /// including a 4xx such as `ThrottlingException`, leaves the token usable.
    pub fn is_token_rejection(&self) -> bool {
        matches!(self, ResumeError::StaleToken(_))
    }
}

/// Errors surfaced by the completion dispatcher.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No pending operation for the job id (unknown or already resumed).
    #[error("No pending operation for job {0}")]
    Correlation(JobId),

    #[error("No status normalizer for service {0}")]
    UnsupportedService(ServiceKind),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Resume error: {0}")]
    Resume(#[from] ResumeError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Context construction failures.
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("Signing configuration error: {0}")]
    Signing(#[from] SigningError),

    #[error("Store configuration error: {0}")]
    Store(#[from] StoreError),
}
