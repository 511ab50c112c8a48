//! Receiver error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use segdet_status::{DispatchError, TransportError};

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Envelope is valid but carries no job notification.
    #[error("Ignored: {0}")]
    Ignored(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Dispatch error: {0}")]
    Dispatch(DispatchError),

    /// Dispatch failure with its detail withheld from the caller.
    #[error("An internal error occurred")]
    Internal,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Ignored(_) => StatusCode::ACCEPTED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Dispatch(_) | ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Hide internal failure detail when `production` is set. The detail is
    /// logged before it is dropped.
    pub fn redact(self, production: bool) -> Self {
        match self {
            ApiError::Dispatch(e) if production => {
                tracing::error!(error = %e, "Dispatch failed");
                ApiError::Internal
            }
            other => other,
        }
    }

    fn code(&self) -> Option<&'static str> {
        match self {
            ApiError::Ignored(_) => Some("ignored"),
            ApiError::NotFound(_) => Some("correlation_miss"),
            _ => None,
        }
    }
}

impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::Correlation(job_id) => {
                ApiError::NotFound(format!("no pending operation for job {}", job_id))
            }
            DispatchError::Transport(TransportError::Ignored(msg)) => ApiError::Ignored(msg),
            DispatchError::Transport(e) => ApiError::BadRequest(e.to_string()),
            other => ApiError::Dispatch(other),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            detail: self.to_string(),
            code: self.code().map(str::to_string),
        };

        (status, Json(body)).into_response()
    }
}
