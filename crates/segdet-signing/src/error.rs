//! Signing client error types.

use thiserror::Error;

/// Result type for signed request operations.
pub type SigningResult<T> = Result<T, SigningError>;

/// Errors that can occur while building or sending signed requests.
#[derive(Debug, Error)]
pub enum SigningError {
    /// Missing credentials or region. Fatal at construction time.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Socket or connection level failure.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Upstream answered with status >= 400.
    #[error("Request failed with status {status}: {body}")]
    Request { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SigningError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn request(status: u16, body: impl Into<String>) -> Self {
        Self::Request {
            status,
            body: body.into(),
        }
    }

    /// HTTP status of an upstream rejection, if this is one.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            SigningError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Provider error type (`__type`) from a JSON-protocol error body.
    ///
    /// The provider prefixes the type with a namespace
    /// (`com.amazonaws.dynamodb.v20120810#ConditionalCheckFailedException`);
    /// only the part after `#` is returned.
    pub fn error_type(&self) -> Option<String> {
        let SigningError::Request { body, .. } = self else {
            return None;
        };
        let value: serde_json::Value = serde_json::from_str(body).ok()?;
        let raw = value
            .get("__type")
            .or_else(|| value.get("code"))
            .and_then(|v| v.as_str())?;
        Some(raw.rsplit('#').next().unwrap_or(raw).to_string())
    }

    /// True if the upstream rejected the request with the given error type.
    pub fn is_error_type(&self, name: &str) -> bool {
        self.error_type().as_deref() == Some(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_type_strips_namespace() {
        let err = SigningError::request(
            400,
            r#"{"__type":"com.amazonaws.dynamodb.v20120810#ConditionalCheckFailedException","message":"The conditional request failed"}"#,
        );
        assert_eq!(err.http_status(), Some(400));
        assert_eq!(err.error_type().as_deref(), Some("ConditionalCheckFailedException"));
        assert!(err.is_error_type("ConditionalCheckFailedException"));
    }

    #[test]
    fn test_error_type_without_namespace() {
        let err = SigningError::request(400, r#"{"__type":"TaskTimedOut"}"#);
        assert!(err.is_error_type("TaskTimedOut"));
    }

    #[test]
    fn test_error_type_on_plain_body() {
        let err = SigningError::request(503, "Service Unavailable");
        assert_eq!(err.error_type(), None);
        assert_eq!(SigningError::configuration("x").error_type(), None);
    }
}
