//! Notification transport adapters.
//!
//! Each transport delivers job notifications in its own envelope with its own
//! field names. Adapters convert an envelope into a [`RawNotification`] before
//! the dispatcher sees it.

use chrono::DateTime;
use serde_json::Value;

use segdet_models::RawNotification;

use crate::error::TransportError;

pub mod eventbridge;
pub mod sns;

pub use eventbridge::EventBridgeTransport;
pub use sns::SnsTransport;

/// Parses one transport's envelope.
pub trait NotificationTransport: Send + Sync {
    /// Transport name for logs and metrics.
    fn name(&self) -> &'static str;

    fn parse(&self, body: &[u8]) -> Result<RawNotification, TransportError>;
}

/// Epoch millis from a number or an RFC 3339 string.
pub(crate) fn timestamp_millis(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|t| t.timestamp_millis())
            .or_else(|| s.parse().ok()),
        _ => None,
    }
}

/// String field that may arrive as a number (e.g. numeric error codes).
pub(crate) fn string_field(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
