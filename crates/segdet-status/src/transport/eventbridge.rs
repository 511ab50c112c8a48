//! Poll-result (EventBridge) envelopes.

use serde_json::Value;

use segdet_models::RawNotification;

use super::{string_field, timestamp_millis, NotificationTransport};
use crate::error::TransportError;

/// Job state-change events delivered through EventBridge.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventBridgeTransport;

impl EventBridgeTransport {
    pub fn new() -> Self {
        Self
    }
}

impl NotificationTransport for EventBridgeTransport {
    fn name(&self) -> &'static str {
        "eventbridge"
    }

    fn parse(&self, body: &[u8]) -> Result<RawNotification, TransportError> {
        let event: Value = serde_json::from_slice(body)?;
        let detail = event
            .get("detail")
            .filter(|d| d.is_object())
            .ok_or_else(|| TransportError::malformed("missing detail"))?;

        let job_id = detail
            .get("jobId")
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| TransportError::malformed("detail has no jobId"))?;
        let status = detail
            .get("status")
            .and_then(Value::as_str)
            .ok_or_else(|| TransportError::malformed("detail has no status"))?;

        let mut notification = RawNotification::new(job_id, status).with_error(
            string_field(detail.get("errorCode")),
            string_field(detail.get("errorMessage")),
        );
        if let Some(ts) = timestamp_millis(detail.get("timestamp")).or_else(|| timestamp_millis(event.get("time"))) {
            notification = notification.with_timestamp(ts);
        }
        if let Some(percent) = detail
            .get("jobProgress")
            .and_then(|p| p.get("jobPercentComplete"))
            .and_then(Value::as_u64)
        {
            notification = notification.with_progress(percent.min(100) as u8);
        }
        if let Some(details) = detail.get("outputGroupDetails") {
            notification = notification.with_attribute("outputGroupDetails", details.clone());
        }
        if let Some(source) = event.get("source") {
            notification = notification.with_attribute("source", source.clone());
        }
        Ok(notification)
    }
}
