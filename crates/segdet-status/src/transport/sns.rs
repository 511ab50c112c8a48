//! Push notification (SNS) envelopes.

use serde_json::{Map, Value};

use segdet_models::RawNotification;

use super::{string_field, timestamp_millis, NotificationTransport};
use crate::error::TransportError;

const KNOWN_FIELDS: &[&str] = &[
    "JobId",
    "jobId",
    "Status",
    "status",
    "Timestamp",
    "ErrorCode",
    "ErrorMessage",
    "StatusMessage",
];

/// Analysis completion messages delivered over SNS.
///
/// Accepts an HTTP subscription delivery (`{Type, Message, Timestamp}`) or a
/// function-invocation event (`{Records: [{Sns: {Message, Timestamp}}]}`).
/// Services disagree on the job id field name (`JobId` vs `jobId`); both are
/// accepted.
///
/// Any other HTTP message type (`SubscriptionConfirmation`,
/// `UnsubscribeConfirmation`) is reported as ignored. This transport never
/// visits `SubscribeURL`; HTTP subscriptions are confirmed out of band.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnsTransport;

impl SnsTransport {
    pub fn new() -> Self {
        Self
    }

    /// The SNS message object and its envelope timestamp.
    fn unwrap_envelope(envelope: &Value) -> Result<(&Value, Option<&Value>), TransportError> {
        if let Some(records) = envelope.get("Records").and_then(Value::as_array) {
            let sns = records
                .first()
                .and_then(|r| r.get("Sns"))
                .ok_or_else(|| TransportError::malformed("missing Records[0].Sns"))?;
            return Ok((sns, sns.get("Timestamp")));
        }

        match envelope.get("Type").and_then(Value::as_str) {
            Some("Notification") => Ok((envelope, envelope.get("Timestamp"))),
            Some(other) => Err(TransportError::ignored(format!("SNS message type {}", other))),
            None => Err(TransportError::malformed("missing Type or Records")),
        }
    }
}

impl NotificationTransport for SnsTransport {
    fn name(&self) -> &'static str {
        "sns"
    }

    fn parse(&self, body: &[u8]) -> Result<RawNotification, TransportError> {
        let envelope: Value = serde_json::from_slice(body)?;
        let (sns, envelope_timestamp) = Self::unwrap_envelope(&envelope)?;

        let message_text = sns
            .get("Message")
            .and_then(Value::as_str)
            .ok_or_else(|| TransportError::malformed("missing Message"))?;
        let message: Map<String, Value> = serde_json::from_str(message_text)?;

        let job_id = message
            .get("JobId")
            .or_else(|| message.get("jobId"))
            .and_then(Value::as_str)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| TransportError::malformed("message has no JobId"))?;
        let status = message
            .get("Status")
            .or_else(|| message.get("status"))
            .and_then(Value::as_str)
            .ok_or_else(|| TransportError::malformed("message has no Status"))?;

        let mut notification = RawNotification::new(job_id, status).with_error(
            string_field(message.get("ErrorCode")),
            string_field(message.get("ErrorMessage").or_else(|| message.get("StatusMessage"))),
        );
        if let Some(ts) = timestamp_millis(message.get("Timestamp"))
            .or_else(|| timestamp_millis(envelope_timestamp))
        {
            notification = notification.with_timestamp(ts);
        }
        for (key, value) in message.iter() {
            if !KNOWN_FIELDS.contains(&key.as_str()) {
                notification = notification.with_attribute(key.clone(), value.clone());
            }
        }
        Ok(notification)
    }
}
