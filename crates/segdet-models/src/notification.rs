//! Transport-neutral notification envelope.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::JobId;

/// A single job status notification, after the transport adapter has
/// normalized field names.
///
/// Never persisted beyond the handling of one notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNotification {
    /// Upstream job id
    pub job_id: JobId,
    /// Upstream status string, exactly as sent
    pub status: String,
    /// Upstream timestamp (epoch millis), if present
    pub timestamp: Option<i64>,
    /// Upstream error code
    pub error_code: Option<String>,
    /// Upstream error message
    pub error_message: Option<String>,
    /// Percent complete for progress notifications
    pub progress: Option<u8>,
    /// Remaining service-specific fields (e.g. output group details)
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl RawNotification {
    pub fn new(job_id: impl Into<JobId>, status: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            status: status.into(),
            timestamp: None,
            error_code: None,
            error_message: None,
            progress: None,
            attributes: Map::new(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_error(mut self, code: Option<String>, message: Option<String>) -> Self {
        self.error_code = code;
        self.error_message = message;
        self
    }

    pub fn with_progress(mut self, percent: u8) -> Self {
        self.progress = Some(percent.min(100));
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }
}
