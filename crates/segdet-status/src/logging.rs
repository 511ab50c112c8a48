//! Structured notification logging.
//!
//! Every dispatcher decision is logged with the job id and the upstream status
//! so a dropped or rejected notification can be traced back to its job.

use tracing::{error, info, warn, Span};

use segdet_models::{JobId, PendingOperation};

/// Logger carrying the identifiers of the notification being handled.
#[derive(Debug, Clone)]
pub struct NotificationLogger {
    job_id: String,
    transport: String,
    status: String,
    service: Option<String>,
    api: Option<String>,
}

impl NotificationLogger {
    pub fn new(job_id: &JobId, transport: &str, status: &str) -> Self {
        Self {
            job_id: job_id.to_string(),
            transport: transport.to_string(),
            status: status.to_string(),
            service: None,
            api: None,
        }
    }

    /// Attach the service and api of the resolved pending operation.
    pub fn with_operation(mut self, op: &PendingOperation) -> Self {
        self.service = Some(op.service.to_string());
        self.api = Some(op.api.clone());
        self
    }

    pub fn log_received(&self) {
        info!(
            job_id = %self.job_id,
            transport = %self.transport,
            status = %self.status,
            "Notification received"
        );
    }

    pub fn log_progress(&self, canonical: &str) {
        info!(
            job_id = %self.job_id,
            status = %self.status,
            canonical = %canonical,
            service = self.service.as_deref().unwrap_or_default(),
            api = self.api.as_deref().unwrap_or_default(),
            "Job still running, pending operation kept"
        );
    }

    pub fn log_resumed(&self, success: bool) {
        info!(
            job_id = %self.job_id,
            status = %self.status,
            success,
            service = self.service.as_deref().unwrap_or_default(),
            api = self.api.as_deref().unwrap_or_default(),
            "Workflow resumed"
        );
    }

    /// No pending operation: unknown job or duplicate delivery.
    pub fn log_dropped(&self, reason: &str) {
        error!(
            job_id = %self.job_id,
            transport = %self.transport,
            status = %self.status,
            "Notification dropped: {}", reason
        );
    }

    pub fn log_resume_rejected(&self, reason: &str) {
        warn!(
            job_id = %self.job_id,
            status = %self.status,
            api = self.api.as_deref().unwrap_or_default(),
            "Resume rejected by orchestrator: {}", reason
        );
    }

    pub fn log_resume_failed(&self, reason: &str) {
        error!(
            job_id = %self.job_id,
            status = %self.status,
            api = self.api.as_deref().unwrap_or_default(),
            "Resume failed, pending operation kept: {}", reason
        );
    }

    pub fn log_unregister_failed(&self, reason: &str) {
        warn!(
            job_id = %self.job_id,
            status = %self.status,
            "Unregister failed, relying on expiry: {}", reason
        );
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn transport(&self) -> &str {
        &self.transport
    }

    /// Span wrapping the handling of this notification.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "dispatch",
            job_id = %self.job_id,
            transport = %self.transport
        )
    }
}
