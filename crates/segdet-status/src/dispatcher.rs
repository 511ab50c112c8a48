//! Completion dispatcher.
//!
//! Entry point for every notification transport: resolves the pending
//! operation, normalizes the status against an isolated copy of the snapshot
//! and, on a terminal status, resumes the workflow and removes the pending
//! operation. No retries are performed here.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{warn, Instrument};

use segdet_models::{CanonicalStatus, Clock, JobId, PendingOperation, RawNotification};
use segdet_store::{CorrelationStore, StoreError};

use crate::error::{DispatchError, DispatchResult, TransportError};
use crate::logging::NotificationLogger;
use crate::metrics::{record_notification, record_resume};
use crate::normalizer::{NormalizeContext, NormalizeOutcome, NormalizerRegistry};
use crate::resumer::{WorkflowResumer, DEFAULT_ERROR_KIND};
use crate::transport::NotificationTransport;

/// Result of handling one notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DispatchOutcome {
    /// Job still running; pending operation kept.
    Pending {
        job_id: JobId,
        status: CanonicalStatus,
        snapshot: Value,
    },
    /// Workflow resumed and pending operation removed.
    Resumed {
        job_id: JobId,
        status: CanonicalStatus,
        success: bool,
        snapshot: Value,
    },
    /// Orchestrator refused the token (already consumed or timed out).
    ResumeRejected {
        job_id: JobId,
        status: CanonicalStatus,
        reason: String,
    },
}

impl DispatchOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            DispatchOutcome::Pending { .. } => "pending",
            DispatchOutcome::Resumed { .. } => "resumed",
            DispatchOutcome::ResumeRejected { .. } => "resume_rejected",
        }
    }
}

fn outcome_label(result: &DispatchResult<DispatchOutcome>) -> &'static str {
    match result {
        Ok(outcome) => outcome.label(),
        Err(DispatchError::Correlation(_)) => "correlation_miss",
        Err(DispatchError::Transport(TransportError::Ignored(_))) => "ignored",
        Err(DispatchError::Transport(_)) => "malformed",
        Err(_) => "error",
    }
}

/// Resolves notifications to pending operations and resumes workflows.
#[derive(Clone)]
pub struct CompletionDispatcher {
    store: Arc<dyn CorrelationStore>,
    normalizers: Arc<NormalizerRegistry>,
    resumer: Arc<dyn WorkflowResumer>,
    clock: Arc<dyn Clock>,
}

impl CompletionDispatcher {
    pub fn new(
        store: Arc<dyn CorrelationStore>,
        normalizers: Arc<NormalizerRegistry>,
        resumer: Arc<dyn WorkflowResumer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            normalizers,
            resumer,
            clock,
        }
    }

    /// Parse an envelope with `transport` and dispatch it.
    pub async fn handle(
        &self,
        transport: &dyn NotificationTransport,
        body: &[u8],
    ) -> DispatchResult<DispatchOutcome> {
        match transport.parse(body) {
            Ok(notification) => self.dispatch_via(transport.name(), &notification).await,
            Err(e) => {
                warn!(transport = transport.name(), "Envelope not dispatched: {}", e);
                let result = Err(DispatchError::Transport(e));
                record_notification(transport.name(), outcome_label(&result));
                result
            }
        }
    }

    /// Dispatch an already-parsed notification.
    pub async fn dispatch(&self, notification: &RawNotification) -> DispatchResult<DispatchOutcome> {
        self.dispatch_via("direct", notification).await
    }

    async fn dispatch_via(
        &self,
        transport: &str,
        notification: &RawNotification,
    ) -> DispatchResult<DispatchOutcome> {
        let logger = NotificationLogger::new(&notification.job_id, transport, &notification.status);
        let span = logger.create_span();
        let result = self.process(logger, notification).instrument(span).await;
        record_notification(transport, outcome_label(&result));
        result
    }

    async fn process(
        &self,
        logger: NotificationLogger,
        notification: &RawNotification,
    ) -> DispatchResult<DispatchOutcome> {
        logger.log_received();

        let op = match self.store.get(&notification.job_id).await {
            Ok(op) => op,
            Err(StoreError::NotFound(_)) => {
                logger.log_dropped("no pending operation (unknown job or already resumed)");
                return Err(DispatchError::Correlation(notification.job_id.clone()));
            }
            Err(e) => {
                logger.log_dropped(&e.to_string());
                return Err(e.into());
            }
        };
        let logger = logger.with_operation(&op);

        let Some(normalizer) = self.normalizers.get(op.service) else {
            logger.log_dropped("no normalizer for service");
            return Err(DispatchError::UnsupportedService(op.service));
        };

        let ctx = NormalizeContext {
            notification,
            step: &op.api,
            now: self.clock.now(),
        };
        // The normalizer owns its copy; the stored record is never aliased.
        let result = normalizer.normalize(&ctx, op.snapshot.clone());

        let resumed = match &result.outcome {
            NormalizeOutcome::Pending => {
                logger.log_progress(result.status.as_str());
                return Ok(DispatchOutcome::Pending {
                    job_id: op.job_id,
                    status: result.status,
                    snapshot: result.snapshot,
                });
            }
            NormalizeOutcome::Succeeded => {
                self.resumer.resume_success(&op.token, &result.snapshot).await
            }
            NormalizeOutcome::Failed { error } => {
                self.resumer
                    .resume_failure(&op.token, DEFAULT_ERROR_KIND, error)
                    .await
            }
        };

        match resumed {
            Ok(()) => {
                record_resume("ok");
                logger.log_resumed(result.is_success());
                self.unregister(&logger, &op).await;
                Ok(DispatchOutcome::Resumed {
                    job_id: op.job_id,
                    status: result.status,
                    success: result.is_success(),
                    snapshot: result.snapshot,
                })
            }
            Err(e) if e.is_token_rejection() => {
                record_resume("rejected");
                logger.log_resume_rejected(&e.to_string());
                self.unregister(&logger, &op).await;
                Ok(DispatchOutcome::ResumeRejected {
                    job_id: op.job_id,
                    status: result.status,
                    reason: e.to_string(),
                })
            }
            Err(e) => {
                record_resume("failed");
                logger.log_resume_failed(&e.to_string());
                Err(e.into())
            }
        }
    }

    /// Best-effort: store expiry is the backstop.
    async fn unregister(&self, logger: &NotificationLogger, op: &PendingOperation) {
        if let Err(e) = self.store.unregister(&op.job_id).await {
            logger.log_unregister_failed(&e.to_string());
        }
    }
}
