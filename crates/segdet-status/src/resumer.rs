//! Workflow resumption.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use segdet_models::ContinuationToken;
use segdet_signing::{ServiceEndpoint, SignedRequestClient, SigningError};

use crate::error::{ResumeError, ResumeResult};

/// Error kind reported to the orchestrator on failure.
pub const DEFAULT_ERROR_KIND: &str = "Error";

/// Orchestrator error types meaning the token can no longer be used.
const STALE_TOKEN_ERRORS: &[&str] = &["TaskDoesNotExist", "TaskTimedOut", "InvalidToken"];

/// Signals the orchestrator to continue or fail a suspended step.
#[async_trait]
pub trait WorkflowResumer: Send + Sync {
    async fn resume_success(&self, token: &ContinuationToken, output: &Value) -> ResumeResult<()>;

    async fn resume_failure(
        &self,
        token: &ContinuationToken,
        error_kind: &str,
        message: &str,
    ) -> ResumeResult<()>;
}

/// Resumes Step Functions tasks through the signed request client.
#[derive(Clone)]
pub struct StepFunctionsResumer {
    client: SignedRequestClient,
}

impl StepFunctionsResumer {
    pub fn new(client: SignedRequestClient) -> Self {
        Self { client }
    }

    async fn call(&self, operation: &str, payload: Value) -> ResumeResult<()> {
        self.client
            .send(&ServiceEndpoint::STEP_FUNCTIONS, operation, &payload)
            .await
            .map(|_| ())
            .map_err(classify)?;
        debug!(operation = %operation, "Workflow task resumed");
        Ok(())
    }
}

fn classify(err: SigningError) -> ResumeError {
    if let Some(kind) = err.error_type() {
        if STALE_TOKEN_ERRORS.contains(&kind.as_str()) {
            return ResumeError::StaleToken(kind);
        }
    }
    match err {
        SigningError::Request { status, body } => ResumeError::Rejected {
            status,
            message: body,
        },
        other => ResumeError::Transport(other),
    }
}

#[async_trait]
impl WorkflowResumer for StepFunctionsResumer {
    async fn resume_success(&self, token: &ContinuationToken, output: &Value) -> ResumeResult<()> {
        let output = serde_json::to_string(output)
            .map_err(|e| ResumeError::Transport(SigningError::Json(e)))?;
        self.call(
            "SendTaskSuccess",
            json!({ "taskToken": token.as_str(), "output": output }),
        )
        .await
    }

    async fn resume_failure(
        &self,
        token: &ContinuationToken,
        error_kind: &str,
        message: &str,
    ) -> ResumeResult<()> {
        self.call(
            "SendTaskFailure",
            json!({ "taskToken": token.as_str(), "error": error_kind, "cause": message }),
        )
        .await
    }
}
