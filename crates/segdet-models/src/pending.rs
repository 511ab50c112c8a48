//! Pending operations.
//!
//! A workflow step that starts an external job parks itself by registering a
//! [`PendingOperation`]; the notification handler for that job later looks it
//! up by job id to resume the workflow.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{JobId, ServiceKind};

/// Capability handed out by the orchestrator to resume a suspended step.
///
/// Treated as an opaque string: never parsed, and redacted from `Debug` output
/// so it does not leak into logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContinuationToken(String);

impl ContinuationToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for ContinuationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContinuationToken(<{} bytes>)", self.0.len())
    }
}

/// A suspended workflow step waiting for an external job to finish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingOperation {
    /// Upstream job identifier (unique per outstanding operation)
    pub job_id: JobId,
    /// Orchestrator continuation token
    pub token: ContinuationToken,
    /// Service that owns the job
    pub service: ServiceKind,
    /// Workflow step (operation) that created the job
    pub api: String,
    /// Independent copy of the workflow state at suspension time
    pub snapshot: serde_json::Value,
}

impl PendingOperation {
    pub fn new(
        job_id: impl Into<JobId>,
        token: ContinuationToken,
        service: ServiceKind,
        api: impl Into<String>,
        snapshot: serde_json::Value,
    ) -> Self {
        Self {
            job_id: job_id.into(),
            token,
            service,
            api: api.into(),
            snapshot,
        }
    }
}
