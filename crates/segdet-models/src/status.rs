//! Canonical job status.

use serde::{Deserialize, Serialize};

/// Service-independent job status.
///
/// Every upstream status string maps onto exactly one of these; anything a
/// normalizer does not recognise is treated as [`CanonicalStatus::Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CanonicalStatus {
    /// Job accepted by the upstream service
    Started,
    /// Job is running
    InProgress,
    /// Job finished successfully
    Completed,
    /// Job failed or was canceled
    Error,
}

impl CanonicalStatus {
    /// Get string representation of the status, as written into snapshots.
    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalStatus::Started => "started",
            CanonicalStatus::InProgress => "inProgress",
            CanonicalStatus::Completed => "completed",
            CanonicalStatus::Error => "error",
        }
    }

    /// Check if this is a terminal state (the workflow must be resumed).
    pub fn is_terminal(&self) -> bool {
        matches!(self, CanonicalStatus::Completed | CanonicalStatus::Error)
    }
}

impl std::fmt::Display for CanonicalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
