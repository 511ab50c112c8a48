//! Status normalizers.
//!
//! Each upstream service family has its own normalizer implementing
//! [`StatusNormalizer`]. A normalizer maps the service's status vocabulary onto
//! [`CanonicalStatus`] and writes the outcome into its own copy of the
//! workflow snapshot.

use chrono::{DateTime, Utc};
use serde_json::Value;

use segdet_models::{stamp_completion, step_entry_mut, CanonicalStatus, RawNotification, ServiceKind};

pub mod document_analysis;
pub mod registry;
pub mod transcode;
pub mod video_analysis;

pub use document_analysis::DocumentAnalysisNormalizer;
pub use registry::NormalizerRegistry;
pub use transcode::TranscodeNormalizer;
pub use video_analysis::VideoAnalysisNormalizer;

/// Inputs shared by every normalization.
#[derive(Debug, Clone, Copy)]
pub struct NormalizeContext<'a> {
    pub notification: &'a RawNotification,
    /// Workflow step that started the job; names the snapshot namespace.
    pub step: &'a str,
    pub now: DateTime<Utc>,
}

/// What the dispatcher should do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizeOutcome {
    /// Not terminal: leave the pending operation in place.
    Pending,
    /// Resume the workflow with the updated snapshot.
    Succeeded,
    /// Fail the workflow with `error`.
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizationResult {
    pub status: CanonicalStatus,
    pub snapshot: Value,
    pub outcome: NormalizeOutcome,
}

impl NormalizationResult {
    pub fn is_terminal(&self) -> bool {
        !matches!(self.outcome, NormalizeOutcome::Pending)
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, NormalizeOutcome::Succeeded)
    }
}

/// Converts one service's notifications into canonical status.
pub trait StatusNormalizer: Send + Sync {
    fn service(&self) -> ServiceKind;

    /// Every raw status this service is known to send.
    fn known_statuses(&self) -> &'static [&'static str];

    /// Map a raw status. Anything unrecognised is [`CanonicalStatus::Error`].
    fn map_status(&self, raw: &str) -> CanonicalStatus;

    /// Normalize `notification` against an owned copy of the snapshot.
    fn normalize(&self, ctx: &NormalizeContext<'_>, snapshot: Value) -> NormalizationResult;
}

/// Non-terminal result; annotates `progress` when the notification carries it.
pub(crate) fn pending(
    ctx: &NormalizeContext<'_>,
    mut snapshot: Value,
    status: CanonicalStatus,
) -> NormalizationResult {
    if let Some(progress) = ctx.notification.progress {
        step_entry_mut(&mut snapshot, ctx.step).insert("progress".to_string(), Value::from(progress));
    }
    NormalizationResult {
        status,
        snapshot,
        outcome: NormalizeOutcome::Pending,
    }
}

/// Successful terminal result with the completion stamp applied.
pub(crate) fn succeeded(
    ctx: &NormalizeContext<'_>,
    mut snapshot: Value,
    extra: impl FnOnce(&mut serde_json::Map<String, Value>),
) -> NormalizationResult {
    let entry = step_entry_mut(&mut snapshot, ctx.step);
    extra(entry);
    stamp_completion(entry, CanonicalStatus::Completed, ctx.now);
    NormalizationResult {
        status: CanonicalStatus::Completed,
        snapshot,
        outcome: NormalizeOutcome::Succeeded,
    }
}

/// Failed terminal result: `errorMessage` plus the completion stamp.
pub(crate) fn failed(
    ctx: &NormalizeContext<'_>,
    mut snapshot: Value,
    error: String,
) -> NormalizationResult {
    let entry = step_entry_mut(&mut snapshot, ctx.step);
    entry.insert("errorMessage".to_string(), Value::from(error.as_str()));
    stamp_completion(entry, CanonicalStatus::Error, ctx.now);
    NormalizationResult {
        status: CanonicalStatus::Error,
        snapshot,
        outcome: NormalizeOutcome::Failed { error },
    }
}

pub(crate) fn unrecognized(ctx: &NormalizeContext<'_>) -> String {
    format!(
        "unrecognized status {}: {}",
        ctx.notification.status, ctx.notification.job_id
    )
}
