//! Transcode (MediaConvert) status normalizer.

use serde_json::Value;

use segdet_models::{CanonicalStatus, ServiceKind};

use super::{failed, pending, succeeded, unrecognized, NormalizationResult, NormalizeContext, StatusNormalizer};

const STATUSES: &[&str] = &[
    "SUBMITTED",
    "PROGRESSING",
    "STATUS_UPDATE",
    "COMPLETE",
    "CANCELED",
    "ERROR",
];

/// Normalizer for transcode job state-change events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TranscodeNormalizer;

impl TranscodeNormalizer {
    pub fn new() -> Self {
        Self
    }

    fn error_message(ctx: &NormalizeContext<'_>) -> String {
        let notification = ctx.notification;
        match notification.status.as_str() {
            "CANCELED" => "user canceled job".to_string(),
            "ERROR" => format!(
                "{} ({})",
                notification.error_message.as_deref().unwrap_or("transcode failed"),
                notification.error_code.as_deref().unwrap_or("unknown")
            ),
            _ => unrecognized(ctx),
        }
    }
}

impl StatusNormalizer for TranscodeNormalizer {
    fn service(&self) -> ServiceKind {
        ServiceKind::Transcode
    }

    fn known_statuses(&self) -> &'static [&'static str] {
        STATUSES
    }

    fn map_status(&self, raw: &str) -> CanonicalStatus {
        match raw {
            "SUBMITTED" => CanonicalStatus::Started,
            "PROGRESSING" | "STATUS_UPDATE" => CanonicalStatus::InProgress,
            "COMPLETE" => CanonicalStatus::Completed,
            _ => CanonicalStatus::Error,
        }
    }

    fn normalize(&self, ctx: &NormalizeContext<'_>, snapshot: Value) -> NormalizationResult {
        match self.map_status(&ctx.notification.status) {
            status @ (CanonicalStatus::Started | CanonicalStatus::InProgress) => {
                pending(ctx, snapshot, status)
            }
            CanonicalStatus::Completed => succeeded(ctx, snapshot, |entry| {
                if let Some(details) = ctx.notification.attribute("outputGroupDetails") {
                    entry.insert("outputGroupDetails".to_string(), details.clone());
                }
            }),
            CanonicalStatus::Error => failed(ctx, snapshot, Self::error_message(ctx)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::test_support::{assert_total, normalize, now};
    use crate::normalizer::NormalizeOutcome;
    use segdet_models::RawNotification;
    use serde_json::json;

    const STEP: &str = "start-mediaconvert";

    fn state() -> Value {
        json!({
            "input": {"key": "video.mp4"},
            "output": {STEP: {"jobId": "job-1", "status": "started", "metrics": {"t0": 1}}}
        })
    }

    #[test]
    fn test_status_table() {
        let n = TranscodeNormalizer::new();
        assert_eq!(n.map_status("SUBMITTED"), CanonicalStatus::Started);
        assert_eq!(n.map_status("PROGRESSING"), CanonicalStatus::InProgress);
        assert_eq!(n.map_status("STATUS_UPDATE"), CanonicalStatus::InProgress);
        assert_eq!(n.map_status("COMPLETE"), CanonicalStatus::Completed);
        assert_eq!(n.map_status("CANCELED"), CanonicalStatus::Error);
        assert_eq!(n.map_status("ERROR"), CanonicalStatus::Error);
        assert_total(&n);
    }

    #[test]
    fn test_complete_stamps_step_entry() {
        let notification = RawNotification::new("job-1", "COMPLETE")
            .with_attribute("outputGroupDetails", json!([{"type": "FILE_GROUP"}]));
        let result = normalize(&TranscodeNormalizer, &notification, STEP, state());

        assert_eq!(result.outcome, NormalizeOutcome::Succeeded);
        let entry = &result.snapshot["output"][STEP];
        assert_eq!(entry["status"], "completed");
        assert_eq!(entry["metrics"]["t0"], 1);
        assert_eq!(entry["metrics"]["t1"], now().timestamp_millis());
        assert_eq!(entry["outputGroupDetails"][0]["type"], "FILE_GROUP");
    }

    #[test]
    fn test_canceled_message() {
        let notification = RawNotification::new("job-1", "CANCELED");
        let result = normalize(&TranscodeNormalizer, &notification, STEP, state());
        assert_eq!(
            result.outcome,
            NormalizeOutcome::Failed { error: "user canceled job".to_string() }
        );
        assert_eq!(result.snapshot["output"][STEP]["errorMessage"], "user canceled job");
        assert_eq!(result.snapshot["output"][STEP]["status"], "error");
    }

    #[test]
    fn test_error_message_includes_code() {
        let notification = RawNotification::new("job-1", "ERROR")
            .with_error(Some("1030".into()), Some("Unsupported codec".into()));
        let result = normalize(&TranscodeNormalizer, &notification, STEP, state());
        assert_eq!(
            result.outcome,
            NormalizeOutcome::Failed { error: "Unsupported codec (1030)".to_string() }
        );
    }

    #[test]
    fn test_unknown_status_is_error() {
        let notification = RawNotification::new("job-1", "INPUT_INFORMATION");
        let result = normalize(&TranscodeNormalizer, &notification, STEP, state());
        assert_eq!(result.status, CanonicalStatus::Error);
        assert_eq!(
            result.outcome,
            NormalizeOutcome::Failed {
                error: "unrecognized status INPUT_INFORMATION: job-1".to_string()
            }
        );
    }

    #[test]
    fn test_progress_is_not_terminal() {
        let notification = RawNotification::new("job-1", "STATUS_UPDATE").with_progress(42);
        let result = normalize(&TranscodeNormalizer, &notification, STEP, state());
        assert!(!result.is_terminal());
        assert_eq!(result.status, CanonicalStatus::InProgress);
        assert_eq!(result.snapshot["output"][STEP]["progress"], 42);
        assert_eq!(result.snapshot["output"][STEP]["status"], "started");
    }

    #[test]
    fn test_submitted_leaves_snapshot_unchanged() {
        let notification = RawNotification::new("job-1", "SUBMITTED");
        let result = normalize(&TranscodeNormalizer, &notification, STEP, state());
        assert_eq!(result.status, CanonicalStatus::Started);
        assert_eq!(result.snapshot, state());
    }
}
