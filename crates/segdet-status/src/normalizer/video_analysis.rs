//! Video analysis (Rekognition) status normalizer.

use serde_json::Value;

use segdet_models::{CanonicalStatus, ServiceKind};

use super::{failed, pending, succeeded, unrecognized, NormalizationResult, NormalizeContext, StatusNormalizer};

const STATUSES: &[&str] = &["IN_PROGRESS", "SUCCEEDED", "ERROR", "FAILED"];

/// Normalizer for video analysis completion messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct VideoAnalysisNormalizer;

impl VideoAnalysisNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl StatusNormalizer for VideoAnalysisNormalizer {
    fn service(&self) -> ServiceKind {
        ServiceKind::VideoAnalysis
    }

    fn known_statuses(&self) -> &'static [&'static str] {
        STATUSES
    }

    fn map_status(&self, raw: &str) -> CanonicalStatus {
        match raw {
            "IN_PROGRESS" => CanonicalStatus::InProgress,
            "SUCCEEDED" => CanonicalStatus::Completed,
            _ => CanonicalStatus::Error,
        }
    }

    fn normalize(&self, ctx: &NormalizeContext<'_>, snapshot: Value) -> NormalizationResult {
        let notification = ctx.notification;
        match self.map_status(&notification.status) {
            status @ (CanonicalStatus::Started | CanonicalStatus::InProgress) => {
                pending(ctx, snapshot, status)
            }
            CanonicalStatus::Completed => succeeded(ctx, snapshot, |_| {}),
            CanonicalStatus::Error => {
                let error = if STATUSES.contains(&notification.status.as_str()) {
                    format!("{}: {}", notification.status, notification.job_id)
                } else {
                    unrecognized(ctx)
                };
                failed(ctx, snapshot, error)
            }
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

    const STEP: &str = "start-segment-detection";

    fn state() -> Value {
        json!({"output": {STEP: {"jobId": "job-1", "metrics": {"t0": 5}}}})
    }

    #[test]
    fn test_status_table() {
        let n = VideoAnalysisNormalizer::new();
        assert_eq!(n.map_status("IN_PROGRESS"), CanonicalStatus::InProgress);
        assert_eq!(n.map_status("SUCCEEDED"), CanonicalStatus::Completed);
        assert_eq!(n.map_status("ERROR"), CanonicalStatus::Error);
        assert_eq!(n.map_status("FAILED"), CanonicalStatus::Error);
        assert_total(&n);
    }

    #[test]
    fn test_succeeded() {
        let notification = RawNotification::new("job-1", "SUCCEEDED");
        let result = normalize(&VideoAnalysisNormalizer, &notification, STEP, state());
        assert!(result.is_success());
        assert_eq!(result.snapshot["output"][STEP]["status"], "completed");
        assert_eq!(result.snapshot["output"][STEP]["metrics"]["t1"], now().timestamp_millis());
    }

    #[test]
    fn test_failed_message() {
        let notification = RawNotification::new("job-1", "FAILED");
        let result = normalize(&VideoAnalysisNormalizer, &notification, STEP, state());
        assert_eq!(
            result.outcome,
            NormalizeOutcome::Failed { error: "FAILED: job-1".to_string() }
        );
        assert_eq!(result.snapshot["output"][STEP]["errorMessage"], "FAILED: job-1");
    }

    #[test]
    fn test_unrecognized_message() {
        let notification = RawNotification::new("job-1", "PAUSED");
        let result = normalize(&VideoAnalysisNormalizer, &notification, STEP, state());
        assert_eq!(
            result.outcome,
            NormalizeOutcome::Failed { error: "unrecognized status PAUSED: job-1".to_string() }
        );
    }
}
