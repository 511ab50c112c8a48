//! Document analysis (Textract) status normalizer.

use serde_json::Value;

use segdet_models::{CanonicalStatus, ServiceKind};

use super::{failed, pending, succeeded, unrecognized, NormalizationResult, NormalizeContext, StatusNormalizer};

const STATUSES: &[&str] = &["IN_PROGRESS", "SUCCEEDED", "PARTIAL_SUCCESS", "ERROR", "FAILED"];

/// Normalizer for document analysis completion messages.
///
/// `PARTIAL_SUCCESS` completes the step but is flagged with `partial: true`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentAnalysisNormalizer;

impl DocumentAnalysisNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl StatusNormalizer for DocumentAnalysisNormalizer {
    fn service(&self) -> ServiceKind {
        ServiceKind::DocumentAnalysis
    }

    fn known_statuses(&self) -> &'static [&'static str] {
        STATUSES
    }

    fn map_status(&self, raw: &str) -> CanonicalStatus {
        match raw {
            "IN_PROGRESS" => CanonicalStatus::InProgress,
            "SUCCEEDED" | "PARTIAL_SUCCESS" => CanonicalStatus::Completed,
            _ => CanonicalStatus::Error,
        }
    }

    fn normalize(&self, ctx: &NormalizeContext<'_>, snapshot: Value) -> NormalizationResult {
        let notification = ctx.notification;
        match self.map_status(&notification.status) {
            status @ (CanonicalStatus::Started | CanonicalStatus::InProgress) => {
                pending(ctx, snapshot, status)
            }
            CanonicalStatus::Completed => succeeded(ctx, snapshot, |entry| {
                if notification.status == "PARTIAL_SUCCESS" {
                    entry.insert("partial".to_string(), Value::Bool(true));
                }
            }),
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
