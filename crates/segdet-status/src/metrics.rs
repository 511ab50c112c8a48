//! Dispatch metrics.

use metrics::counter;

pub mod names {
    /// Notifications handled, by transport and outcome.
    pub const NOTIFICATIONS_TOTAL: &str = "segdet_notifications_total";

    /// Resume calls, by result.
    pub const RESUMES_TOTAL: &str = "segdet_resumes_total";
}

pub fn record_notification(transport: &str, outcome: &str) {
    counter!(
        names::NOTIFICATIONS_TOTAL,
        "transport" => transport.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);
}

pub fn record_resume(result: &str) {
    counter!(names::RESUMES_TOTAL, "result" => result.to_string()).increment(1);
}
