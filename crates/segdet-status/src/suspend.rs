//! Step suspension.
//!
//! A workflow step that has just started an external job calls [`suspend`] to
//! park itself until the job's terminal notification arrives.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::info;

use segdet_models::{stamp_start, step_entry_mut, ContinuationToken, JobId, PendingOperation, ServiceKind, WorkflowStep};
use segdet_store::{CorrelationStore, StoreResult};

/// Stamp `output[step] = {jobId, status: "started", metrics: {t0}}` into a copy
/// of `snapshot` and register it under `job_id`.
///
/// Returns the stamped snapshot. Fails with `AlreadyRegistered` if another
/// step is already waiting on the same job.
pub async fn suspend(
    store: &dyn CorrelationStore,
    step: WorkflowStep,
    job_id: &JobId,
    token: ContinuationToken,
    service: ServiceKind,
    snapshot: &Value,
    now: DateTime<Utc>,
) -> StoreResult<Value> {
    let mut stamped = snapshot.clone();
    stamp_start(step_entry_mut(&mut stamped, step.as_str()), job_id, now);

    let op = PendingOperation::new(job_id.clone(), token, service, step.as_str(), stamped.clone());
    store.register(&op).await?;

    info!(
        job_id = %job_id,
        step = %step,
        service = %service,
        backend = store.backend(),
        "Step suspended"
    );
    Ok(stamped)
}
