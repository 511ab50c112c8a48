//! Shared data models for the segment detection backend.
//!
//! This crate provides Serde-serializable types for:
//! - Upstream services and their canonical job status
//! - Pending operations parked while an external job runs
//! - Transport-neutral notification envelopes
//! - Workflow step names and state snapshot helpers
//! - An injectable clock

pub mod clock;
pub mod job;
pub mod notification;
pub mod pending;
pub mod service;
pub mod snapshot;
pub mod status;
pub mod step;

// Re-export common types
pub use clock::{Clock, FixedClock, SystemClock};
pub use job::JobId;
pub use notification::RawNotification;
pub use pending::{ContinuationToken, PendingOperation};
pub use service::{ServiceKind, UnknownService};
pub use snapshot::{step_entry_mut, stamp_completion, stamp_start};
pub use status::CanonicalStatus;
pub use step::WorkflowStep;
