//! Job status correlation.
//!
//! This crate provides:
//! - Status normalizers per upstream service and a registry keyed by service
//! - Transport adapters for push (SNS) and poll-result (EventBridge) envelopes
//! - Workflow resumption through Step Functions
//! - The completion dispatcher tying store, normalizers and resumer together
//! - Step suspension and the per-process [`CorrelatorContext`]

pub mod context;
pub mod dispatcher;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod normalizer;
pub mod resumer;
pub mod suspend;
pub mod transport;

pub use context::{CorrelatorConfig, CorrelatorContext};
pub use dispatcher::{CompletionDispatcher, DispatchOutcome};
pub use error::{ContextError, DispatchError, DispatchResult, ResumeError, ResumeResult, TransportError};
pub use logging::NotificationLogger;
pub use normalizer::{
    DocumentAnalysisNormalizer, NormalizationResult, NormalizeContext, NormalizeOutcome,
    NormalizerRegistry, StatusNormalizer, TranscodeNormalizer, VideoAnalysisNormalizer,
};
pub use resumer::{StepFunctionsResumer, WorkflowResumer};
pub use suspend::suspend;
pub use transport::{EventBridgeTransport, NotificationTransport, SnsTransport};
