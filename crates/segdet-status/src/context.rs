//! Per-process correlator context.
//!
//! Built once at startup and shared through `Arc`. Holds no in-process state
//! across notifications: everything that must survive lives in the store, so
//! there is nothing to tear down.

use std::sync::Arc;

use serde_json::Value;

use segdet_models::{Clock, ContinuationToken, JobId, ServiceKind, SystemClock, WorkflowStep};
use segdet_signing::{SignedRequestClient, SigningConfig};
use segdet_store::{build_store, CorrelationStore, StoreConfig, StoreResult};

use crate::dispatcher::CompletionDispatcher;
use crate::error::ContextError;
use crate::normalizer::NormalizerRegistry;
use crate::resumer::{StepFunctionsResumer, WorkflowResumer};
use crate::suspend::suspend;

/// Correlator configuration.
#[derive(Debug, Clone)]
pub struct CorrelatorConfig {
    pub signing: SigningConfig,
    pub store: StoreConfig,
}

impl CorrelatorConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Result<Self, ContextError> {
        Ok(Self {
            signing: SigningConfig::from_env()?,
            store: StoreConfig::from_env()?,
        })
    }
}

/// Shared components of the correlator.
#[derive(Clone)]
pub struct CorrelatorContext {
    store: Arc<dyn CorrelationStore>,
    normalizers: Arc<NormalizerRegistry>,
    resumer: Arc<dyn WorkflowResumer>,
    dispatcher: CompletionDispatcher,
    clock: Arc<dyn Clock>,
}

impl CorrelatorContext {
    /// Wire the production components: signed client, configured store and
    /// Step Functions resumer.
    pub fn new(config: CorrelatorConfig) -> Result<Self, ContextError> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let client = SignedRequestClient::new(config.signing)?;
        let store = build_store(&config.store, &client, clock.clone())?;
        let resumer = Arc::new(StepFunctionsResumer::new(client));
        Ok(Self::from_parts(store, resumer, clock))
    }

    pub fn from_env() -> Result<Self, ContextError> {
        Self::new(CorrelatorConfig::from_env()?)
    }

    /// Assemble from explicit components.
    pub fn from_parts(
        store: Arc<dyn CorrelationStore>,
        resumer: Arc<dyn WorkflowResumer>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let normalizers = Arc::new(NormalizerRegistry::new());
        let dispatcher = CompletionDispatcher::new(
            store.clone(),
            normalizers.clone(),
            resumer.clone(),
            clock.clone(),
        );
        Self {
            store,
            normalizers,
            resumer,
            dispatcher,
            clock,
        }
    }

    pub fn dispatcher(&self) -> &CompletionDispatcher {
        &self.dispatcher
    }

    pub fn store(&self) -> &Arc<dyn CorrelationStore> {
        &self.store
    }

    pub fn normalizers(&self) -> &NormalizerRegistry {
        &self.normalizers
    }

    pub fn resumer(&self) -> &Arc<dyn WorkflowResumer> {
        &self.resumer
    }

    /// Suspend `step` until `job_id` finishes, stamping with the context clock.
    pub async fn suspend(
        &self,
        step: WorkflowStep,
        job_id: &JobId,
        token: ContinuationToken,
        service: ServiceKind,
        snapshot: &Value,
    ) -> StoreResult<Value> {
        suspend(
            self.store.as_ref(),
            step,
            job_id,
            token,
            service,
            snapshot,
            self.clock.now(),
        )
        .await
    }
}
