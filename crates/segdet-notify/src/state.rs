//! Application state.

use std::sync::Arc;

use segdet_status::{ContextError, CorrelatorContext};

use crate::config::NotifyConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: NotifyConfig,
    pub context: Arc<CorrelatorContext>,
}

impl AppState {
    /// Build the correlator from the environment.
    pub fn new(config: NotifyConfig) -> Result<Self, ContextError> {
        let context = CorrelatorContext::from_env()?;
        Ok(Self::with_context(config, context))
    }

    pub fn with_context(config: NotifyConfig, context: CorrelatorContext) -> Self {
        Self {
            config,
            context: Arc::new(context),
        }
    }
}
