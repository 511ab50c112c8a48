//! Normalizer lookup by service.

use std::collections::HashMap;
use std::sync::Arc;

use segdet_models::ServiceKind;

use super::{DocumentAnalysisNormalizer, StatusNormalizer, TranscodeNormalizer, VideoAnalysisNormalizer};

/// Normalizers keyed by the service recorded in the pending operation.
#[derive(Clone)]
pub struct NormalizerRegistry {
    normalizers: HashMap<ServiceKind, Arc<dyn StatusNormalizer>>,
}

impl NormalizerRegistry {
    /// Empty registry.
    pub fn empty() -> Self {
        Self {
            normalizers: HashMap::new(),
        }
    }

    /// Registry with a normalizer for every [`ServiceKind`].
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(TranscodeNormalizer::new()));
        registry.register(Arc::new(VideoAnalysisNormalizer::new()));
        registry.register(Arc::new(DocumentAnalysisNormalizer::new()));
        registry
    }

    /// Add or replace the normalizer for its service.
    pub fn register(&mut self, normalizer: Arc<dyn StatusNormalizer>) {
        self.normalizers.insert(normalizer.service(), normalizer);
    }

    pub fn get(&self, service: ServiceKind) -> Option<Arc<dyn StatusNormalizer>> {
        self.normalizers.get(&service).cloned()
    }

    /// Registered services in [`ServiceKind::ALL`] order.
    pub fn services(&self) -> impl Iterator<Item = ServiceKind> + '_ {
        ServiceKind::ALL
            .into_iter()
            .filter(|kind| self.normalizers.contains_key(kind))
    }
}

impl Default for NormalizerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
