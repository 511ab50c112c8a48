//! Process-local correlation store.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use segdet_models::{Clock, JobId, PendingOperation, SystemClock};

use crate::error::{StoreError, StoreResult};
use crate::record::CorrelationRecord;
use crate::CorrelationStore;

/// In-memory store with the same semantics as the durable backends.
///
/// Records are kept in their persisted form so snapshots are isolated from
/// callers exactly as with a remote store.
pub struct InMemoryStore {
    records: RwLock<HashMap<String, CorrelationRecord>>,
    retention: Duration,
    clock: Arc<dyn Clock>,
}

impl InMemoryStore {
    pub fn new(retention: Duration) -> Self {
        Self::with_clock(retention, Arc::new(SystemClock))
    }

    pub fn with_clock(retention: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            retention,
            clock,
        }
    }

    /// Number of stored records. Expired records linger until the next
    /// `register` sweeps them.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl CorrelationStore for InMemoryStore {
    async fn register(&self, op: &PendingOperation) -> StoreResult<()> {
        let now = self.clock.now();
        let expires_at = now + chrono::Duration::from_std(self.retention).unwrap_or_default();
        let record = CorrelationRecord::from_operation(op, expires_at)?;

        let mut records = self.records.write().await;
        // Expiry sweep; records that are never unregistered must not pile up.
        records.retain(|_, r| !r.is_expired(now));
        if records.contains_key(op.job_id.as_str()) {
            return Err(StoreError::already_registered(op.job_id.as_str()));
        }
        records.insert(record.job_id.clone(), record);
        Ok(())
    }

    async fn get(&self, job_id: &JobId) -> StoreResult<PendingOperation> {
        let now = self.clock.now();
        let records = self.records.read().await;
        match records.get(job_id.as_str()) {
            Some(record) if !record.is_expired(now) => record.clone().into_operation(),
            _ => Err(StoreError::not_found(job_id.as_str())),
        }
    }

    async fn unregister(&self, job_id: &JobId) -> StoreResult<()> {
        self.records.write().await.remove(job_id.as_str());
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
