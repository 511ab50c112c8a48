//! Correlation store for pending workflow operations.
//!
//! Maps an external job id to the [`PendingOperation`] that is waiting for it.
//! Registration is create-if-absent, lookups treat expired records as absent
//! and deletes are idempotent. Backends:
//! - [`DynamoDbStore`]: DynamoDB over the signed request client
//! - [`RedisStore`]: Redis `SET NX EX`
//! - [`InMemoryStore`]: process-local, for tests and local runs

use async_trait::async_trait;

use segdet_models::{JobId, PendingOperation};

pub mod config;
pub mod dynamodb;
pub mod error;
pub mod memory;
pub mod record;
pub mod redis_store;

pub use config::{build_store, StoreBackend, StoreConfig};
pub use dynamodb::DynamoDbStore;
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryStore;
pub use record::CorrelationRecord;
pub use redis_store::RedisStore;

/// Durable job id to pending operation mapping.
#[async_trait]
pub trait CorrelationStore: Send + Sync {
    /// Create the record for `op.job_id`.
    ///
    /// Fails with [`StoreError::AlreadyRegistered`] if a live record exists.
    async fn register(&self, op: &PendingOperation) -> StoreResult<()>;

    /// Fetch the live record. Fails with [`StoreError::NotFound`] if absent or expired.
    async fn get(&self, job_id: &JobId) -> StoreResult<PendingOperation>;

    /// Delete the record. Succeeds if it is already gone.
    async fn unregister(&self, job_id: &JobId) -> StoreResult<()>;

    /// Backend name for diagnostics.
    fn backend(&self) -> &'static str;
}
