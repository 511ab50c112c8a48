//! Redis correlation store.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use segdet_models::{Clock, JobId, PendingOperation, SystemClock};

use crate::error::{StoreError, StoreResult};
use crate::record::CorrelationRecord;
use crate::CorrelationStore;

/// Redis-backed store: one JSON record per key, expiry via `EX`.
#[derive(Clone)]
pub struct RedisStore {
    redis: redis::Client,
    key_prefix: String,
    retention: Duration,
    clock: Arc<dyn Clock>,
}

impl RedisStore {
    pub fn new(redis: redis::Client, key_prefix: impl Into<String>, retention: Duration) -> Self {
        Self::with_clock(redis, key_prefix, retention, Arc::new(SystemClock))
    }

    pub fn with_clock(
        redis: redis::Client,
        key_prefix: impl Into<String>,
        retention: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            redis,
            key_prefix: key_prefix.into(),
            retention,
            clock,
        }
    }

    /// Connect from a `redis://` URL.
    pub fn open(url: &str, key_prefix: impl Into<String>, retention: Duration) -> StoreResult<Self> {
        let client = redis::Client::open(url)?;
        Ok(Self::new(client, key_prefix, retention))
    }

    fn key(&self, job_id: &str) -> String {
        format!("{}{}", self.key_prefix, job_id)
    }

    async fn connection(&self) -> StoreResult<redis::aio::MultiplexedConnection> {
        Ok(self.redis.get_multiplexed_async_connection().await?)
    }
}

#[async_trait]
impl CorrelationStore for RedisStore {
    async fn register(&self, op: &PendingOperation) -> StoreResult<()> {
        let now = self.clock.now();
        let ttl_secs = self.retention.as_secs().max(1);
        let expires_at = now + chrono::Duration::seconds(ttl_secs as i64);
        let record = CorrelationRecord::from_operation(op, expires_at)?;
        let value = serde_json::to_string(&record)?;
        let key = self.key(op.job_id.as_str());

        let mut conn = self.connection().await?;

        // SET key value NX EX ttl
        let result: Option<String> = redis::cmd("SET")
            .arg(&key)
            .arg(&value)
            .arg("NX")
            .arg("EX")
            .arg(ttl_secs)
            .query_async(&mut conn)
            .await?;

        // None means the key already exists
        if result.is_none() {
            return Err(StoreError::already_registered(op.job_id.as_str()));
        }
        debug!(job_id = %op.job_id, key = %key, "Registered pending operation");
        Ok(())
    }

    async fn get(&self, job_id: &JobId) -> StoreResult<PendingOperation> {
        let mut conn = self.connection().await?;
        let value: Option<String> = redis::cmd("GET")
            .arg(self.key(job_id.as_str()))
            .query_async(&mut conn)
            .await?;

        let Some(value) = value else {
            return Err(StoreError::not_found(job_id.as_str()));
        };
        let record: CorrelationRecord = serde_json::from_str(&value)?;
        if record.is_expired(self.clock.now()) {
            return Err(StoreError::not_found(job_id.as_str()));
        }
        record.into_operation()
    }

    async fn unregister(&self, job_id: &JobId) -> StoreResult<()> {
        let mut conn = self.connection().await?;
        let _deleted: i64 = redis::cmd("DEL")
            .arg(self.key(job_id.as_str()))
            .query_async(&mut conn)
            .await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_uses_prefix() {
        let store = RedisStore::open(
            "redis://127.0.0.1:6379",
            "segdet:token:",
            Duration::from_secs(60),
        )
        .unwrap();
        assert_eq!(store.key("job-1"), "segdet:token:job-1");
        assert_eq!(store.backend(), "redis");
    }

    #[test]
    fn test_invalid_url_is_error() {
        assert!(RedisStore::open("not a url", "p:", Duration::from_secs(1)).is_err());
    }
}
