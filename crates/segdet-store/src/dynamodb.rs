//! DynamoDB correlation store.
//!
//! Talks to DynamoDB's JSON protocol through the signed request client; the
//! table uses `jobId` as partition key and `expiresAt` as its TTL attribute.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use segdet_models::{Clock, JobId, PendingOperation, SystemClock};
use segdet_signing::{ServiceEndpoint, SignedRequestClient};

use crate::error::{StoreError, StoreResult};
use crate::record::CorrelationRecord;
use crate::CorrelationStore;

const CONDITIONAL_CHECK_FAILED: &str = "ConditionalCheckFailedException";

/// DynamoDB-backed store.
#[derive(Clone)]
pub struct DynamoDbStore {
    client: SignedRequestClient,
    table: String,
    retention: Duration,
    clock: Arc<dyn Clock>,
}

impl DynamoDbStore {
    pub fn new(client: SignedRequestClient, table: impl Into<String>, retention: Duration) -> Self {
        Self::with_clock(client, table, retention, Arc::new(SystemClock))
    }

    pub fn with_clock(
        client: SignedRequestClient,
        table: impl Into<String>,
        retention: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            client,
            table: table.into(),
            retention,
            clock,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    fn key(job_id: &str) -> Value {
        json!({ "jobId": { "S": job_id } })
    }
}

#[async_trait]
impl CorrelationStore for DynamoDbStore {
    async fn register(&self, op: &PendingOperation) -> StoreResult<()> {
        let now = self.clock.now();
        let expires_at = now + chrono::Duration::from_std(self.retention).unwrap_or_default();
        let record = CorrelationRecord::from_operation(op, expires_at)?;

        // An expired item still awaiting TTL deletion may be overwritten.
        let payload = json!({
            "TableName": self.table,
            "Item": record.to_item(),
            "ConditionExpression": "attribute_not_exists(jobId) OR expiresAt <= :now",
            "ExpressionAttributeValues": {
                ":now": { "N": now.timestamp().to_string() }
            },
        });

        match self
            .client
            .send(&ServiceEndpoint::DYNAMODB, "PutItem", &payload)
            .await
        {
            Ok(_) => {
                debug!(job_id = %op.job_id, table = %self.table, "Registered pending operation");
                Ok(())
            }
            Err(e) if e.is_error_type(CONDITIONAL_CHECK_FAILED) => {
                Err(StoreError::already_registered(op.job_id.as_str()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get(&self, job_id: &JobId) -> StoreResult<PendingOperation> {
        let payload = json!({
            "TableName": self.table,
            "Key": Self::key(job_id.as_str()),
            "ConsistentRead": true,
        });
        let response = self
            .client
            .send(&ServiceEndpoint::DYNAMODB, "GetItem", &payload)
            .await?;

        let Some(item) = response.get("Item").and_then(Value::as_object) else {
            return Err(StoreError::not_found(job_id.as_str()));
        };
        let record = CorrelationRecord::from_item(item)?;
        // TTL deletion is lazy; the item may outlive expiresAt.
        if record.is_expired(self.clock.now()) {
            return Err(StoreError::not_found(job_id.as_str()));
        }
        record.into_operation()
    }

    async fn unregister(&self, job_id: &JobId) -> StoreResult<()> {
        let payload = json!({
            "TableName": self.table,
            "Key": Self::key(job_id.as_str()),
        });
        self.client
            .send(&ServiceEndpoint::DYNAMODB, "DeleteItem", &payload)
            .await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "dynamodb"
    }
}
