//! Persisted correlation record.
//!
//! Layout: `{jobId, token, service, api, data, expiresAt}` where `data` is the
//! JSON-serialized snapshot and `expiresAt` is in epoch seconds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use segdet_models::{ContinuationToken, PendingOperation, ServiceKind};

use crate::error::{StoreError, StoreResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationRecord {
    pub job_id: String,
    pub token: String,
    pub service: String,
    pub api: String,
    pub data: String,
    pub expires_at: i64,
}

impl CorrelationRecord {
    pub fn from_operation(op: &PendingOperation, expires_at: DateTime<Utc>) -> StoreResult<Self> {
        Ok(Self {
            job_id: op.job_id.as_str().to_string(),
            token: op.token.as_str().to_string(),
            service: op.service.as_str().to_string(),
            api: op.api.clone(),
            data: serde_json::to_string(&op.snapshot)?,
            expires_at: expires_at.timestamp(),
        })
    }

    pub fn into_operation(self) -> StoreResult<PendingOperation> {
        let service: ServiceKind = self
            .service
            .parse()
            .map_err(|e| StoreError::invalid_record(format!("{}: {}", self.job_id, e)))?;
        let snapshot: Value = serde_json::from_str(&self.data)?;
        Ok(PendingOperation::new(
            self.job_id,
            ContinuationToken::new(self.token),
            service,
            self.api,
            snapshot,
        ))
    }

    /// Expired records are reported as absent even if storage has not yet
    /// evicted them.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now.timestamp()
    }

    /// DynamoDB attribute-value map.
    pub fn to_item(&self) -> Value {
        json!({
            "jobId": { "S": self.job_id },
            "token": { "S": self.token },
            "service": { "S": self.service },
            "api": { "S": self.api },
            "data": { "S": self.data },
            "expiresAt": { "N": self.expires_at.to_string() },
        })
    }

    /// Decode a DynamoDB attribute-value map.
    pub fn from_item(item: &Map<String, Value>) -> StoreResult<Self> {
        let string = |name: &str| -> StoreResult<String> {
            item.get(name)
                .and_then(|v| v.get("S"))
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| StoreError::invalid_record(format!("missing attribute {}", name)))
        };
        let expires_at = item
            .get("expiresAt")
            .and_then(|v| v.get("N"))
            .and_then(Value::as_str)
            .and_then(|n| n.parse::<i64>().ok())
            .ok_or_else(|| StoreError::invalid_record("missing attribute expiresAt"))?;

        Ok(Self {
            job_id: string("jobId")?,
            token: string("token")?,
            service: string("service")?,
            api: string("api")?,
            data: string("data")?,
            expires_at,
        })
    }
}
