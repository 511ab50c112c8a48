//! Store configuration and backend selection.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use segdet_models::Clock;
use segdet_signing::SignedRequestClient;

use crate::dynamodb::DynamoDbStore;
use crate::error::{StoreError, StoreResult};
use crate::memory::InMemoryStore;
use crate::redis_store::RedisStore;
use crate::CorrelationStore;

/// Default retention window (3 days).
pub const DEFAULT_RETENTION_SECS: u64 = 86400 * 3;

/// Correlation store backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    DynamoDb,
    Redis,
    Memory,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::DynamoDb => "dynamodb",
            StoreBackend::Redis => "redis",
            StoreBackend::Memory => "memory",
        }
    }
}

impl FromStr for StoreBackend {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dynamodb" => Ok(StoreBackend::DynamoDb),
            "redis" => Ok(StoreBackend::Redis),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(StoreError::configuration(format!(
                "unknown CORRELATION_BACKEND: {}",
                other
            ))),
        }
    }
}

/// Correlation store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// DynamoDB table name
    pub table: String,
    /// Redis URL (required for the redis backend)
    pub redis_url: Option<String>,
    /// Redis key prefix
    pub key_prefix: String,
    /// How long an unresolved record survives
    pub retention: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::DynamoDb,
            table: "segdet-service-token".to_string(),
            redis_url: None,
            key_prefix: "segdet:token:".to_string(),
            retention: Duration::from_secs(DEFAULT_RETENTION_SECS),
        }
    }
}

impl StoreConfig {
    /// Create config from environment variables.
    pub fn from_env() -> StoreResult<Self> {
        let defaults = Self::default();
        let backend = match std::env::var("CORRELATION_BACKEND") {
            Ok(value) if !value.is_empty() => value.parse()?,
            _ => defaults.backend,
        };

        Ok(Self {
            backend,
            table: std::env::var("CORRELATION_TABLE").unwrap_or(defaults.table),
            redis_url: std::env::var("REDIS_URL").ok().filter(|s| !s.is_empty()),
            key_prefix: std::env::var("CORRELATION_KEY_PREFIX").unwrap_or(defaults.key_prefix),
            retention: Duration::from_secs(
                std::env::var("CORRELATION_RETENTION_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_RETENTION_SECS),
            ),
        })
    }
}

/// Build the configured store.
pub fn build_store(
    config: &StoreConfig,
    client: &SignedRequestClient,
    clock: Arc<dyn Clock>,
) -> StoreResult<Arc<dyn CorrelationStore>> {
    let store: Arc<dyn CorrelationStore> = match config.backend {
        StoreBackend::DynamoDb => Arc::new(DynamoDbStore::with_clock(
            client.clone(),
            config.table.clone(),
            config.retention,
            clock,
        )),
        StoreBackend::Redis => {
            let url = config
                .redis_url
                .as_deref()
                .ok_or_else(|| StoreError::configuration("REDIS_URL must be set for the redis backend"))?;
            Arc::new(RedisStore::with_clock(
                redis::Client::open(url)?,
                config.key_prefix.clone(),
                config.retention,
                clock,
            ))
        }
        StoreBackend::Memory => Arc::new(InMemoryStore::with_clock(config.retention, clock)),
    };
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use segdet_models::SystemClock;
    use segdet_signing::{Credentials, SigningConfig};
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "CORRELATION_BACKEND",
            "CORRELATION_TABLE",
            "REDIS_URL",
            "CORRELATION_KEY_PREFIX",
            "CORRELATION_RETENTION_SECS",
        ] {
            std::env::remove_var(key);
        }
    }

    fn client() -> SignedRequestClient {
        let creds = Credentials::new("AKID", "secret", None).unwrap();
        SignedRequestClient::new(SigningConfig::new(creds, "us-east-1").unwrap()).unwrap()
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = StoreConfig::from_env().unwrap();
        assert_eq!(config.backend, StoreBackend::DynamoDb);
        assert_eq!(config.table, "segdet-service-token");
        assert_eq!(config.retention, Duration::from_secs(259200));
    }

    #[test]
    #[serial]
    fn test_unknown_backend_rejected() {
        clear_env();
        std::env::set_var("CORRELATION_BACKEND", "cassandra");
        assert!(matches!(
            StoreConfig::from_env(),
            Err(StoreError::Configuration(_))
        ));
        clear_env();
    }

    #[test]
    fn test_redis_backend_requires_url() {
        let config = StoreConfig {
            backend: StoreBackend::Redis,
            ..StoreConfig::default()
        };
        let result = build_store(&config, &client(), Arc::new(SystemClock));
        assert!(matches!(result, Err(StoreError::Configuration(_))));
    }

    #[test]
    fn test_build_selects_backend() {
        for backend in [StoreBackend::DynamoDb, StoreBackend::Memory] {
            let config = StoreConfig {
                backend,
                ..StoreConfig::default()
            };
            let store = build_store(&config, &client(), Arc::new(SystemClock)).unwrap();
            assert_eq!(store.backend(), backend.as_str());
        }
    }
}
