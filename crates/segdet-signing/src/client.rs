//! Signed request client.
//!
//! Calls provider JSON-protocol APIs directly over HTTPS:
//! - SigV4 signing through an injectable [`Signer`]
//! - HTTP client tuning (pooling, timeouts)
//! - Observability (tracing spans, metrics)
//!
//! No retries are performed here; callers decide.

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info_span, Instrument};

use crate::config::SigningConfig;
use crate::error::{SigningError, SigningResult};
use crate::metrics::record_request;
use crate::service::ServiceEndpoint;
use crate::signer::{SigV4Signer, SignedRequest, Signer, CONTENT_TYPE};

/// Client for signed JSON-protocol calls.
#[derive(Clone)]
pub struct SignedRequestClient {
    http: Client,
    config: SigningConfig,
    signer: Arc<dyn Signer>,
}

impl SignedRequestClient {
    /// Create a client that signs with the configured credentials and the system clock.
    pub fn new(config: SigningConfig) -> SigningResult<Self> {
        let signer = Arc::new(SigV4Signer::new(
            config.credentials.clone(),
            config.region.clone(),
        ));
        Self::with_signer(config, signer)
    }

    /// Create a client with a custom signer (e.g. one on a fixed clock).
    pub fn with_signer(config: SigningConfig, signer: Arc<dyn Signer>) -> SigningResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10)
            .user_agent(concat!("segdet-signing/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(SigningError::Transport)?;

        Ok(Self {
            http,
            config,
            signer,
        })
    }

    /// Create from environment variables.
    pub fn from_env() -> SigningResult<Self> {
        Self::new(SigningConfig::from_env()?)
    }

    pub fn config(&self) -> &SigningConfig {
        &self.config
    }

    /// Call `operation` on `service` with a JSON payload.
    ///
    /// Returns the parsed response body (`{}` for an empty body). Status >= 400
    /// fails with [`SigningError::Request`], connection failures with
    /// [`SigningError::Transport`].
    pub async fn send(
        &self,
        service: &ServiceEndpoint,
        operation: &str,
        payload: &Value,
    ) -> SigningResult<Value> {
        let span = info_span!(
            "signed_request",
            service = %service.signing_name,
            operation = %operation
        );

        let start = Instant::now();
        let result = self.execute(service, operation, payload).instrument(span).await;
        let latency_ms = start.elapsed().as_millis() as f64;

        record_request(service.signing_name, operation, response_status(&result), latency_ms);

        result.map(|(_, body)| body)
    }

    async fn execute(
        &self,
        service: &ServiceEndpoint,
        operation: &str,
        payload: &Value,
    ) -> SigningResult<(u16, Value)> {
        let body = serde_json::to_string(payload)?;
        let endpoint = self.config.endpoint_for(service.signing_name)?;
        let request = SignedRequest::new("POST", endpoint, "/")
            .header("x-amz-target", service.target(operation))
            .header(CONTENT_TYPE, service.content_type)
            .header("Accept", "application/json")
            .body(body.clone());

        let signed = self.signer.sign(&request, service.signing_name);

        let mut builder = self.http.post(&signed.url).body(body);
        for (name, value) in &signed.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status.as_u16() >= 400 {
            debug!(status = status.as_u16(), body = %text, "Signed request rejected");
            return Err(SigningError::request(status.as_u16(), text));
        }

        if text.trim().is_empty() {
            return Ok((status.as_u16(), Value::Object(Default::default())));
        }
        Ok((status.as_u16(), serde_json::from_str(&text)?))
    }
}

/// HTTP status for metrics; 0 when no response arrived.
fn response_status(result: &SigningResult<(u16, Value)>) -> u16 {
    match result {
        Ok((status, _)) => *status,
        Err(e) => e.http_status().unwrap_or(0),
    }
}
