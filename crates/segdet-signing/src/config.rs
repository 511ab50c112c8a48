//! Signing client configuration.

use std::time::Duration;

use crate::credentials::Credentials;
use crate::endpoint::Endpoint;
use crate::error::{SigningError, SigningResult};

/// Signed request client configuration.
#[derive(Debug, Clone)]
pub struct SigningConfig {
    /// Credentials used for every request
    pub credentials: Credentials,
    /// Provider region (e.g. us-east-1)
    pub region: String,
    /// Provider domain used to build endpoints
    pub domain: String,
    /// Replaces `https://{service}.{region}.{domain}` for every service (local testing)
    pub endpoint_override: Option<Endpoint>,
    /// Request timeout
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
}

impl SigningConfig {
    /// Create config, validating the region.
    pub fn new(credentials: Credentials, region: impl Into<String>) -> SigningResult<Self> {
        let region = region.into();
        if region.is_empty() {
            return Err(SigningError::configuration("missing region"));
        }
        Ok(Self {
            credentials,
            region,
            domain: "amazonaws.com".to_string(),
            endpoint_override: None,
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
        })
    }

    /// Create config from environment variables.
    pub fn from_env() -> SigningResult<Self> {
        let credentials = Credentials::from_env()?;
        let region = std::env::var("AWS_REGION")
            .or_else(|_| std::env::var("AWS_DEFAULT_REGION"))
            .map_err(|_| SigningError::configuration("AWS_REGION or AWS_DEFAULT_REGION must be set"))?;

        let mut config = Self::new(credentials, region)?;
        config.endpoint_override = std::env::var("SEGDET_ENDPOINT_OVERRIDE")
            .ok()
            .filter(|s| !s.is_empty())
            .map(|s| Endpoint::parse(&s))
            .transpose()?;
        config.timeout = Duration::from_secs(
            std::env::var("SEGDET_HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        );
        config.connect_timeout = Duration::from_secs(
            std::env::var("SEGDET_CONNECT_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
        );
        Ok(config)
    }

    /// Point every service at a single endpoint.
    pub fn with_endpoint_override(mut self, endpoint: &str) -> SigningResult<Self> {
        self.endpoint_override = Some(Endpoint::parse(endpoint)?);
        Ok(self)
    }

    /// Endpoint for a signing name.
    pub fn endpoint_for(&self, signing_name: &str) -> SigningResult<Endpoint> {
        match &self.endpoint_override {
            Some(endpoint) => Ok(endpoint.clone()),
            None => Endpoint::parse(&format!(
                "https://{}.{}.{}",
                signing_name, self.region, self.domain
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "AWS_ACCESS_KEY_ID",
            "AWS_SECRET_ACCESS_KEY",
            "AWS_SESSION_TOKEN",
            "AWS_REGION",
            "AWS_DEFAULT_REGION",
            "SEGDET_ENDPOINT_OVERRIDE",
            "SEGDET_HTTP_TIMEOUT_SECS",
            "SEGDET_CONNECT_TIMEOUT_SECS",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_missing_credentials_is_configuration_error() {
        clear_env();
        std::env::set_var("AWS_REGION", "us-east-1");
        let err = SigningConfig::from_env().unwrap_err();
        assert!(matches!(err, SigningError::Configuration(_)));
    }

    #[test]
    #[serial]
    fn test_missing_region_is_configuration_error() {
        clear_env();
        std::env::set_var("AWS_ACCESS_KEY_ID", "AKID");
        std::env::set_var("AWS_SECRET_ACCESS_KEY", "secret");
        let err = SigningConfig::from_env().unwrap_err();
        assert!(matches!(err, SigningError::Configuration(_)));
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        std::env::set_var("AWS_ACCESS_KEY_ID", "AKID");
        std::env::set_var("AWS_SECRET_ACCESS_KEY", "secret");
        std::env::set_var("AWS_DEFAULT_REGION", "eu-west-1");
        let config = SigningConfig::from_env().unwrap();
        assert_eq!(config.region, "eu-west-1");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert_eq!(
            config.endpoint_for("rekognition").unwrap().to_string(),
            "https://rekognition.eu-west-1.amazonaws.com"
        );
    }

    #[test]
    fn test_empty_region_rejected() {
        let creds = Credentials::new("AKID", "secret", None).unwrap();
        assert!(SigningConfig::new(creds, "").is_err());
    }

    #[test]
    fn test_endpoint_override() {
        let creds = Credentials::new("AKID", "secret", None).unwrap();
        let config = SigningConfig::new(creds, "us-east-1")
            .unwrap()
            .with_endpoint_override("http://127.0.0.1:4566/")
            .unwrap();
        let endpoint = config.endpoint_for("dynamodb").unwrap();
        assert_eq!(endpoint.origin(), "http://127.0.0.1:4566");
        assert_eq!(endpoint.host(), "127.0.0.1:4566");
    }

    #[test]
    #[serial]
    fn test_invalid_endpoint_override_is_configuration_error() {
        clear_env();
        std::env::set_var("AWS_ACCESS_KEY_ID", "AKID");
        std::env::set_var("AWS_SECRET_ACCESS_KEY", "secret");
        std::env::set_var("AWS_REGION", "us-east-1");
        std::env::set_var("SEGDET_ENDPOINT_OVERRIDE", "localhost:4566/not a url");
        let err = SigningConfig::from_env().unwrap_err();
        assert!(matches!(err, SigningError::Configuration(_)));
        clear_env();
    }
}
