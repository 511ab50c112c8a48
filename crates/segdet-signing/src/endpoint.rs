//! Provider endpoints.

use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::error::{SigningError, SigningResult};

/// Parsed `scheme://host[:port][/base]` endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    url: Url,
}

impl Endpoint {
    /// Parse an http(s) endpoint. Query strings and fragments are rejected.
    pub fn parse(endpoint: &str) -> SigningResult<Self> {
        let url = Url::parse(endpoint)
            .map_err(|e| SigningError::configuration(format!("invalid endpoint {}: {}", endpoint, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SigningError::configuration(format!(
                "unsupported endpoint scheme {}",
                url.scheme()
            )));
        }
        if url.host_str().is_none() {
            return Err(SigningError::configuration(format!("endpoint {} has no host", endpoint)));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(SigningError::configuration(format!(
                "endpoint {} must not carry a query or fragment",
                endpoint
            )));
        }
        Ok(Self { url })
    }

    /// `scheme://host[:port]`, default ports omitted.
    pub fn origin(&self) -> String {
        self.url.origin().ascii_serialization()
    }

    /// Value of the `host` header as the HTTP client sends it: the port is
    /// included unless it is the scheme default.
    pub fn host(&self) -> String {
        let host = self.url.host_str().unwrap_or_default();
        match self.url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        }
    }

    /// Base path without a trailing slash; empty for the root.
    pub fn base_path(&self) -> &str {
        self.url.path().trim_end_matches('/')
    }
}

impl FromStr for Endpoint {
    type Err = SigningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.origin(), self.base_path())
    }
}
