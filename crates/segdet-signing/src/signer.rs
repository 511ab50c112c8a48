//! SigV4 request signing.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use segdet_models::{Clock, SystemClock};

use crate::canonical::{
    canonical_query_string, canonical_request, canonical_uri, credential_scope, hmac_sha256,
    signed_headers, signing_key, string_to_sign, ALGORITHM,
};
use crate::credentials::Credentials;
use crate::endpoint::Endpoint;

pub const X_AMZ_DATE: &str = "x-amz-date";
pub const X_AMZ_SECURITY_TOKEN: &str = "x-amz-security-token";
pub const AUTHORIZATION: &str = "Authorization";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const HOST: &str = "host";

/// Request description before signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub method: String,
    /// Scheme and authority, optionally followed by a base path.
    pub endpoint: Endpoint,
    pub path: String,
    pub query_params: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl SignedRequest {
    pub fn new(method: impl Into<String>, endpoint: Endpoint, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            endpoint,
            path: path.into(),
            query_params: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        set_header(&mut self.headers, &name.into(), value.into());
        self
    }

    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Signed request, ready to transmit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequestResult {
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl SignedRequestResult {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Signs requests for a service.
pub trait Signer: Send + Sync {
    fn sign(&self, request: &SignedRequest, service_name: &str) -> SignedRequestResult;
}

/// SigV4 signer bound to a credential set and region.
#[derive(Clone)]
pub struct SigV4Signer {
    credentials: Credentials,
    region: String,
    clock: Arc<dyn Clock>,
}

impl SigV4Signer {
    pub fn new(credentials: Credentials, region: impl Into<String>) -> Self {
        Self::with_clock(credentials, region, Arc::new(SystemClock))
    }

    pub fn with_clock(
        credentials: Credentials,
        region: impl Into<String>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            credentials,
            region: region.into(),
            clock,
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }
}

impl Signer for SigV4Signer {
    fn sign(&self, request: &SignedRequest, service_name: &str) -> SignedRequestResult {
        sign_request(
            request,
            &self.credentials,
            &self.region,
            service_name,
            self.clock.now(),
        )
    }
}

/// Sign `request` at `timestamp`.
///
/// Pure: identical inputs always produce identical output. The `host` header
/// (with any non-default port, matching what the HTTP client sends) takes part
/// in signing but is not transmitted; the session token is attached after
/// signing.
pub fn sign_request(
    request: &SignedRequest,
    credentials: &Credentials,
    region: &str,
    service_name: &str,
    timestamp: DateTime<Utc>,
) -> SignedRequestResult {
    let endpoint = &request.endpoint;
    let path = format!("{}{}", endpoint.base_path(), request.path);
    let method = request.method.to_ascii_uppercase();
    let mut headers = request.headers.clone();

    let body = match request.body.as_deref() {
        Some(body) if !is_read(&method) => body,
        _ => "",
    };
    if body.is_empty() {
        remove_header(&mut headers, CONTENT_TYPE);
    }

    let amz_date = timestamp.format("%Y%m%dT%H%M%SZ").to_string();
    let date = &amz_date[..8];
    set_header(&mut headers, X_AMZ_DATE, amz_date.clone());
    set_header(&mut headers, HOST, endpoint.host());

    let canonical = canonical_request(&method, &path, &request.query_params, &headers, body);
    let scope = credential_scope(date, region, service_name);
    let to_sign = string_to_sign(&amz_date, &scope, &canonical);
    let key = signing_key(&credentials.secret_key, date, region, service_name);
    let signature = hex::encode(hmac_sha256(&key, to_sign.as_bytes()));

    let authorization = format!(
        "{} Credential={}/{}, SignedHeaders={}, Signature={}",
        ALGORITHM,
        credentials.access_key,
        scope,
        signed_headers(&headers),
        signature
    );
    set_header(&mut headers, AUTHORIZATION, authorization);

    if let Some(token) = &credentials.session_token {
        set_header(&mut headers, X_AMZ_SECURITY_TOKEN, token.clone());
    }
    remove_header(&mut headers, HOST);

    let mut url = format!("{}{}", endpoint.origin(), canonical_uri(&path));
    let query = canonical_query_string(&request.query_params);
    if !query.is_empty() {
        url.push('?');
        url.push_str(&query);
    }

    SignedRequestResult { url, headers }
}

fn is_read(method: &str) -> bool {
    matches!(method, "GET" | "HEAD")
}

fn set_header(headers: &mut Vec<(String, String)>, name: &str, value: String) {
    match headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
        Some(entry) => entry.1 = value,
        None => headers.push((name.to_string(), value)),
    }
}

fn remove_header(headers: &mut Vec<(String, String)>, name: &str) {
    headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
}
