//! Signed request client for provider JSON APIs.
//!
//! This crate provides:
//! - Canonical request construction (URI, query string, headers)
//! - SigV4 signing-key derivation and request signing with an injectable clock
//! - An HTTPS client that signs and sends JSON-protocol calls without a provider SDK
//! - Service descriptors for the APIs the workflow talks to
//! - A paginated reader for segment detection results

pub mod canonical;
pub mod client;
pub mod config;
pub mod credentials;
pub mod endpoint;
pub mod error;
pub mod metrics;
pub mod segments;
pub mod service;
pub mod signer;

pub use client::SignedRequestClient;
pub use config::SigningConfig;
pub use credentials::Credentials;
pub use endpoint::Endpoint;
pub use error::{SigningError, SigningResult};
pub use segments::{SegmentDetectionReader, SegmentDetectionResults};
pub use service::ServiceEndpoint;
pub use signer::{sign_request, SigV4Signer, SignedRequest, SignedRequestResult, Signer};
