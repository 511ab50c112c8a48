//! Provider credentials.

use std::fmt;

use crate::error::{SigningError, SigningResult};

/// Access key pair plus optional session token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
    pub session_token: Option<String>,
}

impl Credentials {
    /// Create credentials, rejecting an empty access or secret key.
    pub fn new(
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        session_token: Option<String>,
    ) -> SigningResult<Self> {
        let access_key = access_key.into();
        let secret_key = secret_key.into();
        if access_key.is_empty() || secret_key.is_empty() {
            return Err(SigningError::configuration("missing credential"));
        }
        Ok(Self {
            access_key,
            secret_key,
            session_token: session_token.filter(|t| !t.is_empty()),
        })
    }

    /// Load credentials from the standard environment variables.
    pub fn from_env() -> SigningResult<Self> {
        let access_key = std::env::var("AWS_ACCESS_KEY_ID")
            .map_err(|_| SigningError::configuration("AWS_ACCESS_KEY_ID not set"))?;
        let secret_key = std::env::var("AWS_SECRET_ACCESS_KEY")
            .map_err(|_| SigningError::configuration("AWS_SECRET_ACCESS_KEY not set"))?;
        Self::new(access_key, secret_key, std::env::var("AWS_SESSION_TOKEN").ok())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
