//! Provider credentials: public tokens, access tokens and their grants

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Short, log-safe identifier for a secret token
///
/// First 12 hex chars of the SHA-256 digest. Tokens themselves never reach logs.
pub fn fingerprint(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    hex::encode(digest)[..12].to_string()
}

/// Single-use token issued by the provider's link flow
#[derive(Clone, PartialEq, Eq)]
pub struct PublicToken(String);

impl PublicToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn fingerprint(&self) -> String {
        fingerprint(&self.0)
    }
}

impl fmt::Debug for PublicToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicToken({})", self.fingerprint())
    }
}

/// Durable credential for ongoing provider requests
#[derive(Clone, PartialEq, Eq)]
pub struct AccessCredential {
    access_token: String,
}

impl AccessCredential {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn fingerprint(&self) -> String {
        fingerprint(&self.access_token)
    }
}

impl fmt::Debug for AccessCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessCredential({})", self.fingerprint())
    }
}

/// Provider payload returned by a successful token exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTokenGrant {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl AccessTokenGrant {
    pub fn credential(&self) -> AccessCredential {
        AccessCredential::new(self.access_token.clone())
    }
}
