//! JWT-bearer types
//!
//! The assertion header and claims, the assertion settings, the classified
//! token endpoint response and the credential as held by the session.

use std::time::Duration;

use chrono::{DateTime, Utc};
use forcelink_domain::constants::{DEFAULT_ASSERTION_LIFETIME_SECS, JWT_TYPE};
use forcelink_domain::{AuthConfig, Credential, SigningAlgorithm, TokenErrorResponse};
use serde::{Deserialize, Serialize};

/// JOSE header of the assertion
///
/// Serializes as `{"typ":"JWT","alg":"RS256"}`; field order is part of the
/// signed bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtHeader {
    pub typ: String,
    pub alg: String,
}

impl JwtHeader {
    #[must_use]
    pub fn new(algorithm: SigningAlgorithm) -> Self {
        Self { typ: JWT_TYPE.to_string(), alg: algorithm.to_string() }
    }
}

/// Assertion claims in `iss`, `sub`, `aud`, `exp` order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Connected-app client identifier
    pub iss: String,
    /// Acting username
    pub sub: String,
    /// Login URL of the org
    pub aud: String,
    /// Expiration, Unix seconds
    pub exp: i64,
}

/// Settings applied to every assertion the builder produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssertionConfig {
    pub lifetime: Duration,
    pub algorithm: SigningAlgorithm,
}

impl Default for AssertionConfig {
    fn default() -> Self {
        Self {
            lifetime: Duration::from_secs(DEFAULT_ASSERTION_LIFETIME_SECS),
            algorithm: SigningAlgorithm::default(),
        }
    }
}

impl From<&AuthConfig> for AssertionConfig {
    fn from(config: &AuthConfig) -> Self {
        Self {
            lifetime: Duration::from_secs(config.assertion_lifetime_secs),
            algorithm: config.algorithm,
        }
    }
}

/// Outcome of one token endpoint round trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenEndpointResponse {
    /// 200 with a JSON object body
    Credential(Credential),
    /// Any other status
    Rejected { status: u16, error: TokenErrorResponse },
    /// 200 whose body is not a JSON object
    Malformed { status: u16, message: String },
}

/// Credential together with the moment it was obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredential {
    pub credential: Credential,
    pub obtained_at: DateTime<Utc>,
}

impl StoredCredential {
    #[must_use]
    pub fn new(credential: Credential) -> Self {
        Self { credential, obtained_at: Utc::now() }
    }

    /// Whether `lifetime` has elapsed since the credential was obtained.
    #[must_use]
    pub fn is_older_than(&self, lifetime: Duration) -> bool {
        let Ok(lifetime) = chrono::Duration::from_std(lifetime) else {
            return false;
        };
        self.obtained_at.checked_add_signed(lifetime).map_or(false, |expires| Utc::now() >= expires)
    }
}
