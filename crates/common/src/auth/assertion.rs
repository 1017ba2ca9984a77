//! Assertion builder
//!
//! Produces the signing input `base64url(header) "." base64url(claims)`.
//! Each segment is URL-safe base64 of the exact serialized JSON bytes, without
//! padding.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};

use super::error::AuthError;
use super::types::{AssertionConfig, JwtClaims, JwtHeader};

/// URL-safe base64 without `=` padding.
#[must_use]
pub fn encode_base64url(bytes: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Serialize header and claims and join their encodings with a single `.`.
///
/// # Errors
/// Returns `AuthError::Serialization` if either record fails to serialize.
pub fn build_signing_input(header: &JwtHeader, claims: &JwtClaims) -> Result<String, AuthError> {
    let header_json = serde_json::to_vec(header)?;
    let claims_json = serde_json::to_vec(claims)?;
    Ok(format!("{}.{}", encode_base64url(header_json), encode_base64url(claims_json)))
}

/// Append the encoded signature to the signing input.
#[must_use]
pub fn complete_assertion(signing_input: &str, signature_b64url: &str) -> String {
    format!("{signing_input}.{signature_b64url}")
}

/// Builds unsigned assertions for one client identity
#[derive(Debug, Clone, Default)]
pub struct AssertionBuilder {
    config: AssertionConfig,
}

impl AssertionBuilder {
    #[must_use]
    pub fn new(config: AssertionConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &AssertionConfig {
        &self.config
    }

    /// Signing input for an assertion issued now.
    ///
    /// # Errors
    /// See [`AssertionBuilder::build_at`].
    pub fn build(&self, issuer: &str, subject: &str, audience: &str) -> Result<String, AuthError> {
        self.build_at(issuer, subject, audience, Utc::now())
    }

    /// Signing input for an assertion issued at `issued_at`.
    ///
    /// `exp` is `issued_at` plus the configured lifetime, in whole seconds.
    ///
    /// # Errors
    /// Returns `AuthError::Configuration` for a zero lifetime and
    /// `AuthError::Serialization` if encoding fails.
    pub fn build_at(
        &self,
        issuer: &str,
        subject: &str,
        audience: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let claims = self.claims_at(issuer, subject, audience, issued_at)?;
        build_signing_input(&JwtHeader::new(self.config.algorithm), &claims)
    }

    /// Claims for an assertion issued at `issued_at`.
    ///
    /// # Errors
    /// Returns `AuthError::Configuration` when the lifetime would not place
    /// `exp` after the issue time.
    pub fn claims_at(
        &self,
        issuer: &str,
        subject: &str,
        audience: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<JwtClaims, AuthError> {
        let lifetime = i64::try_from(self.config.lifetime.as_secs()).unwrap_or(i64::MAX);
        if lifetime == 0 {
            return Err(AuthError::Configuration(
                "assertion lifetime must be at least one second".to_string(),
            ));
        }

        Ok(JwtClaims {
            iss: issuer.to_string(),
            sub: subject.to_string(),
            aud: audience.to_string(),
            exp: issued_at.timestamp().saturating_add(lifetime),
        })
    }
}
