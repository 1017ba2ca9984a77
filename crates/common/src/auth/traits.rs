//! Traits for the token exchange step
//!
//! The session service depends on this seam rather than on the HTTP client,
//! so tests can substitute a scripted exchanger.

use async_trait::async_trait;
use forcelink_domain::Credential;

use super::error::AuthError;

/// Exchanges a signed assertion for a bearer credential
#[async_trait]
pub trait TokenExchanger: Send + Sync {
    /// Append the signature to the signing input and exchange the result.
    ///
    /// # Arguments
    /// * `signing_input` - `base64url(header) "." base64url(claims)`
    /// * `signature_b64url` - Unpadded base64url signature
    /// * `endpoint` - Token endpoint base URL (without the token path)
    ///
    /// # Errors
    /// Returns `AuthError::Transport`, `AuthError::Rejected` or
    /// `AuthError::MalformedResponse`. Never yields a credential for a
    /// non-200 response.
    async fn exchange(
        &self,
        signing_input: &str,
        signature_b64url: &str,
        endpoint: &str,
    ) -> Result<Credential, AuthError>;
}
