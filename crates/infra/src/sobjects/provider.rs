//! Source of the bearer credential for data API calls

use async_trait::async_trait;
use forcelink_common::auth::{JwtBearerService, TokenExchanger};
use forcelink_domain::{Credential, ForceError, Result};

/// Supplies the credential attached to each data API request
///
/// Implemented by [`JwtBearerService`]; tests and embedders can supply
/// their own.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Current credential.
    ///
    /// # Errors
    /// Returns `ForceError::Auth` when no credential is available.
    async fn credential(&self) -> Result<Credential>;
}

#[async_trait]
impl<E: TokenExchanger> CredentialProvider for JwtBearerService<E> {
    async fn credential(&self) -> Result<Credential> {
        JwtBearerService::credential(self).await.map_err(ForceError::from)
    }
}

#[async_trait]
impl CredentialProvider for Credential {
    async fn credential(&self) -> Result<Credential> {
        Ok(self.clone())
    }
}
