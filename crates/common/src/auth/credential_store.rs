//! Credential store
//!
//! Holds the active credential for a session:
//! - Logins overwrite the slot wholesale under the write lock
//! - Readers clone the credential under the read lock
//! - Expiry is judged from the time the credential was obtained

use std::sync::Arc;
use std::time::Duration;

use forcelink_domain::Credential;
use tokio::sync::RwLock;
use tracing::info;

use super::error::AuthError;
use super::types::StoredCredential;

/// Shared slot for the active credential
///
/// Cloning the store shares the slot.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    current: Arc<RwLock<Option<StoredCredential>>>,
    session_lifetime: Duration,
}

impl CredentialStore {
    /// Create an empty store.
    ///
    /// # Arguments
    /// * `session_lifetime` - How long a credential is treated as valid after
    ///   it was obtained
    #[must_use]
    pub fn new(session_lifetime: Duration) -> Self {
        Self { current: Arc::new(RwLock::new(None)), session_lifetime }
    }

    /// Replace the active credential.
    pub async fn store(&self, credential: Credential) {
        *self.current.write().await = Some(StoredCredential::new(credential));
        info!("Credential stored");
    }

    /// Current credential, if any.
    pub async fn get(&self) -> Option<StoredCredential> {
        self.current.read().await.clone()
    }

    /// Current credential, or `NotAuthenticated`.
    ///
    /// # Errors
    /// Returns `AuthError::NotAuthenticated` if nothing has been stored.
    pub async fn credential(&self) -> Result<Credential, AuthError> {
        self.current
            .read()
            .await
            .as_ref()
            .map(|stored| stored.credential.clone())
            .ok_or(AuthError::NotAuthenticated)
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// Whether the stored credential has outlived the session lifetime.
    ///
    /// An empty store counts as expired.
    pub async fn is_expired(&self) -> bool {
        match self.current.read().await.as_ref() {
            Some(stored) => stored.is_older_than(self.session_lifetime),
            None => true,
        }
    }

    /// Drop the active credential.
    pub async fn clear(&self) {
        *self.current.write().await = None;
        info!("Credential cleared (logged out)");
    }

    #[must_use]
    pub fn session_lifetime(&self) -> Duration {
        self.session_lifetime
    }
}
