//! JWT-bearer session service
//!
//! Combines the assertion builder, the signer, the token exchanger and the
//! credential store into the login flow used by every API client.

use std::sync::Arc;
use std::time::Duration;

use forcelink_domain::{AuthConfig, Credential, ForceError};
use tracing::{info, instrument};

use super::assertion::AssertionBuilder;
use super::client::TokenClient;
use super::credential_store::CredentialStore;
use super::error::AuthError;
use super::signer::RsaSigner;
use super::traits::TokenExchanger;
use super::types::{AssertionConfig, StoredCredential};

/// Session for one connected app and acting user
///
/// High-level service that orchestrates:
/// - Building and signing a fresh assertion per login
/// - Exchanging it at the token endpoint (exactly one request)
/// - Holding the resulting credential for subsequent API calls
///
/// Nothing refreshes on its own; callers check [`JwtBearerService::is_expired`]
/// and call [`JwtBearerService::refresh`].
pub struct JwtBearerService<E = TokenClient>
where
    E: TokenExchanger,
{
    config: AuthConfig,
    builder: AssertionBuilder,
    signer: RsaSigner,
    exchanger: Arc<E>,
    store: CredentialStore,
}

impl<E: TokenExchanger> Clone for JwtBearerService<E> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            builder: self.builder.clone(),
            signer: self.signer.clone(),
            exchanger: Arc::clone(&self.exchanger),
            store: self.store.clone(),
        }
    }
}

impl<E: TokenExchanger> std::fmt::Debug for JwtBearerService<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtBearerService")
            .field("client_id", &self.config.client_id)
            .field("user", &self.config.user)
            .field("endpoint", &self.config.endpoint)
            .field("signer", &self.signer)
            .finish_non_exhaustive()
    }
}

impl JwtBearerService<TokenClient> {
    /// Build a service from configuration, reading the key file at
    /// `config.key_path`.
    ///
    /// # Errors
    /// - `AuthError::Configuration` if a required value is missing, the key
    ///   file cannot be read or the HTTP client cannot be built
    /// - `AuthError::InvalidKeyFormat` / `AuthError::KeyParse` for bad key
    ///   material
    pub fn from_config(config: AuthConfig, timeout: Duration) -> Result<Self, AuthError> {
        validate(&config)?;
        let pem = std::fs::read(&config.key_path).map_err(|e| {
            AuthError::Configuration(format!(
                "failed to read key file {}: {e}",
                config.key_path.display()
            ))
        })?;
        Self::new(config, &pem, TokenClient::new(timeout)?)
    }
}

impl<E: TokenExchanger> JwtBearerService<E> {
    /// Build a service from configuration and PEM key bytes.
    ///
    /// # Errors
    /// - `AuthError::Configuration` if a required value is missing
    /// - `AuthError::InvalidKeyFormat` / `AuthError::KeyParse` for bad key
    ///   material
    pub fn new(config: AuthConfig, private_key_pem: &[u8], exchanger: E) -> Result<Self, AuthError> {
        validate(&config)?;
        let signer = RsaSigner::from_pem(private_key_pem, config.algorithm)?;
        let builder = AssertionBuilder::new(AssertionConfig::from(&config));
        let store = CredentialStore::new(Duration::from_secs(config.session_lifetime_secs));

        Ok(Self { config, builder, signer, exchanger: Arc::new(exchanger), store })
    }

    /// Run the full flow and store the resulting credential.
    ///
    /// A failed login leaves any previously stored credential in place.
    ///
    /// # Errors
    /// Any `AuthError` from assertion building, signing or the exchange.
    #[instrument(skip(self), fields(client_id = %self.config.client_id, user = %self.config.user))]
    pub async fn login(&self) -> Result<Credential, AuthError> {
        let signing_input =
            self.builder.build(&self.config.client_id, &self.config.user, self.config.audience())?;
        let signature = self.signer.sign_b64url(&signing_input)?;

        let credential =
            self.exchanger.exchange(&signing_input, &signature, &self.config.endpoint).await?;

        self.store.store(credential.clone()).await;
        info!(instance_url = %credential.instance_url, "Logged in");

        Ok(credential)
    }

    /// Obtain a new credential by running the full flow again.
    ///
    /// # Errors
    /// See [`JwtBearerService::login`].
    pub async fn refresh(&self) -> Result<Credential, AuthError> {
        info!("Refreshing credential");
        self.login().await
    }

    /// Active credential.
    ///
    /// # Errors
    /// Returns `AuthError::NotAuthenticated` before the first login.
    pub async fn credential(&self) -> Result<Credential, AuthError> {
        self.store.credential().await
    }

    /// Active credential with the time it was obtained.
    pub async fn stored_credential(&self) -> Option<StoredCredential> {
        self.store.get().await
    }

    /// Bearer token of the active credential.
    ///
    /// # Errors
    /// Returns `AuthError::NotAuthenticated` before the first login.
    pub async fn access_token(&self) -> Result<String, AuthError> {
        self.credential().await.map(|credential| credential.access_token)
    }

    pub async fn is_authenticated(&self) -> bool {
        self.store.is_authenticated().await
    }

    /// Whether the session lifetime has elapsed since the last login.
    pub async fn is_expired(&self) -> bool {
        self.store.is_expired().await
    }

    /// Drop the active credential.
    pub async fn logout(&self) {
        self.store.clear().await;
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }
}

fn validate(config: &AuthConfig) -> Result<(), AuthError> {
    config.validate().map_err(|err| match err {
        ForceError::Config(msg) => AuthError::Configuration(msg),
        other => AuthError::Configuration(other.to_string()),
    })
}
