//! sObject REST API
//!
//! [`connect`] is the usual entry point: it logs in with the JWT bearer
//! flow and returns a client bound to the resulting session.

pub mod client;
pub mod provider;
pub mod response;

use std::sync::Arc;
use std::time::Duration;

use forcelink_common::auth::JwtBearerService;
use forcelink_domain::{Config, ForceError, Result};
use tracing::info;

pub use client::SObjectClient;
pub use provider::CredentialProvider;
pub use response::ResponseRecord;

/// Log in with `config.auth` and build a client for `config.api`.
///
/// # Errors
/// - `ForceError::Config` for missing settings or an unreadable key file
/// - `ForceError::Auth` when the key is invalid or the login is rejected
/// - `ForceError::Network` when the token endpoint is unreachable
pub async fn connect(config: &Config) -> Result<SObjectClient<JwtBearerService>> {
    let timeout = Duration::from_secs(config.api.timeout_secs);
    let service = JwtBearerService::from_config(config.auth.clone(), timeout)?;
    let credential = service.login().await.map_err(ForceError::from)?;
    info!(
        instance_url = %credential.instance_url,
        api_version = %config.api.api_version,
        "Connected to Salesforce"
    );

    SObjectClient::new(Arc::new(service), config.api.clone(), config.auth.endpoint.clone())
}
