//! Configuration structures
//!
//! Loaded by `forcelink-infra` from environment variables or from a JSON/TOML
//! file; both sources produce the same [`Config`].

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_VERSION, DEFAULT_ASSERTION_LIFETIME_SECS, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_SESSION_LIFETIME_SECS, PRODUCTION_LOGIN_URL, SANDBOX_LOGIN_URL,
};
use crate::errors::{ForceError, Result};
use crate::impl_enum_string_conversions;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub auth: AuthConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

/// Which Salesforce login host the assertion is addressed to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrgEnvironment {
    #[default]
    Production,
    Sandbox,
}

impl_enum_string_conversions!(OrgEnvironment {
    Production => "production",
    Sandbox => "sandbox",
});

impl OrgEnvironment {
    /// Login URL used as the default `aud` claim.
    #[must_use]
    pub fn login_url(self) -> &'static str {
        match self {
            Self::Production => PRODUCTION_LOGIN_URL,
            Self::Sandbox => SANDBOX_LOGIN_URL,
        }
    }
}

/// JWS algorithm used to sign the bearer assertion.
///
/// All variants are RSASSA-PKCS1-v1_5; they differ only in the digest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SigningAlgorithm {
    #[default]
    #[serde(rename = "RS256")]
    Rs256,
    #[serde(rename = "RS384")]
    Rs384,
    #[serde(rename = "RS512")]
    Rs512,
}

impl_enum_string_conversions!(SigningAlgorithm {
    Rs256 => "RS256",
    Rs384 => "RS384",
    Rs512 => "RS512",
});

/// Inputs of the JWT bearer login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Connected app consumer key, sent as `iss`
    pub client_id: String,
    /// Username the token is issued for, sent as `sub`
    pub user: String,
    /// Explicit `aud` claim; defaults to the environment's login URL
    #[serde(default)]
    pub audience: Option<String>,
    #[serde(default)]
    pub environment: OrgEnvironment,
    /// Base URL the token request is posted to
    pub endpoint: String,
    /// PEM-encoded PKCS#1 private key file
    pub key_path: PathBuf,
    #[serde(default)]
    pub algorithm: SigningAlgorithm,
    #[serde(default = "default_assertion_lifetime")]
    pub assertion_lifetime_secs: u64,
    #[serde(default = "default_session_lifetime")]
    pub session_lifetime_secs: u64,
}

impl AuthConfig {
    /// Create a configuration with defaults for every optional field.
    #[must_use]
    pub fn new(
        client_id: impl Into<String>,
        user: impl Into<String>,
        endpoint: impl Into<String>,
        key_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            user: user.into(),
            audience: None,
            environment: OrgEnvironment::default(),
            endpoint: endpoint.into(),
            key_path: key_path.into(),
            algorithm: SigningAlgorithm::default(),
            assertion_lifetime_secs: DEFAULT_ASSERTION_LIFETIME_SECS,
            session_lifetime_secs: DEFAULT_SESSION_LIFETIME_SECS,
        }
    }

    /// Effective `aud` claim.
    #[must_use]
    pub fn audience(&self) -> &str {
        match self.audience.as_deref() {
            Some(audience) if !audience.trim().is_empty() => audience,
            _ => self.environment.login_url(),
        }
    }

    /// Check that every required field is present.
    ///
    /// # Errors
    /// Returns `ForceError::Config` naming the first empty field.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("client_id", self.client_id.as_str()),
            ("user", self.user.as_str()),
            ("endpoint", self.endpoint.as_str()),
        ];
        if let Some((name, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ForceError::Config(format!("auth.{name} must not be empty")));
        }
        if self.key_path.as_os_str().is_empty() {
            return Err(ForceError::Config("auth.key_path must not be empty".to_string()));
        }
        if self.assertion_lifetime_secs == 0 {
            return Err(ForceError::Config(
                "auth.assertion_lifetime_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// sObject REST API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Log every data API response (url, status, body) at info level
    #[serde(default)]
    pub log_requests: bool,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Sent as `Sforce-Call-Options: client={name}` when set
    #[serde(default)]
    pub client_name: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_version: default_api_version(),
            log_requests: false,
            timeout_secs: default_timeout(),
            client_name: None,
        }
    }
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_assertion_lifetime() -> u64 {
    DEFAULT_ASSERTION_LIFETIME_SECS
}

fn default_session_lifetime() -> u64 {
    DEFAULT_SESSION_LIFETIME_SECS
}
