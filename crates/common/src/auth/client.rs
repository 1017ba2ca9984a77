//! Token endpoint client
//!
//! Exchanges a signed assertion for a bearer credential:
//! - One `POST {endpoint}/services/oauth2/token` per call, no retries
//! - Form body with the jwt-bearer grant type and the complete assertion
//! - Response classified into credential, rejection or malformed body

use std::time::Duration;

use async_trait::async_trait;
use forcelink_domain::constants::{JWT_BEARER_GRANT_TYPE, TOKEN_PATH};
use forcelink_domain::{Credential, TokenErrorResponse};
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use super::assertion::complete_assertion;
use super::error::AuthError;
use super::traits::TokenExchanger;
use super::types::TokenEndpointResponse;

/// Token URL for an endpoint base URL, tolerating a trailing slash.
#[must_use]
pub fn token_url(endpoint: &str) -> String {
    format!("{}{TOKEN_PATH}", endpoint.trim_end_matches('/'))
}

/// Classify a token endpoint response by status and body.
///
/// - 200 with a JSON object body: `Credential`, absent fields empty
/// - 200 with anything else: `Malformed`
/// - Any other status: `Rejected`, with an empty error when the body does not
///   decode
#[must_use]
pub fn classify_response(status: u16, body: &[u8]) -> TokenEndpointResponse {
    if status != StatusCode::OK.as_u16() {
        let error = serde_json::from_slice::<TokenErrorResponse>(body).unwrap_or_default();
        return TokenEndpointResponse::Rejected { status, error };
    }

    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(value @ serde_json::Value::Object(_)) => {
            match serde_json::from_value::<Credential>(value) {
                Ok(credential) => TokenEndpointResponse::Credential(credential),
                Err(e) => TokenEndpointResponse::Malformed { status, message: e.to_string() },
            }
        }
        Ok(other) => TokenEndpointResponse::Malformed {
            status,
            message: format!("expected a JSON object, got {}", json_kind(&other)),
        },
        Err(e) => TokenEndpointResponse::Malformed { status, message: e.to_string() },
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// HTTP client for the OAuth token endpoint
#[derive(Debug, Clone)]
pub struct TokenClient {
    http: Client,
}

impl TokenClient {
    /// Create a client whose requests time out after `timeout`.
    ///
    /// # Errors
    /// Returns `AuthError::Configuration` if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, AuthError> {
        let http = Client::builder().timeout(timeout).build().map_err(|e| {
            AuthError::Configuration(format!("failed to build token HTTP client: {e}"))
        })?;
        Ok(Self { http })
    }

    /// Wrap an existing `reqwest` client.
    #[must_use]
    pub fn with_client(http: Client) -> Self {
        Self { http }
    }

    /// Send the complete assertion and classify the response.
    ///
    /// # Errors
    /// Returns `AuthError::Transport` if the request cannot be sent or the
    /// response body cannot be read.
    pub async fn request_token(
        &self,
        endpoint: &str,
        assertion: &str,
    ) -> Result<TokenEndpointResponse, AuthError> {
        let url = token_url(endpoint);
        debug!(url = %url, "requesting bearer token");

        let response = self
            .http
            .post(&url)
            .form(&[("grant_type", JWT_BEARER_GRANT_TYPE), ("assertion", assertion)])
            .send()
            .await
            .map_err(|e| AuthError::Transport(format!("token request to {url} failed: {e}")))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| AuthError::Transport(format!("failed to read token response: {e}")))?;

        debug!(status, body_len = body.len(), "token endpoint responded");
        Ok(classify_response(status, &body))
    }

    /// Complete the assertion, exchange it and return the credential.
    ///
    /// # Errors
    /// - `AuthError::Transport` if no response was received
    /// - `AuthError::Rejected` for any non-200 status
    /// - `AuthError::MalformedResponse` for a 200 whose body is not a JSON
    ///   object
    pub async fn exchange(
        &self,
        signing_input: &str,
        signature_b64url: &str,
        endpoint: &str,
    ) -> Result<Credential, AuthError> {
        let assertion = complete_assertion(signing_input, signature_b64url);

        match self.request_token(endpoint, &assertion).await? {
            TokenEndpointResponse::Credential(credential) => Ok(credential),
            TokenEndpointResponse::Rejected { status, error } => {
                warn!(status, error = %error.error, "token endpoint rejected assertion");
                Err(AuthError::Rejected {
                    status,
                    error: error.error,
                    description: error.error_description,
                })
            }
            TokenEndpointResponse::Malformed { status, message } => {
                warn!(status, "token endpoint returned a malformed body");
                Err(AuthError::MalformedResponse { status, message })
            }
        }
    }
}

#[async_trait]
impl TokenExchanger for TokenClient {
    async fn exchange(
        &self,
        signing_input: &str,
        signature_b64url: &str,
        endpoint: &str,
    ) -> Result<Credential, AuthError> {
        Self::exchange(self, signing_input, signature_b64url, endpoint).await
    }
}
