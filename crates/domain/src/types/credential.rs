//! Token endpoint payloads
//!
//! Standard OAuth 2.0 token response (RFC 6749 §5.1) as returned by
//! `/services/oauth2/token`, plus the error body (RFC 6749 §5.2).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Bearer credential issued by the token endpoint.
///
/// Every field defaults to empty when absent from the response body, so a
/// partially populated success response still decodes.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credential {
    pub access_token: String,
    pub scope: String,
    /// Base URL of the org's data API (`https://<domain>.my.salesforce.com`)
    pub instance_url: String,
    /// Identity service URL for the authenticated user
    #[serde(rename = "id")]
    pub identity_url: String,
    pub token_type: String,
    /// Issue time in milliseconds since the epoch, as a decimal string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl Credential {
    /// Value for the `Authorization` header of data API calls.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }

    /// Whether the endpoint actually handed out a token.
    #[must_use]
    pub fn has_access_token(&self) -> bool {
        !self.access_token.is_empty()
    }
}

// Never renders the bearer token or the response signature.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &redact(&self.access_token))
            .field("scope", &self.scope)
            .field("instance_url", &self.instance_url)
            .field("identity_url", &self.identity_url)
            .field("token_type", &self.token_type)
            .field("issued_at", &self.issued_at)
            .field("signature", &self.signature.as_deref().map(redact))
            .finish()
    }
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() {
        ""
    } else {
        "[REDACTED]"
    }
}

/// Error body returned with any non-200 status from the token endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenErrorResponse {
    pub error: String,
    pub error_description: String,
}

impl fmt::Display for TokenErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.error.is_empty(), self.error_description.is_empty()) {
            (_, true) => write!(f, "{}", self.error),
            (true, false) => write!(f, "{}", self.error_description),
            (false, false) => write!(f, "{}: {}", self.error, self.error_description),
        }
    }
}
