//! Error taxonomy for the JWT-bearer flow

use forcelink_domain::ForceError;
use thiserror::Error;

/// Failure of any step between reading the key and storing the credential
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Required input missing or unreadable, detected before network activity
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Key material is not a PEM `RSA PRIVATE KEY` block
    #[error("Invalid key format: {0}")]
    InvalidKeyFormat(String),

    /// PEM body decoded but is not a valid PKCS#1 private key
    #[error("Key parse error: {0}")]
    KeyParse(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Signing error: {0}")]
    Signing(String),

    /// The token request was not sent or no response was received
    #[error("Transport error: {0}")]
    Transport(String),

    /// Token endpoint answered with a non-200 status
    #[error("Authentication rejected (HTTP {status}): {error}: {description}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// OAuth `error` code, empty when the body did not decode
        error: String,
        /// OAuth `error_description`, surfaced verbatim
        description: String,
    },

    /// Token endpoint answered 200 with a body that is not a JSON object
    #[error("Malformed token response (HTTP {status}): {message}")]
    MalformedResponse {
        /// HTTP status code
        status: u16,
        /// Decoder message
        message: String,
    },

    #[error("Not authenticated: no credential has been obtained")]
    NotAuthenticated,
}

impl AuthError {
    /// Stable label suitable for structured log fields.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::InvalidKeyFormat(_) => "invalid_key_format",
            Self::KeyParse(_) => "key_parse",
            Self::Serialization(_) => "serialization",
            Self::Signing(_) => "signing",
            Self::Transport(_) => "transport",
            Self::Rejected { .. } => "rejected",
            Self::MalformedResponse { .. } => "malformed_response",
            Self::NotAuthenticated => "not_authenticated",
        }
    }

    /// Whether repeating the same login could succeed without changing inputs.
    ///
    /// Only transport failures qualify. The flow itself never retries; this is
    /// for callers that want to.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<AuthError> for ForceError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Configuration(msg) => Self::Config(msg),
            AuthError::Transport(msg) => Self::Network(msg),
            other => Self::Auth(other.to_string()),
        }
    }
}
