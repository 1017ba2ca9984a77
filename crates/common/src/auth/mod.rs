//! OAuth 2.0 JWT-bearer authentication
//!
//! Signs a short-lived assertion with the connected app's RSA key and
//! exchanges it for a bearer credential (RFC 7523).
//!
//! # Flow
//!
//! 1. Build the signing input: `base64url(header) "." base64url(claims)`
//! 2. Sign it with RSASSA-PKCS1-v1_5 (SHA-256 by default)
//! 3. `POST {endpoint}/services/oauth2/token` with the complete assertion
//! 4. Store the credential for subsequent API calls
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │ JwtBearerService │  Session orchestrator
//! └────────┬─────────┘
//!          │
//!          ├──► AssertionBuilder   (header + claims, base64url)
//!          ├──► RsaSigner          (PKCS#1 PEM, RS256/384/512)
//!          ├──► TokenExchanger     (TokenClient over HTTP)
//!          └──► CredentialStore    (RwLock-guarded slot)
//! ```
//!
//! # Usage Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use forcelink_common::auth::JwtBearerService;
//! use forcelink_domain::AuthConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AuthConfig::new(
//!         "3MVG9...",
//!         "integration@example.com",
//!         "https://login.salesforce.com",
//!         "server.key",
//!     );
//!     let service = JwtBearerService::from_config(config, Duration::from_secs(30))?;
//!
//!     let credential = service.login().await?;
//!     println!("Logged in to {}", credential.instance_url);
//!     Ok(())
//! }
//! ```
//!
//! There is no background refresh. `is_expired()` reports whether the
//! configured session lifetime has elapsed; `refresh()` logs in again.

pub mod assertion;
pub mod error;
pub mod signer;
pub mod types;

#[cfg(feature = "runtime")]
pub mod client;
#[cfg(feature = "runtime")]
pub mod credential_store;
#[cfg(feature = "runtime")]
pub mod service;
#[cfg(feature = "runtime")]
pub mod traits;

pub use assertion::{build_signing_input, complete_assertion, encode_base64url, AssertionBuilder};
#[cfg(feature = "runtime")]
pub use client::{classify_response, token_url, TokenClient};
#[cfg(feature = "runtime")]
pub use credential_store::CredentialStore;
pub use error::AuthError;
#[cfg(feature = "runtime")]
pub use service::JwtBearerService;
pub use signer::{sign_request, RsaSigner};
#[cfg(feature = "runtime")]
pub use traits::TokenExchanger;
pub use types::{AssertionConfig, JwtClaims, JwtHeader, StoredCredential, TokenEndpointResponse};
