//! Authentication core shared across Forcelink crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: assertion building and RSA signing, no I/O
//! - `runtime`: token exchange, credential store and session service
//! - `test-utils`: scripted token exchanger for downstream tests

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Auth (split across tiers inside the module)
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod auth;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "test-utils", all(test, feature = "runtime")))]
pub mod testing;

// Re-export commonly used types
// ------------------------
#[cfg(feature = "foundation")]
pub use auth::{AssertionBuilder, AuthError, RsaSigner};
#[cfg(feature = "runtime")]
pub use auth::{CredentialStore, JwtBearerService, TokenClient, TokenExchanger};
