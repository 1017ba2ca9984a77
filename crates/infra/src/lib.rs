//! # Forcelink Infrastructure
//!
//! I/O side of Forcelink.
//!
//! This crate contains:
//! - Configuration loading (`.env`, environment, JSON/TOML files)
//! - The shared HTTP client and error conversions
//! - Logging initialisation
//! - The sObject REST client
//!
//! ## Architecture
//! - Builds on the authentication flow in `forcelink-common`
//! - Uses the domain types in `forcelink-domain`
//! - Contains all "impure" code (network, files, environment)

pub mod config;
pub mod errors;
pub mod http;
pub mod observability;
pub mod sobjects;

// Re-export commonly used items
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use observability::{init_tracing, init_tracing_with, LogFormat};
pub use sobjects::{connect, CredentialProvider, ResponseRecord, SObjectClient};
