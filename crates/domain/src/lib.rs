//! # Forcelink Domain
//!
//! Domain types shared by every Forcelink crate.
//!
//! This crate contains:
//! - The workspace error type and `Result` alias
//! - Token endpoint payloads (credential, error response)
//! - sObject API payloads (save results, query and search envelopes)
//! - Configuration structures and protocol constants
//!
//! ## Architecture
//! - No dependencies on other Forcelink crates
//! - Only external dependencies allowed
//! - Pure data structures, no I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
