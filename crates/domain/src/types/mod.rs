//! Wire payloads exchanged with Salesforce

pub mod credential;
pub mod sobject;

pub use credential::{Credential, TokenErrorResponse};
pub use sobject::{QueryResponse, Record, SaveResult, SearchResponse};
