//! sObject REST API payloads

use serde::{Deserialize, Serialize};

/// A single record as returned by the data API.
///
/// Record shapes depend on the object and the selected fields, so they stay
/// untyped JSON.
pub type Record = serde_json::Value;

/// Response of an sObject create call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveResult {
    pub id: String,
    pub errors: Vec<serde_json::Value>,
    pub success: bool,
}

/// Envelope of `/query` responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    #[serde(default)]
    pub total_size: u64,
    #[serde(default)]
    pub done: bool,
    pub records: Vec<Record>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_records_url: Option<String>,
}

/// Envelope of `/parameterizedSearch` responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub search_records: Vec<Record>,
}
