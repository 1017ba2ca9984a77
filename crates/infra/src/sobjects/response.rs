//! Data API response records
//!
//! Each response is summarised as `{"url","status_code","body"}`. The record
//! is what request logging emits and what a failed call carries as its
//! error message.

use forcelink_domain::ForceError;
use serde::Serialize;
use serde_json::Value;

/// Summary of one data API response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseRecord {
    pub url: String,
    pub status_code: u16,
    /// Body as JSON; non-JSON bodies are kept as a string, empty bodies as
    /// `null`
    pub body: Value,
}

impl ResponseRecord {
    #[must_use]
    pub fn new(url: impl Into<String>, status_code: u16, body: &[u8]) -> Self {
        let body = if body.iter().all(u8::is_ascii_whitespace) {
            Value::Null
        } else {
            serde_json::from_slice(body)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
        };
        Self { url: url.into(), status_code, body }
    }

    /// Any status above 299 fails the call.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.status_code > 299
    }

    /// Compact JSON rendering of the record.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"url":"{}","status_code":{}}}"#, self.url, self.status_code)
        })
    }

    /// `ForceError::Api` carrying this record.
    #[must_use]
    pub fn into_error(self) -> ForceError {
        ForceError::Api(self.to_json())
    }
}
