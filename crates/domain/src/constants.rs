//! Protocol constants
//!
//! Centralized location for the Salesforce endpoint paths and OAuth values
//! used throughout the workspace.

// OAuth 2.0 JWT bearer flow (RFC 7523)
pub const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
pub const TOKEN_PATH: &str = "/services/oauth2/token";
pub const JWT_TYPE: &str = "JWT";

// Assertion validity window
pub const DEFAULT_ASSERTION_LIFETIME_SECS: u64 = 300;

// Salesforce revokes idle sessions after two hours by default
pub const DEFAULT_SESSION_LIFETIME_SECS: u64 = 7200;

// Login hosts used as the `aud` claim
pub const PRODUCTION_LOGIN_URL: &str = "https://login.salesforce.com";
pub const SANDBOX_LOGIN_URL: &str = "https://test.salesforce.com";

// Data API
pub const DATA_PATH: &str = "/services/data";
pub const DEFAULT_API_VERSION: &str = "v45.0";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
