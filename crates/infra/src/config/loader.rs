//! Configuration loader
//!
//! Loads Forcelink configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Loads a `.env` file from the working directory if one exists
//! 2. Attempts to load from environment variables
//! 3. If incomplete, falls back to loading from file
//! 4. Probes multiple paths for config files
//! 5. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `SALESFORCE_CLIENT_ID`: Connected app consumer key (required)
//! - `SALESFORCE_USER`: Username the assertion acts as (required)
//! - `SALESFORCE_ENDPOINT`: Token endpoint base URL (required)
//! - `SALESFORCE_KEY_PATH`: PEM private key file (required)
//! - `SALESFORCE_AUDIENCE`: `aud` claim; derived from the environment when
//!   unset
//! - `SALESFORCE_ENVIRONMENT`: `production` or `sandbox`
//! - `SALESFORCE_SANDBOX`: Shorthand for `SALESFORCE_ENVIRONMENT=sandbox`
//!   (true/false)
//! - `SALESFORCE_ALGORITHM`: `RS256`, `RS384` or `RS512`
//! - `SALESFORCE_ASSERTION_LIFETIME_SECS`: Assertion lifetime in seconds
//! - `SALESFORCE_SESSION_LIFETIME_SECS`: Session lifetime in seconds
//! - `SALESFORCE_API_VERSION`: Data API version (e.g. `v45.0`)
//! - `SALESFORCE_LOG_REQUESTS`: Log every data API response (true/false)
//! - `SALESFORCE_TIMEOUT_SECS`: HTTP request timeout in seconds
//! - `SALESFORCE_CLIENT_NAME`: Client name sent in `Sforce-Call-Options`
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./forcelink.json` or `./forcelink.toml` (current working directory)
//! 2. `./config.json` or `./config.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. `../../config.json` or `../../config.toml` (grandparent directory)
//! 5. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use forcelink_domain::constants::{
    DEFAULT_API_VERSION, DEFAULT_ASSERTION_LIFETIME_SECS, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_SESSION_LIFETIME_SECS,
};
use forcelink_domain::{
    ApiConfig, AuthConfig, Config, ForceError, OrgEnvironment, Result, SigningAlgorithm,
};

use crate::errors::InfraError;

const REQUIRED_VARS: [&str; 4] =
    ["SALESFORCE_CLIENT_ID", "SALESFORCE_USER", "SALESFORCE_ENDPOINT", "SALESFORCE_KEY_PATH"];

/// Load configuration with automatic fallback strategy
///
/// Loads `.env` first (a missing file is not an error), then attempts the
/// environment. If any required variable is missing, falls back to a config
/// file. The result is validated before it is returned.
///
/// # Errors
/// Returns `ForceError::Config` if:
/// - An environment variable is set to an invalid value
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing or empty
pub fn load() -> Result<Config> {
    load_dotenv();

    let config = match REQUIRED_VARS.iter().find(|key| env_opt(key).is_none()) {
        None => {
            let config = load_from_env()?;
            tracing::info!("Configuration loaded from environment variables");
            config
        }
        Some(missing) => {
            tracing::debug!(missing = %missing, "Environment incomplete, trying file");
            load_from_file(None)?
        }
    };

    config.auth.validate()?;
    Ok(config)
}

/// Load variables from a `.env` file in the working directory or its parents.
///
/// Variables already present in the environment win.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "Ignoring unreadable .env file"),
    }
}

/// Load configuration from environment variables
///
/// All required environment variables must be present. Returns an error
/// if any are missing.
///
/// # Environment Variables
/// See module documentation for the complete list.
///
/// # Errors
/// Returns `ForceError::Config` if required variables are missing
/// or have invalid values.
pub fn load_from_env() -> Result<Config> {
    let client_id = env_var("SALESFORCE_CLIENT_ID")?;
    let user = env_var("SALESFORCE_USER")?;
    let endpoint = env_var("SALESFORCE_ENDPOINT")?;
    let key_path = PathBuf::from(env_var("SALESFORCE_KEY_PATH")?);

    let audience = env_opt("SALESFORCE_AUDIENCE");
    let environment = match env_opt("SALESFORCE_ENVIRONMENT") {
        Some(value) => OrgEnvironment::from_str(&value).map_err(ForceError::Config)?,
        None if env_bool("SALESFORCE_SANDBOX", false) => OrgEnvironment::Sandbox,
        None => OrgEnvironment::Production,
    };
    let algorithm = env_opt("SALESFORCE_ALGORITHM")
        .map(|value| SigningAlgorithm::from_str(&value).map_err(ForceError::Config))
        .transpose()?
        .unwrap_or_default();

    let assertion_lifetime_secs =
        env_u64("SALESFORCE_ASSERTION_LIFETIME_SECS", DEFAULT_ASSERTION_LIFETIME_SECS)?;
    let session_lifetime_secs =
        env_u64("SALESFORCE_SESSION_LIFETIME_SECS", DEFAULT_SESSION_LIFETIME_SECS)?;

    let api_version =
        env_opt("SALESFORCE_API_VERSION").unwrap_or_else(|| DEFAULT_API_VERSION.to_string());
    let log_requests = env_bool("SALESFORCE_LOG_REQUESTS", false);
    let timeout_secs = env_u64("SALESFORCE_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;

    Ok(Config {
        auth: AuthConfig {
            client_id,
            user,
            audience,
            environment,
            endpoint,
            key_path,
            algorithm,
            assertion_lifetime_secs,
            session_lifetime_secs,
        },
        api: ApiConfig {
            api_version,
            log_requests,
            timeout_secs,
            client_name: env_opt("SALESFORCE_CLIENT_NAME"),
        },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Arguments
/// * `path` - Optional path to config file. If `None`, uses
///   [`probe_config_paths`].
///
/// # Errors
/// Returns `ForceError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ForceError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            ForceError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| ForceError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `ForceError::Config` if format is invalid or parsing fails.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents).map_err(|e| ForceError::from(InfraError::from(e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ForceError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(ForceError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches for config files in the following locations (in order):
/// 1. Current working directory (`./forcelink.{json,toml}`,
///    `./config.{json,toml}`)
/// 2. Parent directories (up to 2 levels)
/// 3. Relative to executable location
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidates_in(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidates_in(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidates_in(dir: &Path) -> Vec<PathBuf> {
    vec![
        dir.join("forcelink.json"),
        dir.join("forcelink.toml"),
        dir.join("config.json"),
        dir.join("config.toml"),
        dir.join("../config.json"),
        dir.join("../config.toml"),
        dir.join("../../config.json"),
        dir.join("../../config.toml"),
    ]
}

/// Get required environment variable
///
/// # Errors
/// Returns `ForceError::Config` if the variable is not set or blank.
fn env_var(key: &str) -> Result<String> {
    env_opt(key).ok_or_else(|| {
        ForceError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Optional environment variable; blank values count as unset.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn env_u64(key: &str, default: u64) -> Result<u64> {
    match env_opt(key) {
        Some(value) => value
            .parse::<u64>()
            .map_err(|e| ForceError::Config(format!("Invalid value for {}: {}", key, e))),
        None => Ok(default),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
///
/// # Returns
/// The parsed boolean value, or `default` if not set.
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
