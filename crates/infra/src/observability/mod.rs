//! Logging initialisation
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter` (from
//! `RUST_LOG`, default `info`) and a stderr fmt layer, plain or JSON.
//! Installation happens at most once per process; later calls are no-ops.

use std::io;

use once_cell::sync::OnceCell;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "info";

static INSTALLED: OnceCell<()> = OnceCell::new();

/// Output format of log events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Install the global subscriber with plain-text output.
///
/// # Errors
/// Returns an error if another subscriber was installed outside this module.
pub fn init_tracing() -> io::Result<()> {
    init_tracing_with(LogFormat::default())
}

/// Install the global subscriber with the given output format.
///
/// # Errors
/// Returns an error if another subscriber was installed outside this module.
pub fn init_tracing_with(format: LogFormat) -> io::Result<()> {
    INSTALLED.get_or_try_init(|| install(format)).map(|_| ())
}

fn install(format: LogFormat) -> io::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let subscriber = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => subscriber
            .with(fmt::layer().with_writer(io::stderr))
            .try_init()
            .map_err(|e| io::Error::other(e.to_string())),
        LogFormat::Json => subscriber
            .with(fmt::layer().json().with_writer(io::stderr))
            .try_init()
            .map_err(|e| io::Error::other(e.to_string())),
    }
}
