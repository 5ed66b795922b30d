//! Structured log output for the toolchain.

use std::io::{self, IsTerminal};

use dvp_config::{Config, LogFormat};
use once_cell::sync::OnceCell;
use tracing::{Subscriber, subscriber::SetGlobalDefaultError};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

static TELEMETRY_GUARD: OnceCell<()> = OnceCell::new();

/// Handle returned once logging has been set up.
#[derive(Debug, Default, Clone, Copy)]
pub struct TelemetryHandle;

/// Errors encountered while configuring logging.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The configured log filter expression does not parse.
    #[error("invalid log filter: {0}")]
    Filter(String),
    /// Another global subscriber is already installed.
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(SetGlobalDefaultError),
}

/// Installs the global subscriber on first use.
///
/// Later calls return a fresh handle without touching global state, so
/// commands run back to back in one process keep the first configuration.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] when `log_filter` is not a valid
/// filter directive and [`TelemetryError::Subscriber`] when a different
/// subscriber was installed by someone else.
pub fn initialise(config: &Config) -> Result<TelemetryHandle, TelemetryError> {
    TELEMETRY_GUARD
        .get_or_try_init(|| install_subscriber(config))
        .map(|_| TelemetryHandle)
}

/// Returns the filter to use given the configured one and the number of
/// `-v` flags on the command line.
#[must_use]
pub fn effective_filter(configured: &str, verbosity: u8) -> String {
    match verbosity {
        0 => configured.to_owned(),
        1 => String::from("debug"),
        _ => String::from("trace"),
    }
}

fn install_subscriber(config: &Config) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_new(config.log_filter())
        .map_err(|error| TelemetryError::Filter(error.to_string()))?;

    let builder = |env_filter: EnvFilter| {
        fmt::Subscriber::builder()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_level(true)
            .with_writer(io::stderr)
            // Colour only on an interactive stderr.
            .with_ansi(io::stderr().is_terminal())
            .with_timer(fmt::time::UtcTime::rfc_3339())
    };

    let subscriber: Box<dyn Subscriber + Send + Sync> = match config.log_format() {
        LogFormat::Json => Box::new(builder(filter).json().flatten_event(true).finish()),
        LogFormat::Compact => Box::new(builder(filter).compact().finish()),
    };

    tracing::subscriber::set_global_default(subscriber).map_err(TelemetryError::Subscriber)
}
