//! Logging for the `exifstay` binary.
//!
//! The session library emits its events under the `exifstay_session::*`
//! targets and this module only decides where they end up. Events go to
//! stderr so that stdout carries nothing but command output, which keeps
//! `exifstay get ... | jq` usable with logging switched on.

use std::io::{self, IsTerminal};

use exifstay_config::{Config, LogFormat};
use once_cell::sync::OnceCell;
use tracing::{Subscriber, subscriber::SetGlobalDefaultError};
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::{EnvFilter, fmt};

static INSTALLED: OnceCell<()> = OnceCell::new();

#[derive(Debug, thiserror::Error)]
pub(crate) enum TelemetryError {
    /// `log_filter` is not a list of `target=level` directives.
    #[error("log filter '{expression}' is invalid")]
    Filter {
        expression: String,
        #[source]
        source: ParseError,
    },
    #[error("a log subscriber is already installed for this process")]
    AlreadyInstalled(#[source] SetGlobalDefaultError),
}

/// Installs the stderr subscriber described by `config`.
///
/// Only the first call in a process does anything.
pub(crate) fn initialise(config: &Config) -> Result<(), TelemetryError> {
    INSTALLED.get_or_try_init(|| install(config)).map(|_| ())
}

fn install(config: &Config) -> Result<(), TelemetryError> {
    let filter = parse_filter(config.log_filter())?;
    let stderr_is_terminal = io::stderr().is_terminal();

    let events = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(stderr_is_terminal)
        .with_timer(fmt::time::UtcTime::rfc_3339());

    let subscriber: Box<dyn Subscriber + Send + Sync> = match config.log_format() {
        LogFormat::Json => Box::new(events.json().flatten_event(true).finish()),
        LogFormat::Compact => Box::new(events.compact().finish()),
    };

    tracing::subscriber::set_global_default(subscriber).map_err(TelemetryError::AlreadyInstalled)
}

fn parse_filter(expression: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(expression).map_err(|source| TelemetryError::Filter {
        expression: expression.to_owned(),
        source,
    })
}
