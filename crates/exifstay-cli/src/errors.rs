//! Error types for the CLI runtime.

use std::io;
use std::sync::Arc;

use exifstay_session::SessionError;
use thiserror::Error;

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("invalid assignment {0:?}; expected TAG=VALUE")]
    InvalidAssignment(String),
    #[error("executable '{0}' not found on the search path")]
    ExecutableNotFound(String),
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(serde_json::Error),
    #[error("failed to write output: {0}")]
    WriteOutput(io::Error),
}
