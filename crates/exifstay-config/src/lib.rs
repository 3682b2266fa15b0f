//! Shared configuration for the `exifstay` tooling.
//!
//! [`Config`] is layered by `ortho_config`: built-in defaults first, then a
//! TOML file (`--config-path` or `EXIFSTAY_CONFIG_PATH`), then `EXIFSTAY_*`
//! environment variables, and finally command-line flags. The session crate
//! turns the loaded value into its own `SessionConfig`, so no process-wide
//! mutable state is involved.

mod defaults;
mod logging;

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use defaults::{
    DEFAULT_COMMON_ARGS, DEFAULT_EXECUTABLE, DEFAULT_LOG_FILTER, default_common_args,
    default_executable, default_log_filter, default_log_filter_string, default_log_format,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Runtime configuration for a stay-open metadata session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "EXIFSTAY")]
pub struct Config {
    /// Executable name or path of the metadata tool.
    #[ortho_config(default = default_executable())]
    pub executable: Utf8PathBuf,
    /// Arguments prepended to every command batch.
    #[ortho_config(default = default_common_args())]
    pub common_args: Vec<String>,
    /// Search path consulted instead of `PATH` when locating the executable.
    pub search_path: Option<String>,
    /// Upper bound in seconds on waiting for a batch response.
    pub timeout_secs: Option<u64>,
    /// `tracing` filter expression for the binary.
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Output format of log events.
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
}

impl Config {
    /// Executable name or path of the metadata tool.
    #[must_use]
    pub fn executable(&self) -> &Utf8Path {
        &self.executable
    }

    /// Arguments prepended to every command batch.
    #[must_use]
    pub fn common_args(&self) -> &[String] {
        &self.common_args
    }

    /// Explicit search path, when one is configured.
    #[must_use]
    pub fn search_path(&self) -> Option<&str> {
        self.search_path.as_deref()
    }

    /// Response timeout, when one is configured. Zero disables the bound.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Log filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Log output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            executable: default_executable(),
            common_args: default_common_args(),
            search_path: None,
            timeout_secs: None,
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}
