use camino::Utf8PathBuf;

use crate::logging::LogFormat;

/// Executable looked up on the search path when none is configured.
pub const DEFAULT_EXECUTABLE: &str = "exiftool";

/// Arguments prepended to every batch: grouped tag names, numeric values.
pub const DEFAULT_COMMON_ARGS: [&str; 2] = ["-G", "-n"];

/// Default log filter expression used by the binary.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default executable as a path.
#[must_use]
pub fn default_executable() -> Utf8PathBuf {
    Utf8PathBuf::from(DEFAULT_EXECUTABLE)
}

/// Default common arguments as owned strings.
#[must_use]
pub fn default_common_args() -> Vec<String> {
    DEFAULT_COMMON_ARGS.iter().map(|arg| (*arg).to_owned()).collect()
}

/// Default log filter expression used by the binary.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binary.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Json
}
