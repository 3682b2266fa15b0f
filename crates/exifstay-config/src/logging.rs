//! Shape of the log events the binary writes to stderr.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Output format for log events.
///
/// Read from `log_format` in the config file, `EXIFSTAY_LOG_FORMAT`, or
/// `--log-format`. Parsing text with [`str::parse`] ignores letter case.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// One JSON object per event with fields flattened to the top level,
    /// for log shippers.
    #[default]
    Json,
    /// One terse line per event, for reading in a terminal.
    Compact,
}

/// Returned when text names neither `json` nor `compact`.
pub type LogFormatParseError = strum::ParseError;
