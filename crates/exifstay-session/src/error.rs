//! Error types for stay-open sessions and the operations built on them.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::session::SessionStateKind;

/// Errors raised while managing the external process or decoding its output.
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    /// The executable could not be located on the search path.
    #[error("executable '{executable}' not found on the search path")]
    NotFound {
        /// Executable name or path that was requested.
        executable: String,
        /// Search path that was consulted, when one was set explicitly.
        search_path: Option<String>,
    },

    /// The executable was located but could not be spawned.
    #[error("failed to launch '{executable}': {source}")]
    Launch {
        /// Resolved executable path.
        executable: String,
        /// The underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },

    /// An operation was attempted in a state that does not permit it.
    #[error("cannot {operation} while the session is {state}")]
    InvalidState {
        /// Operation the caller attempted.
        operation: &'static str,
        /// State the session was in.
        state: SessionStateKind,
    },

    /// The tool's output was not the expected JSON.
    #[error("failed to decode tool output: {message}")]
    Decode {
        /// Description of the decoding failure.
        message: String,
        /// The underlying JSON error, when there is one.
        #[source]
        source: Option<Arc<serde_json::Error>>,
    },

    /// A decoded batch held a different number of records than requested.
    #[error("expected {expected} record(s) but the tool returned {actual}")]
    UnexpectedRecordCount {
        /// Number of records the caller asked for.
        expected: usize,
        /// Number of records decoded.
        actual: usize,
    },

    /// No sentinel arrived within the configured bound. The child has been
    /// killed because the stream can no longer be trusted.
    #[error("no response from the tool within {}ms", timeout.as_millis())]
    Timeout {
        /// The configured bound.
        timeout: Duration,
    },

    /// The child closed its output before echoing the sentinel.
    #[error("tool process exited while a batch was in flight")]
    ProcessExited,

    /// Reading from or writing to the child failed.
    #[error("I/O error while {operation}: {source}")]
    Io {
        /// What the session was doing.
        operation: &'static str,
        /// The underlying I/O error.
        #[source]
        source: Arc<io::Error>,
    },

    /// An argument cannot be framed on the line-oriented input stream.
    #[error("argument {argument:?} contains a line break")]
    InvalidArgument {
        /// The offending argument.
        argument: String,
    },

    /// The session configuration was rejected at construction.
    #[error("invalid session configuration: {message}")]
    InvalidConfiguration {
        /// Why the configuration was rejected.
        message: String,
    },
}

impl SessionError {
    pub(crate) fn io(operation: &'static str, source: io::Error) -> Self {
        Self::Io {
            operation,
            source: Arc::new(source),
        }
    }

    pub(crate) fn invalid_state(operation: &'static str, state: SessionStateKind) -> Self {
        Self::InvalidState { operation, state }
    }

    pub(crate) fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(source: serde_json::Error) -> Self {
        Self::Decode {
            message: source.to_string(),
            source: Some(Arc::new(source)),
        }
    }
}
