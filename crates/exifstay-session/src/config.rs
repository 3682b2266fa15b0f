//! Construction-time configuration for a [`Session`](crate::Session).

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::time::Duration;

use exifstay_config::{Config, DEFAULT_COMMON_ARGS, DEFAULT_EXECUTABLE};

use crate::error::SessionError;

/// Directives owned by the session's framing; callers may not inject them.
const RESERVED_DIRECTIVES: [&str; 4] = ["-stay_open", "-@", "-execute", "-common_args"];

/// Configuration for spawning and talking to the metadata tool.
///
/// Common arguments are always a sequence: the builder accepts any iterator
/// of strings, so a lone scalar cannot be passed by mistake.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use exifstay_session::SessionConfig;
///
/// let config = SessionConfig::new("exiftool")
///     .with_common_args(["-G", "-n", "-charset", "filename=utf8"])
///     .with_timeout(Duration::from_secs(30));
/// assert_eq!(config.common_args().len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    executable: PathBuf,
    launch_args: Vec<String>,
    common_args: Vec<String>,
    search_path: Option<OsString>,
    timeout: Option<Duration>,
}

impl SessionConfig {
    /// Creates a configuration for `executable` without common arguments.
    #[must_use]
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            launch_args: Vec::new(),
            common_args: Vec::new(),
            search_path: None,
            timeout: None,
        }
    }

    /// Replaces the arguments prepended to every batch.
    #[must_use]
    pub fn with_common_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.common_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Sets arguments placed on the command line before the stay-open flags,
    /// for example the script path when the executable is an interpreter.
    #[must_use]
    pub fn with_launch_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.launch_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Searches this path list instead of `PATH`.
    #[must_use]
    pub fn with_search_path(mut self, search_path: impl Into<OsString>) -> Self {
        self.search_path = Some(search_path.into());
        self
    }

    /// Bounds how long a batch may take before the session gives up.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Executable name or path.
    #[must_use]
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Arguments placed before the stay-open flags.
    #[must_use]
    pub fn launch_args(&self) -> &[String] {
        &self.launch_args
    }

    /// Arguments prepended to every batch.
    #[must_use]
    pub fn common_args(&self) -> &[String] {
        &self.common_args
    }

    /// Explicit search path, when set.
    #[must_use]
    pub fn search_path(&self) -> Option<&OsStr> {
        self.search_path.as_deref()
    }

    /// Response timeout, when set.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Checks the configuration before a session is built from it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidConfiguration`] when the executable is
    /// empty, or when a common argument spans lines or is one of the framing
    /// directives (`-stay_open`, `-@`, `-execute`, `-common_args`).
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.executable.as_os_str().is_empty() {
            return Err(invalid("executable must not be empty"));
        }

        for argument in &self.common_args {
            if argument.contains(['\n', '\r']) {
                return Err(invalid(format!(
                    "common argument {argument:?} contains a line break"
                )));
            }
            if is_reserved_directive(argument) {
                return Err(invalid(format!(
                    "common argument {argument:?} is reserved for session framing"
                )));
            }
        }

        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> SessionError {
    SessionError::InvalidConfiguration {
        message: message.into(),
    }
}

fn is_reserved_directive(argument: &str) -> bool {
    let lowered = argument.to_ascii_lowercase();
    RESERVED_DIRECTIVES.iter().any(|directive| {
        if *directive == "-execute" {
            lowered.starts_with(directive)
        } else {
            lowered == *directive
        }
    })
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_EXECUTABLE).with_common_args(DEFAULT_COMMON_ARGS)
    }
}

impl From<&Config> for SessionConfig {
    fn from(config: &Config) -> Self {
        let mut session = Self::new(config.executable().as_std_path())
            .with_common_args(config.common_args().iter().cloned());
        if let Some(search_path) = config.search_path() {
            session = session.with_search_path(search_path);
        }
        if let Some(timeout) = config.timeout() {
            session = session.with_timeout(timeout);
        }
        session
    }
}
