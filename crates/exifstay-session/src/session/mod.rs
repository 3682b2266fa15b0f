//! A long-lived tool process driven over its stdio streams.
//!
//! A [`Session`] owns at most one child process. Batches are sent with
//! [`Session::execute`], which blocks until the tool echoes the batch's
//! sentinel or, when a timeout is configured, until the bound passes. Without
//! a timeout a tool that never answers blocks the caller indefinitely.

mod guard;
mod lifecycle;
mod state;

use std::fmt;
use std::io;
use std::process::ExitStatus;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::framing::{RawOutput, ReadError, ResponseAccumulator, Sentinel, validate_argument};
use crate::locator::find_executable;

pub use guard::SessionGuard;
pub use state::{SessionStateKind, StartOutcome};

use state::{RunningProcess, SessionState};

/// Log target for session operations.
pub(crate) const SESSION_TARGET: &str = "exifstay_session::session";

/// A persistent stay-open tool process.
///
/// Sessions move from not started to running to terminated and never back.
/// Calls take `&mut self`; share a session across threads behind a `Mutex`
/// or give each thread its own.
///
/// # Example
///
/// ```no_run
/// use exifstay_session::{Session, SessionConfig, SessionError};
///
/// let title = Session::scoped(SessionConfig::default(), |session| {
///     session.execute_str(["-XMP:Title", "-s3", "photo.jpg"])
/// })?;
/// # Ok::<(), SessionError>(())
/// ```
pub struct Session {
    config: SessionConfig,
    state: SessionState,
    batches_sent: u64,
}

impl Session {
    /// Creates a session that has not yet spawned its process.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidConfiguration`] when `config` fails
    /// [`SessionConfig::validate`].
    pub fn new(config: SessionConfig) -> Result<Self, SessionError> {
        config.validate()?;
        Ok(Self {
            config,
            state: SessionState::NotStarted,
            batches_sent: 0,
        })
    }

    /// Runs `f` against a started session and terminates it afterwards, on
    /// success, error and panic alike.
    ///
    /// # Errors
    ///
    /// Propagates construction and start failures as well as whatever `f`
    /// returns.
    pub fn scoped<T, E, F>(config: SessionConfig, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: From<SessionError>,
    {
        let mut session = Self::new(config)?;
        let mut guard = session.guard()?;
        f(&mut guard)
    }

    /// Starts the session when needed and returns a guard that terminates it
    /// on drop.
    ///
    /// # Errors
    ///
    /// Fails as [`Session::start`] does.
    pub fn guard(&mut self) -> Result<SessionGuard<'_>, SessionError> {
        if !self.is_running() {
            let outcome = self.start()?;
            debug!(target: SESSION_TARGET, ?outcome, "session guarded");
        }
        Ok(SessionGuard::new(self))
    }

    /// Spawns the tool process in stay-open mode.
    ///
    /// Starting a running session logs a warning and leaves the existing
    /// process untouched.
    ///
    /// # Errors
    ///
    /// - [`SessionError::InvalidState`] when the session has terminated.
    /// - [`SessionError::NotFound`] when the executable cannot be located.
    /// - [`SessionError::Launch`] when spawning fails.
    pub fn start(&mut self) -> Result<StartOutcome, SessionError> {
        match &self.state {
            SessionState::Running(process) => {
                warn!(
                    target: SESSION_TARGET,
                    pid = process.child.id(),
                    "session already running; start ignored"
                );
                return Ok(StartOutcome::AlreadyRunning);
            }
            SessionState::Terminated { .. } => {
                return Err(SessionError::invalid_state(
                    "start",
                    SessionStateKind::Terminated,
                ));
            }
            SessionState::NotStarted => {}
        }

        let executable = find_executable(self.config.executable(), self.config.search_path())
            .ok_or_else(|| SessionError::NotFound {
                executable: self.config.executable().display().to_string(),
                search_path: self
                    .config
                    .search_path()
                    .map(|path| path.to_string_lossy().into_owned()),
            })?;

        let process = lifecycle::spawn(&executable, &self.config)?;
        self.state = SessionState::Running(process);
        Ok(StartOutcome::Started)
    }

    /// Sends one batch and returns everything the tool printed for it.
    ///
    /// The configured common arguments are sent ahead of `args`.
    ///
    /// # Errors
    ///
    /// - [`SessionError::InvalidState`] unless the session is running.
    /// - [`SessionError::InvalidArgument`] when an argument spans lines;
    ///   nothing is sent in that case.
    /// - [`SessionError::Timeout`], [`SessionError::ProcessExited`] or
    ///   [`SessionError::Io`] when the exchange breaks down. The process is
    ///   then killed and the session is terminated.
    pub fn execute<I, S>(&mut self, args: I) -> Result<RawOutput, SessionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let state = self.state();
        let SessionState::Running(process) = &mut self.state else {
            return Err(SessionError::invalid_state("execute", state));
        };

        let arguments: Vec<String> = args.into_iter().map(Into::into).collect();
        arguments
            .iter()
            .try_for_each(|argument| validate_argument(argument))?;

        self.batches_sent += 1;
        let sentinel = Sentinel::new(self.batches_sent);
        debug!(
            target: SESSION_TARGET,
            batch = sentinel.index(),
            arguments = arguments.len(),
            "sending batch"
        );

        let outcome = exchange(
            process,
            self.config.common_args(),
            &arguments,
            sentinel,
            self.config.timeout(),
        );

        if let Err(error) = &outcome {
            warn!(
                target: SESSION_TARGET,
                batch = sentinel.index(),
                error = %error,
                "batch failed, abandoning tool process"
            );
            self.abandon();
        }
        outcome
    }

    /// Like [`Session::execute`], decoding the output as UTF-8 and replacing
    /// invalid sequences.
    ///
    /// # Errors
    ///
    /// Fails as [`Session::execute`] does.
    pub fn execute_str<I, S>(&mut self, args: I) -> Result<String, SessionError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(self.execute(args)?.text().into_owned())
    }

    /// Asks the tool to exit and waits for it, killing it after a grace
    /// period. Does nothing unless the session is running.
    ///
    /// Returns the exit status when one was observed.
    pub fn terminate(&mut self) -> Option<ExitStatus> {
        match std::mem::replace(&mut self.state, SessionState::NotStarted) {
            SessionState::Running(process) => {
                debug!(
                    target: SESSION_TARGET,
                    pid = process.child.id(),
                    "terminating tool process"
                );
                let status = lifecycle::shutdown(process);
                self.state = SessionState::Terminated { status };
                status
            }
            previous => {
                self.state = previous;
                self.exit_status()
            }
        }
    }

    fn abandon(&mut self) {
        if let SessionState::Running(process) =
            std::mem::replace(&mut self.state, SessionState::NotStarted)
        {
            let status = lifecycle::abandon(process);
            self.state = SessionState::Terminated { status };
        }
    }

    /// True while a process is alive and accepting batches.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self.state, SessionState::Running(_))
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn state(&self) -> SessionStateKind {
        self.state.kind()
    }

    /// Process id of the running child.
    #[must_use]
    pub fn pid(&self) -> Option<u32> {
        match &self.state {
            SessionState::Running(process) => Some(process.child.id()),
            SessionState::NotStarted | SessionState::Terminated { .. } => None,
        }
    }

    /// Exit status of the child once terminated; `None` before that.
    #[must_use]
    pub const fn exit_status(&self) -> Option<ExitStatus> {
        match &self.state {
            SessionState::Terminated { status } => *status,
            SessionState::NotStarted | SessionState::Running(_) => None,
        }
    }

    /// Number of batches sent so far.
    #[must_use]
    pub const fn batches_sent(&self) -> u64 {
        self.batches_sent
    }

    /// Configuration the session was built with.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }
}

fn exchange(
    process: &mut RunningProcess,
    common_args: &[String],
    arguments: &[String],
    sentinel: Sentinel,
    timeout: Option<Duration>,
) -> Result<RawOutput, SessionError> {
    process
        .writer
        .write_batch(common_args, arguments, sentinel)
        .map_err(|error| {
            if error.kind() == io::ErrorKind::BrokenPipe {
                SessionError::ProcessExited
            } else {
                SessionError::io("writing a batch", error)
            }
        })?;

    let deadline = timeout.and_then(|bound| Instant::now().checked_add(bound));
    let mut accumulator = ResponseAccumulator::new(sentinel);
    loop {
        let line = process
            .lines
            .next_line(deadline)
            .map_err(|error| match error {
                ReadError::Closed => SessionError::ProcessExited,
                ReadError::TimedOut => SessionError::Timeout {
                    timeout: timeout.unwrap_or_default(),
                },
                ReadError::Io(source) => SessionError::io("reading a response", source),
            })?;

        if let Some(output) = accumulator.push_line(&line) {
            debug!(
                target: SESSION_TARGET,
                batch = sentinel.index(),
                bytes = output.as_bytes().len(),
                status = ?output.status(),
                "sentinel received"
            );
            return Ok(output);
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("executable", &self.config.executable())
            .field("state", &self.state())
            .field("pid", &self.pid())
            .field("batches_sent", &self.batches_sent)
            .finish_non_exhaustive()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if !self.is_running() {
            return;
        }
        if thread::panicking() {
            self.abandon();
        } else {
            self.terminate();
        }
    }
}
