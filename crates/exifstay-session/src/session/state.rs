//! Internal state of the tool process behind a session.

use std::fmt;
use std::io::BufWriter;
use std::process::{Child, ChildStdin, ExitStatus};

use crate::framing::{BatchWriter, LineReceiver};

/// Internal state of the tool process.
pub(super) enum SessionState {
    /// The process has not been spawned.
    NotStarted,
    /// The process is alive and accepting batches.
    Running(RunningProcess),
    /// The process has exited or been killed.
    Terminated {
        /// Exit status collected when the process was reaped.
        status: Option<ExitStatus>,
    },
}

impl SessionState {
    pub(super) const fn kind(&self) -> SessionStateKind {
        match self {
            Self::NotStarted => SessionStateKind::NotStarted,
            Self::Running(_) => SessionStateKind::Running,
            Self::Terminated { .. } => SessionStateKind::Terminated,
        }
    }
}

/// Handles owned while the process is running.
pub(super) struct RunningProcess {
    pub(super) child: Child,
    pub(super) writer: BatchWriter<BufWriter<ChildStdin>>,
    pub(super) lines: LineReceiver,
}

/// Publicly observable phase of a session.
///
/// Sessions only move forwards: `NotStarted` to `Running` to `Terminated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionStateKind {
    /// Constructed, no process yet.
    NotStarted,
    /// A process is alive and the session accepts batches.
    Running,
    /// The process has exited; the session cannot be restarted.
    Terminated,
}

impl fmt::Display for SessionStateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NotStarted => "not started",
            Self::Running => "running",
            Self::Terminated => "terminated",
        };
        f.write_str(label)
    }
}

/// Result of asking a session to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum StartOutcome {
    /// A new process was spawned.
    Started,
    /// A process was already running; nothing changed.
    AlreadyRunning,
}
