//! Spawning and reaping the tool process.

use std::io::{self, BufWriter};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::SESSION_TARGET;
use super::state::RunningProcess;
use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::framing::{BatchWriter, spawn_pump};

/// Flags that put the tool into stay-open mode reading arguments from stdin.
const STAY_OPEN_ARGS: [&str; 4] = ["-stay_open", "True", "-@", "-"];

/// How long a process may take to exit after the shutdown directive.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Interval between exit checks during the grace period.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Spawns `executable` in stay-open mode and starts the stdout pump.
pub(super) fn spawn(
    executable: &Path,
    config: &SessionConfig,
) -> Result<RunningProcess, SessionError> {
    debug!(
        target: SESSION_TARGET,
        executable = %executable.display(),
        launch_args = ?config.launch_args(),
        "spawning tool process"
    );

    let launch_error = |source: io::Error| SessionError::Launch {
        executable: executable.display().to_string(),
        source: Arc::new(source),
    };

    let mut child = Command::new(executable)
        .args(config.launch_args())
        .args(STAY_OPEN_ARGS)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(launch_error)?;

    let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
        kill(&mut child);
        return Err(launch_error(io::Error::other("failed to capture stdio")));
    };

    let lines = match spawn_pump(stdout, "exifstay") {
        Ok(lines) => lines,
        Err(error) => {
            kill(&mut child);
            return Err(launch_error(error));
        }
    };

    debug!(target: SESSION_TARGET, pid = child.id(), "tool process spawned");

    Ok(RunningProcess {
        child,
        writer: BatchWriter::new(BufWriter::new(stdin)),
        lines,
    })
}

/// Asks the process to leave stay-open mode and waits for it to exit,
/// killing it when the grace period runs out.
pub(super) fn shutdown(process: RunningProcess) -> Option<ExitStatus> {
    let RunningProcess {
        mut child,
        mut writer,
        lines,
    } = process;

    if let Err(error) = writer.write_shutdown() {
        debug!(
            target: SESSION_TARGET,
            pid = child.id(),
            error = %error,
            "shutdown directive could not be written"
        );
    }
    drop(writer);

    let status = wait_with_grace(&mut child, SHUTDOWN_GRACE);
    drop(lines);
    status
}

/// Kills the process outright and reaps it.
pub(super) fn abandon(process: RunningProcess) -> Option<ExitStatus> {
    let RunningProcess {
        mut child, lines, ..
    } = process;
    let status = kill(&mut child);
    drop(lines);
    status
}

fn wait_with_grace(child: &mut Child, grace: Duration) -> Option<ExitStatus> {
    let deadline = Instant::now() + grace;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                debug!(target: SESSION_TARGET, ?status, "tool process exited");
                return Some(status);
            }
            Ok(None) if Instant::now() < deadline => thread::sleep(POLL_INTERVAL),
            Ok(None) => {
                warn!(
                    target: SESSION_TARGET,
                    pid = child.id(),
                    grace_ms = grace.as_millis(),
                    "tool process did not exit gracefully, killing"
                );
                return kill(child);
            }
            Err(error) => {
                warn!(
                    target: SESSION_TARGET,
                    error = %error,
                    "failed to check process status, killing"
                );
                return kill(child);
            }
        }
    }
}

fn kill(child: &mut Child) -> Option<ExitStatus> {
    if let Err(error) = child.kill() {
        debug!(
            target: SESSION_TARGET,
            pid = child.id(),
            error = %error,
            "kill failed; process may already have exited"
        );
    }
    child.wait().ok()
}
