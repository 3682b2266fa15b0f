//! Background pump that turns the child's stdout into a line channel.
//!
//! Blocking reads cannot be interrupted, so a dedicated thread owns stdout and
//! forwards each line. The session side waits on the channel, which lets it
//! honour an optional deadline. The thread ends when stdout reaches EOF or
//! the receiving side goes away.

use std::io::{self, BufRead, BufReader, Read};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Instant;

use tracing::debug;

use super::FRAMING_TARGET;

/// Why a line could not be produced.
#[derive(Debug)]
pub(crate) enum ReadError {
    /// Stdout reached EOF; the child has gone.
    Closed,
    /// The deadline passed before a line arrived.
    TimedOut,
    /// Reading stdout failed.
    Io(io::Error),
}

/// Receiving end of the stdout pump.
#[derive(Debug)]
pub(crate) struct LineReceiver {
    lines: Receiver<io::Result<Vec<u8>>>,
}

impl LineReceiver {
    /// Waits for the next line, up to `deadline` when one is given.
    pub(crate) fn next_line(&self, deadline: Option<Instant>) -> Result<Vec<u8>, ReadError> {
        let received = match deadline {
            None => self.lines.recv().map_err(|_| ReadError::Closed),
            Some(limit) => {
                let remaining = limit.saturating_duration_since(Instant::now());
                self.lines.recv_timeout(remaining).map_err(|error| match error {
                    RecvTimeoutError::Timeout => ReadError::TimedOut,
                    RecvTimeoutError::Disconnected => ReadError::Closed,
                })
            }
        }?;
        received.map_err(ReadError::Io)
    }
}

/// Starts the pump thread for `stdout`.
pub(crate) fn spawn_pump<R>(stdout: R, label: &str) -> io::Result<LineReceiver>
where
    R: Read + Send + 'static,
{
    let (sender, lines) = mpsc::channel();
    thread::Builder::new()
        .name(format!("{label}-stdout"))
        .spawn(move || pump_lines(BufReader::new(stdout), &sender))?;
    Ok(LineReceiver { lines })
}

fn pump_lines<R: BufRead>(mut reader: R, sender: &Sender<io::Result<Vec<u8>>>) {
    loop {
        let mut line = Vec::new();
        match reader.read_until(b'\n', &mut line) {
            Ok(0) => {
                debug!(target: FRAMING_TARGET, "tool stdout closed");
                return;
            }
            Ok(_) => {
                if sender.send(Ok(line)).is_err() {
                    return;
                }
            }
            Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
            Err(error) => {
                drop(sender.send(Err(error)));
                return;
            }
        }
    }
}
