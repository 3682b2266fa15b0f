//! Sentinel framing over the tool's boundary-less stdio streams.
//!
//! The stay-open protocol has no message boundaries of its own. Each batch is
//! written as one argument per line and closed with an `-executeN` directive;
//! the tool answers with everything the batch produced followed by a line
//! holding `{readyN}`, optionally trailed by a numeric status:
//!
//! ```text
//! -G            \
//! -j             > batch N on stdin
//! photo.jpg     |
//! -execute7     /
//!
//! [{"SourceFile": "photo.jpg", ...}]   \ response N on stdout
//! {ready7}                             /
//! ```
//!
//! `N` comes from a per-session counter, so a sentinel can only ever close the
//! batch that requested it.

mod reader;

use std::borrow::Cow;
use std::io::{self, Write};

use tracing::warn;

use crate::error::SessionError;

pub(crate) use reader::{LineReceiver, ReadError, spawn_pump};

/// Log target for framing operations.
pub(crate) const FRAMING_TARGET: &str = "exifstay_session::framing";

/// Unique end-of-batch marker derived from the batch counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentinel {
    index: u64,
}

impl Sentinel {
    /// Creates the sentinel for batch `index`.
    #[must_use]
    pub const fn new(index: u64) -> Self {
        Self { index }
    }

    /// Batch number carried by the sentinel.
    #[must_use]
    pub const fn index(self) -> u64 {
        self.index
    }

    /// Argument that asks the tool to run the batch and echo the token.
    #[must_use]
    pub fn directive(self) -> String {
        format!("-execute{}", self.index)
    }

    /// Text the tool echoes once the batch output is complete.
    #[must_use]
    pub fn token(self) -> String {
        format!("{{ready{}}}", self.index)
    }

    /// Looks for this sentinel at the end of `line`.
    ///
    /// Returns the number of bytes preceding the token (output that the tool
    /// did not terminate with a newline) and the status trailing the token.
    pub(crate) fn match_line(self, line: &[u8]) -> Option<SentinelMatch> {
        let token = self.token();
        let needle = token.as_bytes();
        let trimmed = line.trim_ascii_end();
        let start = trimmed
            .windows(needle.len())
            .rposition(|window| window == needle)?;
        let tail = trimmed.get(start + needle.len()..)?.trim_ascii();
        let status = if tail.is_empty() {
            None
        } else {
            Some(parse_status(tail)?)
        };
        Some(SentinelMatch {
            prefix_len: start,
            status,
        })
    }
}

/// Position and status of a sentinel found in a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SentinelMatch {
    pub(crate) prefix_len: usize,
    pub(crate) status: Option<i32>,
}

fn parse_status(bytes: &[u8]) -> Option<i32> {
    std::str::from_utf8(bytes).ok()?.parse().ok()
}

/// True for `{readyM}` lines that belong to some other batch.
fn is_foreign_sentinel(line: &[u8]) -> bool {
    let Some(rest) = line.trim_ascii().strip_prefix(b"{ready") else {
        return false;
    };
    let digits_end = rest.iter().take_while(|byte| byte.is_ascii_digit()).count();
    rest.get(digits_end..)
        .is_some_and(|tail| tail.first() == Some(&b'}'))
}

/// Output of one batch with the sentinel line removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOutput {
    bytes: Vec<u8>,
    status: Option<i32>,
}

impl RawOutput {
    /// Builds raw output from bytes already stripped of the sentinel.
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>, status: Option<i32>) -> Self {
        Self {
            bytes: bytes.into(),
            status,
        }
    }

    /// Bytes written by the tool for the batch.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the output and returns its bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Output as text, replacing invalid UTF-8 sequences.
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }

    /// Status the tool reported after the sentinel, if any.
    #[must_use]
    pub const fn status(&self) -> Option<i32> {
        self.status
    }

    /// True when the batch produced no output.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Collects response lines until the expected sentinel arrives.
#[derive(Debug)]
pub(crate) struct ResponseAccumulator {
    sentinel: Sentinel,
    buffer: Vec<u8>,
}

impl ResponseAccumulator {
    pub(crate) const fn new(sentinel: Sentinel) -> Self {
        Self {
            sentinel,
            buffer: Vec::new(),
        }
    }

    /// Feeds one line (including its newline, if any). Returns the finished
    /// output once the sentinel line has been seen.
    pub(crate) fn push_line(&mut self, line: &[u8]) -> Option<RawOutput> {
        if let Some(found) = self.sentinel.match_line(line) {
            if let Some(prefix) = line.get(..found.prefix_len) {
                self.buffer.extend_from_slice(prefix);
            }
            let mut bytes = std::mem::take(&mut self.buffer);
            let kept = bytes.trim_ascii_end().len();
            bytes.truncate(kept);
            return Some(RawOutput::new(bytes, found.status));
        }

        if is_foreign_sentinel(line) {
            warn!(
                target: FRAMING_TARGET,
                expected = %self.sentinel.token(),
                received = %String::from_utf8_lossy(line.trim_ascii()),
                "skipping sentinel of another batch"
            );
            return None;
        }

        self.buffer.extend_from_slice(line);
        None
    }
}

/// Rejects arguments that cannot travel on a line-oriented stream.
pub(crate) fn validate_argument(argument: &str) -> Result<(), SessionError> {
    if argument.contains(['\n', '\r']) {
        return Err(SessionError::InvalidArgument {
            argument: argument.to_owned(),
        });
    }
    Ok(())
}

/// Writes framed batches to the tool's stdin.
#[derive(Debug)]
pub(crate) struct BatchWriter<W: Write> {
    writer: W,
}

impl<W: Write> BatchWriter<W> {
    pub(crate) const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes common arguments, caller arguments and the sentinel directive,
    /// one per line, then flushes.
    pub(crate) fn write_batch(
        &mut self,
        common_args: &[String],
        args: &[String],
        sentinel: Sentinel,
    ) -> io::Result<()> {
        for argument in common_args.iter().chain(args) {
            self.writer.write_all(argument.as_bytes())?;
            self.writer.write_all(b"\n")?;
        }
        self.writer.write_all(sentinel.directive().as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }

    /// Asks the tool to leave stay-open mode and exit.
    pub(crate) fn write_shutdown(&mut self) -> io::Result<()> {
        self.writer.write_all(b"-stay_open\nFalse\n")?;
        self.writer.flush()
    }
}
