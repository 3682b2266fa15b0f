//! Typed metadata operations built on batch execution.
//!
//! [`MetadataClient`] turns reads, writes, keyword edits and tag copies into
//! argument lists and hands them to a [`CommandRunner`]. A running
//! [`Session`] is the production runner; tests substitute a mock.

mod keywords;

use std::path::Path;

use tracing::debug;

use crate::decoder::{MetadataRecord, TagValue, decode_records, decode_single};
use crate::error::SessionError;
use crate::framing::RawOutput;
use crate::session::Session;

pub use keywords::KeywordOperation;

/// Log target for metadata operations.
const METADATA_TARGET: &str = "exifstay_session::metadata";

/// Requests JSON output from the tool.
const JSON_FLAG: &str = "-j";

/// Writes in place instead of keeping an `_original` copy.
const OVERWRITE_ORIGINAL: &str = "-overwrite_original";

/// Executes one batch of tool arguments.
pub trait CommandRunner {
    /// Runs `args` as a single batch and returns the tool's output.
    ///
    /// # Errors
    ///
    /// Returns the runner's failure when the batch cannot be completed.
    fn execute(&mut self, args: &[String]) -> Result<RawOutput, SessionError>;
}

impl CommandRunner for Session {
    fn execute(&mut self, args: &[String]) -> Result<RawOutput, SessionError> {
        Self::execute(self, args.iter().cloned())
    }
}

impl<R: CommandRunner + ?Sized> CommandRunner for &mut R {
    fn execute(&mut self, args: &[String]) -> Result<RawOutput, SessionError> {
        (**self).execute(args)
    }
}

/// High-level metadata operations over a [`CommandRunner`].
///
/// ```no_run
/// use exifstay_session::{KeywordOperation, MetadataClient, Session, SessionConfig};
///
/// # fn main() -> Result<(), exifstay_session::SessionError> {
/// let mut session = Session::new(SessionConfig::default())?;
/// let mut guard = session.guard()?;
/// let mut client = MetadataClient::new(&mut *guard);
///
/// client.set_keywords(KeywordOperation::Add, &["nature"], "rose.jpg")?;
/// let keywords = client.get_tag("IPTC:Keywords", "rose.jpg")?;
/// # drop(keywords);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MetadataClient<R> {
    runner: R,
}

impl<R: CommandRunner> MetadataClient<R> {
    /// Wraps `runner`.
    #[must_use]
    pub const fn new(runner: R) -> Self {
        Self { runner }
    }

    /// Mutable access to the wrapped runner.
    pub const fn runner_mut(&mut self) -> &mut R {
        &mut self.runner
    }

    /// Returns the wrapped runner.
    #[must_use]
    pub fn into_inner(self) -> R {
        self.runner
    }

    /// Reads all metadata of each file in one batch.
    ///
    /// Records come back in the order of `files`. An empty `files` returns an
    /// empty list without running anything.
    ///
    /// # Errors
    ///
    /// Returns the runner's error, [`SessionError::InvalidArgument`] for a
    /// path that is not UTF-8, [`SessionError::Decode`] when the output is
    /// not a JSON array of objects, or
    /// [`SessionError::UnexpectedRecordCount`] when the tool skipped a file
    /// it could not read.
    pub fn get_metadata_batch<P: AsRef<Path>>(
        &mut self,
        files: &[P],
    ) -> Result<Vec<MetadataRecord>, SessionError> {
        if files.is_empty() {
            return Ok(Vec::new());
        }

        let mut args = vec![JSON_FLAG.to_owned()];
        for file in files {
            args.push(path_argument(file.as_ref())?);
        }
        let output = self.run(&args)?;
        let records = decode_records(output.as_bytes())?;
        if records.len() != files.len() {
            return Err(SessionError::UnexpectedRecordCount {
                expected: files.len(),
                actual: records.len(),
            });
        }
        Ok(records)
    }

    /// Reads all metadata of a single file.
    ///
    /// # Errors
    ///
    /// Fails as [`MetadataClient::get_tags`] does.
    pub fn get_metadata(&mut self, file: impl AsRef<Path>) -> Result<MetadataRecord, SessionError> {
        self.get_tags::<&str>(&[], file)
    }

    /// Reads the named tags of `file`.
    ///
    /// Names are passed through as given, so group-qualified names such as
    /// `XMP:Subject` work. The record also carries `SourceFile`.
    ///
    /// # Errors
    ///
    /// Returns the runner's error, [`SessionError::InvalidArgument`] for a
    /// non-UTF-8 path, [`SessionError::Decode`] for malformed output, or
    /// [`SessionError::UnexpectedRecordCount`] unless exactly one record
    /// comes back.
    pub fn get_tags<S: AsRef<str>>(
        &mut self,
        tag_names: &[S],
        file: impl AsRef<Path>,
    ) -> Result<MetadataRecord, SessionError> {
        let mut args = vec![JSON_FLAG.to_owned()];
        args.extend(tag_names.iter().map(|tag| format!("-{}", tag.as_ref())));
        args.push(path_argument(file.as_ref())?);
        let output = self.run(&args)?;
        decode_single(output.as_bytes())
    }

    /// Reads one tag of `file`, or `None` when the file does not carry it.
    ///
    /// An unqualified name also matches a single group-qualified key, as
    /// reported when `-G` is among the common arguments.
    ///
    /// # Errors
    ///
    /// Fails as [`MetadataClient::get_tags`] does.
    pub fn get_tag(
        &mut self,
        tag_name: &str,
        file: impl AsRef<Path>,
    ) -> Result<Option<TagValue>, SessionError> {
        let record = self.get_tags(&[tag_name], file)?;
        Ok(record.find(tag_name).cloned())
    }

    /// Writes `-TAG=VALUE` for every entry and overwrites `file` in place.
    ///
    /// Returns the tool's report (for example `1 image files updated`)
    /// without checking it. No tags means nothing to write: the tool is not
    /// run and the output is empty.
    ///
    /// # Errors
    ///
    /// Returns the runner's error or [`SessionError::InvalidArgument`] for a
    /// non-UTF-8 path or a multi-line value.
    pub fn set_tags<I, K, V>(
        &mut self,
        tags: I,
        file: impl AsRef<Path>,
    ) -> Result<RawOutput, SessionError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut args: Vec<String> = tags
            .into_iter()
            .map(|(tag, value)| format!("-{}={}", tag.as_ref(), value.as_ref()))
            .collect();
        if args.is_empty() {
            return Ok(RawOutput::default());
        }
        args.push(OVERWRITE_ORIGINAL.to_owned());
        args.push(path_argument(file.as_ref())?);
        self.run(&args)
    }

    /// Edits the `Keywords` list of `file` in place.
    ///
    /// Replacing with no keywords clears the list. Adding or removing no
    /// keywords does not run the tool and returns empty output.
    ///
    /// # Errors
    ///
    /// Fails as [`MetadataClient::set_tags`] does.
    pub fn set_keywords<S: AsRef<str>>(
        &mut self,
        operation: KeywordOperation,
        keywords: &[S],
        file: impl AsRef<Path>,
    ) -> Result<RawOutput, SessionError> {
        let mut args = operation.arguments(keywords);
        if args.is_empty() {
            return Ok(RawOutput::default());
        }
        args.push(OVERWRITE_ORIGINAL.to_owned());
        args.push(path_argument(file.as_ref())?);
        self.run(&args)
    }

    /// Copies every tag from `source` to `target`, overwriting `target` in
    /// place.
    ///
    /// # Errors
    ///
    /// Returns the runner's error or [`SessionError::InvalidArgument`] for a
    /// non-UTF-8 path.
    pub fn copy_tags(
        &mut self,
        source: impl AsRef<Path>,
        target: impl AsRef<Path>,
    ) -> Result<RawOutput, SessionError> {
        let args = vec![
            String::from("-TagsFromFile"),
            path_argument(source.as_ref())?,
            String::from("-all:all"),
            OVERWRITE_ORIGINAL.to_owned(),
            path_argument(target.as_ref())?,
        ];
        self.run(&args)
    }

    fn run(&mut self, args: &[String]) -> Result<RawOutput, SessionError> {
        debug!(target: METADATA_TARGET, ?args, "running metadata batch");
        self.runner.execute(args)
    }
}

fn path_argument(path: &Path) -> Result<String, SessionError> {
    path.to_str()
        .map(str::to_owned)
        .ok_or_else(|| SessionError::InvalidArgument {
            argument: path.to_string_lossy().into_owned(),
        })
}
