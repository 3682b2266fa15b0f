//! Persistent stay-open sessions with an external metadata tool.
//!
//! The tool is started once in stay-open mode and then fed batches of
//! arguments over stdin. Each batch is closed with a numbered `-executeN`
//! directive and its output ends at the matching `{readyN}` sentinel, so many
//! requests reuse one process instead of paying the start-up cost each time.
//!
//! - [`Session`] owns the process and frames batches.
//! - [`decode_records`] and [`decode_single`] turn `-j` output into
//!   [`MetadataRecord`]s.
//! - [`MetadataClient`] offers typed reads, writes, keyword edits and tag
//!   copies over any [`CommandRunner`].
//! - [`find_executable`] resolves the tool on a search path.
//!
//! ```no_run
//! use exifstay_session::{MetadataClient, Session, SessionConfig, SessionError};
//!
//! let records = Session::scoped(SessionConfig::default(), |session| {
//!     MetadataClient::new(session).get_metadata_batch(&["rose.jpg", "skyscraper.jpg"])
//! })?;
//! assert_eq!(records.len(), 2);
//! # Ok::<(), SessionError>(())
//! ```

mod config;
mod decoder;
mod error;
mod framing;
mod locator;
mod metadata;
mod session;

#[cfg(all(test, unix))]
mod tests;

pub use config::SessionConfig;
pub use decoder::{
    MetadataRecord, SOURCE_FILE_KEY, TagValue, decode_records, decode_single,
    normalise_source_path,
};
pub use error::SessionError;
pub use framing::{RawOutput, Sentinel};
pub use locator::find_executable;
pub use metadata::{CommandRunner, KeywordOperation, MetadataClient};
pub use session::{Session, SessionGuard, SessionStateKind, StartOutcome};
