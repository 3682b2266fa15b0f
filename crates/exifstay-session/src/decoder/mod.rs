//! Decoding of the tool's JSON output (`-j`) into per-file records.

mod value;

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::SessionError;

pub use value::TagValue;

/// Key under which the tool reports the file a record belongs to.
pub const SOURCE_FILE_KEY: &str = "SourceFile";

/// Metadata reported for one file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataRecord {
    #[serde(rename = "SourceFile", skip_serializing_if = "Option::is_none")]
    source_file: Option<PathBuf>,
    #[serde(flatten)]
    tags: BTreeMap<String, TagValue>,
}

impl MetadataRecord {
    /// Builds a record from its parts.
    #[must_use]
    pub const fn new(source_file: Option<PathBuf>, tags: BTreeMap<String, TagValue>) -> Self {
        Self { source_file, tags }
    }

    /// Normalised path of the file the record describes.
    #[must_use]
    pub fn source_file(&self) -> Option<&Path> {
        self.source_file.as_deref()
    }

    /// Value stored under exactly `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TagValue> {
        self.tags.get(key)
    }

    /// Value for `name`, accepting either the exact key or, for an
    /// unqualified name, the single key whose part after the last `:`
    /// matches it. Ambiguous matches yield `None`.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&TagValue> {
        if let Some(found) = self.tags.get(name) {
            return Some(found);
        }
        if name.contains(':') {
            return None;
        }

        let mut matches = self
            .tags
            .iter()
            .filter(|(key, _)| key.rsplit_once(':').is_some_and(|(_, tag)| tag == name));
        let (_, first) = matches.next()?;
        matches.next().is_none().then_some(first)
    }

    /// All tags except `SourceFile`, ordered by key.
    #[must_use]
    pub const fn tags(&self) -> &BTreeMap<String, TagValue> {
        &self.tags
    }

    /// Consumes the record and returns its tags.
    #[must_use]
    pub fn into_tags(self) -> BTreeMap<String, TagValue> {
        self.tags
    }

    /// Per-file error reported by the tool, such as a missing file.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.find("Error").and_then(TagValue::as_str)
    }

    /// Per-file warning reported by the tool.
    #[must_use]
    pub fn warning(&self) -> Option<&str> {
        self.find("Warning").and_then(TagValue::as_str)
    }

    fn from_object(index: usize, object: Map<String, Value>) -> Result<Self, SessionError> {
        let mut source_file = None;
        let mut tags = BTreeMap::new();
        for (key, value) in object {
            if key == SOURCE_FILE_KEY {
                let Value::String(path) = value else {
                    return Err(SessionError::decode(format!(
                        "record {index} has a non-string {SOURCE_FILE_KEY}"
                    )));
                };
                source_file = Some(normalise_source_path(&path));
            } else {
                tags.insert(key, TagValue::from(value));
            }
        }
        Ok(Self { source_file, tags })
    }
}

/// Decodes a JSON array of objects into records, keeping input order.
///
/// # Errors
///
/// Returns [`SessionError::Decode`] when `bytes` is not valid JSON (empty
/// output included), is not an array, or holds a non-object element.
pub fn decode_records(bytes: &[u8]) -> Result<Vec<MetadataRecord>, SessionError> {
    let values: Vec<Value> = serde_json::from_slice(bytes)?;
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| match value {
            Value::Object(object) => MetadataRecord::from_object(index, object),
            other => Err(SessionError::decode(format!(
                "record {index} is not a JSON object: {other}"
            ))),
        })
        .collect()
}

/// Decodes output that must hold exactly one record.
///
/// # Errors
///
/// Fails as [`decode_records`] does, and with
/// [`SessionError::UnexpectedRecordCount`] for any other number of records.
pub fn decode_single(bytes: &[u8]) -> Result<MetadataRecord, SessionError> {
    let mut records = decode_records(bytes)?;
    if records.len() != 1 {
        return Err(SessionError::UnexpectedRecordCount {
            expected: 1,
            actual: records.len(),
        });
    }
    records.pop().ok_or(SessionError::UnexpectedRecordCount {
        expected: 1,
        actual: 0,
    })
}

/// Lexically normalises a reported path: redundant separators and `.`
/// components are dropped and the native separator is used.
#[must_use]
pub fn normalise_source_path(raw: &str) -> PathBuf {
    let normalised: PathBuf = Path::new(raw)
        .components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect();
    if normalised.as_os_str().is_empty() && !raw.is_empty() {
        PathBuf::from(".")
    } else {
        normalised
    }
}
