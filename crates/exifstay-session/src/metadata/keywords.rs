//! Keyword list edits.

use strum::{Display, EnumString};

/// Tag edited by [`MetadataClient::set_keywords`](super::MetadataClient::set_keywords).
const KEYWORDS_TAG: &str = "Keywords";

/// How a keyword edit combines with the keywords already on a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum KeywordOperation {
    /// The given keywords become the whole list.
    Replace,
    /// Each keyword is appended unless already present.
    Add,
    /// Each keyword is removed if present.
    Remove,
}

impl KeywordOperation {
    /// Tool arguments that apply this operation to `keywords`.
    ///
    /// The first `-Keywords=` assignment clears the list before assigning, so
    /// a replace is a run of plain assignments. An add removes each keyword
    /// before appending it, which keeps the list free of duplicates. Replacing
    /// with no keywords clears the list; adding or removing none yields no
    /// arguments.
    pub(super) fn arguments<S: AsRef<str>>(self, keywords: &[S]) -> Vec<String> {
        if keywords.is_empty() && self == Self::Replace {
            return vec![format!("-{KEYWORDS_TAG}=")];
        }
        keywords
            .iter()
            .map(AsRef::as_ref)
            .flat_map(|keyword| match self {
                Self::Replace => vec![format!("-{KEYWORDS_TAG}={keyword}")],
                Self::Add => vec![
                    format!("-{KEYWORDS_TAG}-={keyword}"),
                    format!("-{KEYWORDS_TAG}+={keyword}"),
                ],
                Self::Remove => vec![format!("-{KEYWORDS_TAG}-={keyword}")],
            })
            .collect()
    }
}
