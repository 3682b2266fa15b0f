//! Dynamically typed tag values.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Value of a single tag as reported by the tool.
///
/// The tool decides the shape: a keyword list with one entry is reported as
/// a scalar and only becomes a [`TagValue::List`] once it holds several.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    /// Numeric value.
    Number(Number),
    /// Text value.
    Text(String),
    /// Ordered sequence of values.
    List(Vec<TagValue>),
    /// Any other JSON value, kept verbatim.
    Other(Value),
}

impl TagValue {
    /// Text content, for [`TagValue::Text`] only.
    #[must_use]
    pub const fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Numeric content, for [`TagValue::Number`] only.
    #[must_use]
    pub const fn as_number(&self) -> Option<&Number> {
        match self {
            Self::Number(number) => Some(number),
            _ => None,
        }
    }

    /// Elements of a [`TagValue::List`].
    #[must_use]
    pub const fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Flattens scalars and lists into their textual items.
    ///
    /// Useful for list-like tags such as keywords, whose shape depends on how
    /// many entries they hold.
    #[must_use]
    pub fn to_text_items(&self) -> Vec<String> {
        match self {
            Self::Text(text) => vec![text.clone()],
            Self::Number(number) => vec![number.to_string()],
            Self::List(items) => items.iter().flat_map(Self::to_text_items).collect(),
            Self::Other(value) => vec![value.to_string()],
        }
    }
}

impl From<Value> for TagValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(number) => Self::Number(number),
            Value::String(text) => Self::Text(text),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            other => Self::Other(other),
        }
    }
}

impl From<&str> for TagValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for TagValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl PartialEq<str> for TagValue {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl PartialEq<&str> for TagValue {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}
