use std::fmt;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

/// Bytes kept verbatim in a key component. Everything else is percent-encoded,
/// spaces become `+`.
const KEY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'_').remove(b'.').remove(b'-').remove(b'~');

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CursorError {
    #[error("empty pagination cursor")]
    Empty,
    #[error("malformed pagination cursor: {0}")]
    Malformed(String),
}

/// An opaque pagination cursor, handed to clients as `endCursor` and `edge.cursor`.
///
/// Table cursors carry the primary key tuple of the last row of a page: every key
/// value is URL-encoded and the encoded values are joined with commas, in primary
/// key column order. Views have no key to resume from, so their cursors carry the
/// row offset of the next page instead.
#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GraphqlCursor(String);

impl GraphqlCursor {
    pub fn from_key<I, S>(components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let encoded = components
            .into_iter()
            .map(|component| encode_component(component.as_ref()))
            .collect::<Vec<_>>();

        Self(encoded.join(","))
    }

    pub fn from_offset(offset: u64) -> Self {
        Self(offset.to_string())
    }

    /// The decoded key values, in primary key column order.
    pub fn key(&self) -> Result<Vec<String>, CursorError> {
        if self.0.is_empty() {
            return Err(CursorError::Empty);
        }

        self.0.split(',').map(decode_component).collect()
    }

    pub fn offset(&self) -> Result<u64, CursorError> {
        if self.0.is_empty() {
            return Err(CursorError::Empty);
        }

        self.0
            .parse()
            .map_err(|_| CursorError::Malformed(self.0.clone()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for GraphqlCursor {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for GraphqlCursor {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for GraphqlCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, KEY_COMPONENT)
        .to_string()
        .replace("%20", "+")
}

fn decode_component(value: &str) -> Result<String, CursorError> {
    let value = value.replace('+', " ");

    percent_decode_str(&value)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| CursorError::Malformed(value.clone()))
}
