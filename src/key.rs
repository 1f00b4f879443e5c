//! Flat field keys.
//!
//! Nested values are addressed by a single field name built from the path to
//! the value:
//!
//! ```text
//! key     = segment ( "." segment | "[" index "]" )*
//! segment = the name of a mapping entry
//! index   = zero-based decimal position in a sequence
//! ```
//!
//! For example `assets[0].isCovered` addresses the `isCovered` entry of the
//! first element of the `assets` sequence.

use crate::error::DecodeError;
use std::fmt;

/// A flat key under construction.
///
/// Keys are built by appending path segments to a root segment. The encoder
/// reuses a single buffer for a whole traversal by recording the length before
/// descending and truncating back to it afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlatKey {
    buf: String,
}

impl FlatKey {
    /// Create a key whose first segment is the given mapping key.
    pub fn new(root: &str) -> Self {
        Self {
            buf: root.to_owned(),
        }
    }

    /// Append a mapping entry segment (`.name`).
    pub fn field(mut self, name: &str) -> Self {
        self.push_field(name);
        self
    }

    /// Append a sequence position segment (`[index]`).
    pub fn index(mut self, index: usize) -> Self {
        self.push_index(index);
        self
    }

    /// Get the key as a string.
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// Convert into the underlying string.
    pub fn into_string(self) -> String {
        self.buf
    }

    pub(crate) fn push_field(&mut self, name: &str) {
        self.buf.push('.');
        self.buf.push_str(name);
    }

    pub(crate) fn push_index(&mut self, index: usize) {
        self.buf.push('[');
        self.buf.push_str(&index.to_string());
        self.buf.push(']');
    }

    pub(crate) fn len(&self) -> usize {
        self.buf.len()
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.buf.truncate(len);
    }
}

impl fmt::Display for FlatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.buf)
    }
}

impl AsRef<str> for FlatKey {
    fn as_ref(&self) -> &str {
        &self.buf
    }
}

impl From<FlatKey> for String {
    fn from(key: FlatKey) -> Self {
        key.buf
    }
}

/// One step of a parsed flat key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Segment<'a> {
    /// A mapping entry name.
    Field(&'a str),
    /// A sequence position.
    Index(usize),
}

/// Parse a flat key into its segments.
///
/// The first segment is always a [`Segment::Field`]. Segment names may be
/// empty, since the encoder writes empty mapping keys verbatim.
///
/// ```
/// use flatform::key::{parse, Segment};
///
/// assert_eq!(
///     parse("assets[0].asset").unwrap(),
///     [Segment::Field("assets"), Segment::Index(0), Segment::Field("asset")],
/// );
/// ```
pub fn parse(key: &str) -> Result<Vec<Segment<'_>>, DecodeError> {
    let bytes = key.as_bytes();
    let mut segments = Vec::new();

    let end = name_end(key, 0)?;
    segments.push(Segment::Field(&key[..end]));
    let mut pos = end;

    while pos < bytes.len() {
        match bytes[pos] {
            b'.' => {
                let end = name_end(key, pos + 1)?;
                segments.push(Segment::Field(&key[pos + 1..end]));
                pos = end;
            }
            b'[' => {
                let close = key[pos + 1..]
                    .find(']')
                    .map(|offset| pos + 1 + offset)
                    .ok_or_else(|| DecodeError::invalid_key(key, "unterminated index"))?;
                segments.push(Segment::Index(parse_index(key, &key[pos + 1..close])?));
                pos = close + 1;
            }
            _ => return Err(DecodeError::invalid_key(key, "expected `.` or `[` after index")),
        }
    }

    Ok(segments)
}

/// Find where the segment name starting at `start` ends.
fn name_end(key: &str, start: usize) -> Result<usize, DecodeError> {
    match key[start..].find(&['.', '[', ']'][..]) {
        Some(offset) if key.as_bytes()[start + offset] == b']' => {
            Err(DecodeError::invalid_key(key, "unmatched `]`"))
        }
        Some(offset) => Ok(start + offset),
        None => Ok(key.len()),
    }
}

fn parse_index(key: &str, digits: &str) -> Result<usize, DecodeError> {
    if digits.is_empty() {
        return Err(DecodeError::invalid_key(key, "empty index"));
    }

    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DecodeError::invalid_key(key, "index is not a number"));
    }

    digits
        .parse()
        .map_err(|_| DecodeError::invalid_key(key, "index is too large"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn build_nested_key() {
        let key = FlatKey::new("assets").index(0).field("isCovered");

        assert_eq!(key.as_str(), "assets[0].isCovered");
        assert_eq!(key.to_string(), "assets[0].isCovered");
    }

    #[test]
    fn truncate_restores_parent() {
        let mut key = FlatKey::new("tags");
        let mark = key.len();

        key.push_index(12);
        assert_eq!(key.as_str(), "tags[12]");

        key.truncate(mark);
        assert_eq!(key.as_str(), "tags");
    }

    #[test]
    fn parse_plain_key() {
        assert_eq!(parse("name").unwrap(), [Segment::Field("name")]);
    }

    #[test]
    fn parse_mixed_key() {
        assert_eq!(
            parse("a.b[2][0].c").unwrap(),
            [
                Segment::Field("a"),
                Segment::Field("b"),
                Segment::Index(2),
                Segment::Index(0),
                Segment::Field("c"),
            ]
        );
    }

    #[test]
    fn parse_empty_segments() {
        assert_eq!(parse("").unwrap(), [Segment::Field("")]);
        assert_eq!(parse("a.").unwrap(), [Segment::Field("a"), Segment::Field("")]);
        assert_eq!(parse("[0]").unwrap(), [Segment::Field(""), Segment::Index(0)]);
    }

    #[test_case("a[" ; "unterminated")]
    #[test_case("a[]" ; "empty index")]
    #[test_case("a[x]" ; "letters")]
    #[test_case("a[-1]" ; "negative")]
    #[test_case("a[+1]" ; "plus sign")]
    #[test_case("a]" ; "stray bracket")]
    #[test_case("a.b]" ; "stray bracket after field")]
    #[test_case("a[0]b" ; "text after index")]
    #[test_case("a[99999999999999999999999]" ; "overflow")]
    fn parse_rejects(key: &str) {
        let error = parse(key).unwrap_err();

        assert!(matches!(error, DecodeError::InvalidKey { .. }), "{:?}", error);
        assert_eq!(error.key(), key);
    }
}
