//! Row representations handed between the host engine and connectors

use std::borrow::Cow;
use std::fmt;

use crate::error::Result;

/// Internal row holding a single string field
///
/// The field is a view over bytes owned by whoever produced the row (for a
/// scan, the decoder's scratch buffer). Bytes are the engine's canonical
/// UTF-8 string encoding but are not validated on construction, so a row may
/// carry arbitrary bytes read from a file.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextRow<'a> {
    text: &'a [u8],
}

impl<'a> TextRow<'a> {
    /// Create a row over the given bytes
    pub fn new(text: &'a [u8]) -> Self {
        Self { text }
    }

    /// Create a row over a string
    pub fn from_text(text: &'a str) -> Self {
        Self { text: text.as_bytes() }
    }

    /// Raw bytes of the text field
    pub fn bytes(&self) -> &'a [u8] {
        self.text
    }

    /// Text field as a validated string slice
    pub fn as_str(&self) -> Result<&'a str> {
        Ok(std::str::from_utf8(self.text)?)
    }

    /// Text field with invalid sequences replaced
    pub fn to_str_lossy(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.text)
    }

    /// Length of the text field in bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether the text field is empty
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl fmt::Debug for TextRow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextRow").field("text", &self.to_str_lossy()).finish()
    }
}

/// A single boxed value of a generic row
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing value
    Null,
    /// Boolean value
    Boolean(bool),
    /// Integer value
    Int64(i64),
    /// Floating point value
    Float64(f64),
    /// String value
    String(String),
    /// Binary value
    Binary(Vec<u8>),
}

/// Externally-visible row of boxed values
///
/// This is the representation user code sees. Connectors write internal rows;
/// a generic row reaching a connector's write path is a caller error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenericRow {
    values: Vec<Value>,
}

impl GenericRow {
    /// Create a row from values
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Values in column order
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Number of values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the row has no values
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_row_views_bytes() {
        let row = TextRow::from_text("hello");
        assert_eq!(row.bytes(), b"hello");
        assert_eq!(row.as_str().unwrap(), "hello");
        assert_eq!(row.len(), 5);
    }

    #[test]
    fn test_invalid_utf8_is_kept_raw() {
        let bytes = [b'a', 0xff, b'b'];
        let row = TextRow::new(&bytes);

        assert_eq!(row.bytes(), &bytes);
        assert!(matches!(row.as_str(), Err(Error::Utf8(_))));
        assert_eq!(row.to_str_lossy(), "a\u{FFFD}b");
    }

    #[test]
    fn test_empty_row() {
        let row = TextRow::new(&[]);
        assert!(row.is_empty());
        assert_eq!(row.as_str().unwrap(), "");
    }
}
