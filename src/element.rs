//! Leaf elements and their measure.
//!
//! A sequence stores two kinds of leaves:
//!
//! - [`Element::Opaque`]: an arbitrary value that counts as one position.
//! - [`Element::Text`]: a [`TextRun`], a UTF-8 byte run that counts as one
//!   position per codepoint.
//!
//! A `TextRun` keeps its codepoint count in a 32-bit header word written once at
//! construction, so [`Element::measure`] never rescans the bytes.
//!
//! # Encoded layout
//!
//! ```text
//! +----------------------------+----------------------+
//! | header (4 bytes, BE)       | UTF-8 payload        |
//! | bit 31: LeafKind::Text     |                      |
//! | bits 0-30: codepoint count |                      |
//! +----------------------------+----------------------+
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::ReferenceCounter;
use crate::codec::{self, HEADER_SIZE, LeafKind, MAX_HEADER_LENGTH};
use crate::error::SequenceError;
use crate::utf8::{self, Char};

// =============================================================================
// TextRun
// =============================================================================

/// An immutable, non-empty run of UTF-8 bytes prefixed by its header word.
///
/// Every run holds at least one codepoint, so every leaf of a sequence
/// occupies at least one position. Cloning a `TextRun` shares the underlying buffer.
///
/// # Examples
///
/// ```rust
/// use strand::TextRun;
///
/// let run = TextRun::new("aあb").unwrap();
/// assert_eq!(run.code_points(), 3);
/// assert_eq!(run.byte_len(), 5);
/// assert_eq!(run.char_at(1).unwrap().to_char(), Some('あ'));
/// ```
#[derive(Clone)]
pub struct TextRun {
    encoded: ReferenceCounter<[u8]>,
}

impl TextRun {
    /// Encodes `text` as a header word followed by its bytes.
    ///
    /// # Errors
    ///
    /// - [`SequenceError::EmptyTextRun`] if `text` is empty.
    /// - [`SequenceError::MeasureOverflow`] if `text` has more than `2^31 - 1`
    ///   codepoints.
    pub fn new(text: &str) -> Result<Self, SequenceError> {
        if text.is_empty() {
            return Err(SequenceError::EmptyTextRun);
        }
        let code_points = text.chars().count();
        let length = u32::try_from(code_points)
            .ok()
            .filter(|length| *length <= MAX_HEADER_LENGTH)
            .ok_or(SequenceError::MeasureOverflow {
                measure: code_points,
            })?;

        let mut encoded = vec![0u8; HEADER_SIZE + text.len()];
        codec::word_write(codec::encode(LeafKind::Text, length), &mut encoded, 0);
        encoded[HEADER_SIZE..].copy_from_slice(text.as_bytes());
        Ok(Self {
            encoded: encoded.into(),
        })
    }

    /// Rebuilds a run from its encoded form (header word followed by payload).
    ///
    /// # Errors
    ///
    /// - [`SequenceError::InvalidHeader`] if the header is missing, tagged
    ///   [`LeafKind::Opaque`], or disagrees with the payload's codepoint count.
    /// - [`SequenceError::EmptyTextRun`] if the payload is empty.
    /// - [`SequenceError::MalformedEncoding`] or
    ///   [`SequenceError::TruncatedEncoding`] if a lead byte is missing or cut
    ///   short.
    /// - [`SequenceError::InvalidUtf8`] if the lead bytes line up but the
    ///   payload is still not UTF-8 (overlong forms, surrogates).
    pub fn from_encoded(encoded: &[u8]) -> Result<Self, SequenceError> {
        let header =
            codec::word_read(encoded, 0).ok_or(SequenceError::InvalidHeader { offset: 0 })?;
        if codec::decode_type(header) != LeafKind::Text {
            return Err(SequenceError::InvalidHeader { offset: 0 });
        }

        let counted = utf8::count_code_points(encoded, HEADER_SIZE)?;
        if counted == 0 {
            return Err(SequenceError::EmptyTextRun);
        }
        if let Err(error) = std::str::from_utf8(&encoded[HEADER_SIZE..]) {
            let offset = HEADER_SIZE + error.valid_up_to();
            tracing::error!(offset, "text run payload is not valid UTF-8");
            return Err(SequenceError::InvalidUtf8 { offset });
        }

        if counted != codec::decode_length(header) as usize {
            return Err(SequenceError::InvalidHeader { offset: 0 });
        }
        Ok(Self {
            encoded: encoded.into(),
        })
    }

    /// Returns the header word followed by the payload.
    #[inline]
    #[must_use]
    pub fn encoded(&self) -> &[u8] {
        &self.encoded
    }

    /// Returns the UTF-8 payload without the header.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.encoded[HEADER_SIZE..]
    }

    /// Returns the payload as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match std::str::from_utf8(self.as_bytes()) {
            Ok(text) => text,
            Err(_) => unreachable!("text run payloads are validated at construction"),
        }
    }

    /// Returns the codepoint count stored in the header.
    #[must_use]
    pub fn code_points(&self) -> usize {
        match codec::word_read(&self.encoded, 0) {
            Some(header) => codec::decode_length(header) as usize,
            None => unreachable!("text runs always carry a header"),
        }
    }

    /// Returns the payload length in bytes.
    #[inline]
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.encoded.len() - HEADER_SIZE
    }

    /// Returns the codepoint at `index` within this run.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::IndexOutOfBounds`] if `index >= code_points()`,
    /// or a decoding error if the payload has been corrupted.
    pub fn char_at(&self, index: usize) -> Result<Char, SequenceError> {
        let length = self.code_points();
        if index >= length {
            return Err(SequenceError::IndexOutOfBounds { index, length });
        }
        utf8::char_at(&self.encoded, HEADER_SIZE, index)
    }
}

impl PartialEq for TextRun {
    fn eq(&self, other: &Self) -> bool {
        self.encoded == other.encoded
    }
}

impl Eq for TextRun {}

impl Hash for TextRun {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

impl fmt::Debug for TextRun {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("TextRun")
            .field("text", &self.as_str())
            .field("code_points", &self.code_points())
            .finish()
    }
}

impl fmt::Display for TextRun {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TextRun {
    type Error = SequenceError;

    fn try_from(text: &str) -> Result<Self, Self::Error> {
        Self::new(text)
    }
}

// =============================================================================
// Element
// =============================================================================

/// A leaf stored in a [`Sequence`](crate::Sequence).
///
/// # Examples
///
/// ```rust
/// use strand::{Element, TextRun};
///
/// assert_eq!(Element::Opaque(7).measure(), 1);
///
/// let text: Element<i32> = Element::Text(TextRun::new("aあb").unwrap());
/// assert_eq!(text.measure(), 3);
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Element<V> {
    /// An arbitrary value.
    Opaque(V),
    /// A UTF-8 byte run.
    Text(TextRun),
}

impl<V> Element<V> {
    /// Returns the number of sequence positions this element occupies.
    ///
    /// 1 for an opaque value; the header's codepoint count for a text run.
    #[inline]
    #[must_use]
    pub fn measure(&self) -> usize {
        match self {
            Self::Opaque(_) => 1,
            Self::Text(run) => run.code_points(),
        }
    }

    /// Returns the tag this element carries.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> LeafKind {
        match self {
            Self::Opaque(_) => LeafKind::Opaque,
            Self::Text(_) => LeafKind::Text,
        }
    }

    /// Returns the opaque value, if this is one.
    #[inline]
    #[must_use]
    pub const fn as_value(&self) -> Option<&V> {
        match self {
            Self::Opaque(value) => Some(value),
            Self::Text(_) => None,
        }
    }

    /// Returns the text run, if this is one.
    #[inline]
    #[must_use]
    pub const fn as_text(&self) -> Option<&TextRun> {
        match self {
            Self::Opaque(_) => None,
            Self::Text(run) => Some(run),
        }
    }
}

impl<V> From<TextRun> for Element<V> {
    fn from(run: TextRun) -> Self {
        Self::Text(run)
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl serde::Serialize for TextRun {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for TextRun {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Self::new(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(feature = "serde")]
impl<V: serde::Serialize> serde::Serialize for Element<V> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Opaque(value) => serializer.serialize_newtype_variant("Element", 0, "Opaque", value),
            Self::Text(run) => serializer.serialize_newtype_variant("Element", 1, "Text", run),
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, V: serde::Deserialize<'de>> serde::Deserialize<'de> for Element<V> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        enum Tagged<V> {
            Opaque(V),
            Text(TextRun),
        }

        Ok(match Tagged::deserialize(deserializer)? {
            Tagged::Opaque(value) => Self::Opaque(value),
            Tagged::Text(run) => Self::Text(run),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_text_run_header_layout() {
        let run = TextRun::new("aあb").unwrap();
        assert_eq!(&run.encoded()[..4], &[0x80, 0x00, 0x00, 0x03]);
        assert_eq!(run.as_bytes(), "aあb".as_bytes());
        assert_eq!(run.code_points(), 3);
        assert_eq!(run.byte_len(), 5);
    }

    #[rstest]
    fn test_text_run_measure_counts_code_points_not_bytes() {
        let element: Element<()> = Element::Text(TextRun::new("aあb").unwrap());
        assert_eq!(element.measure(), 3);
        assert_eq!(element.kind(), LeafKind::Text);
    }

    #[rstest]
    fn test_opaque_measure_is_one() {
        let element = Element::Opaque("a long opaque value");
        assert_eq!(element.measure(), 1);
        assert_eq!(element.kind(), LeafKind::Opaque);
        assert_eq!(element.as_value(), Some(&"a long opaque value"));
        assert!(element.as_text().is_none());
    }

    #[rstest]
    fn test_empty_text_run_is_rejected() {
        assert_eq!(TextRun::new(""), Err(SequenceError::EmptyTextRun));
        assert_eq!(
            TextRun::from_encoded(&[0x80, 0x00, 0x00, 0x00]),
            Err(SequenceError::EmptyTextRun)
        );
    }

    #[rstest]
    fn test_text_run_char_at() {
        let run = TextRun::new("añ😀").unwrap();
        assert_eq!(run.char_at(0).unwrap().to_char(), Some('a'));
        assert_eq!(run.char_at(1).unwrap().to_char(), Some('ñ'));
        assert_eq!(run.char_at(2).unwrap().to_char(), Some('😀'));
        assert_eq!(
            run.char_at(3),
            Err(SequenceError::IndexOutOfBounds { index: 3, length: 3 })
        );
    }

    #[rstest]
    fn test_from_encoded_round_trip() {
        let run = TextRun::new("héllo").unwrap();
        let rebuilt = TextRun::from_encoded(run.encoded()).unwrap();
        assert_eq!(rebuilt, run);
    }

    #[rstest]
    fn test_from_encoded_rejects_opaque_tag() {
        let encoded = [0x00, 0x00, 0x00, 0x01, b'a'];
        assert_eq!(
            TextRun::from_encoded(&encoded),
            Err(SequenceError::InvalidHeader { offset: 0 })
        );
    }

    #[rstest]
    fn test_from_encoded_rejects_wrong_count() {
        let encoded = [0x80, 0x00, 0x00, 0x02, b'a'];
        assert_eq!(
            TextRun::from_encoded(&encoded),
            Err(SequenceError::InvalidHeader { offset: 0 })
        );
    }

    #[rstest]
    fn test_from_encoded_rejects_stray_continuation() {
        let encoded = [0x80, 0x00, 0x00, 0x02, b'a', 0x80];
        assert_eq!(
            TextRun::from_encoded(&encoded),
            Err(SequenceError::MalformedEncoding { offset: 5, byte: 0x80 })
        );
    }

    #[rstest]
    #[case::overlong_nul(vec![0x80, 0x00, 0x00, 0x01, 0xc0, 0x80])]
    #[case::surrogate(vec![0x80, 0x00, 0x00, 0x01, 0xed, 0xa0, 0x80])]
    #[case::bad_continuation(vec![0x80, 0x00, 0x00, 0x01, 0xe3, b'a', b'b'])]
    fn test_from_encoded_rejects_invalid_sequences(#[case] encoded: Vec<u8>) {
        assert_eq!(
            TextRun::from_encoded(&encoded),
            Err(SequenceError::InvalidUtf8 { offset: 4 })
        );
    }

    #[rstest]
    fn test_from_encoded_rejects_missing_header() {
        assert_eq!(
            TextRun::from_encoded(&[0x80, 0x00]),
            Err(SequenceError::InvalidHeader { offset: 0 })
        );
    }

    #[rstest]
    fn test_clone_shares_buffer() {
        let run = TextRun::new("shared").unwrap();
        let copy = run.clone();
        assert!(ReferenceCounter::ptr_eq(&run.encoded, &copy.encoded));
    }
}
