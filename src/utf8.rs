//! Codepoint-level access into raw UTF-8 byte buffers.
//!
//! The functions here classify lead bytes by their high nibble:
//!
//! | High nibble | Width |
//! |-------------|-------|
//! | `0x0`-`0x7` | 1     |
//! | `0x8`-`0xB` | continuation byte, never a lead |
//! | `0xC`-`0xD` | 2     |
//! | `0xE`       | 3     |
//! | `0xF`       | 4     |
//!
//! Buffers handed to this module are expected to hold valid UTF-8 already. A
//! continuation byte in lead position means the bytes were corrupted after
//! validation, and is reported as [`SequenceError::MalformedEncoding`].
//!
//! # Examples
//!
//! ```rust
//! use strand::utf8::char_at;
//!
//! let bytes = "aあb".as_bytes();
//! let character = char_at(bytes, 0, 1).unwrap();
//! assert_eq!(character.as_bytes(), "あ".as_bytes());
//! assert_eq!(character.len_utf8(), 3);
//! ```

use std::fmt;

use arrayvec::ArrayVec;

use crate::error::SequenceError;

/// Returns the width announced by `lead`, or `None` for a continuation byte.
#[inline]
const fn lead_width(lead: u8) -> Option<usize> {
    match lead >> 4 {
        0x0..=0x7 => Some(1),
        0x8..=0xB => None,
        0xC | 0xD => Some(2),
        0xE => Some(3),
        _ => Some(4),
    }
}

/// Width of the codepoint starting at `offset`, checked against the buffer.
fn width_at(bytes: &[u8], offset: usize) -> Result<usize, SequenceError> {
    let Some(&lead) = bytes.get(offset) else {
        tracing::error!(offset, length = bytes.len(), "codepoint offset past end of buffer");
        return Err(SequenceError::TruncatedEncoding { offset, width: 1 });
    };
    let Some(width) = lead_width(lead) else {
        tracing::error!(offset, byte = lead, "continuation byte in lead position");
        return Err(SequenceError::MalformedEncoding { offset, byte: lead });
    };
    if offset + width > bytes.len() {
        tracing::error!(offset, width, "codepoint runs past end of buffer");
        return Err(SequenceError::TruncatedEncoding { offset, width });
    }
    Ok(width)
}

// =============================================================================
// Char
// =============================================================================

/// The raw bytes of a single codepoint, 1-4 bytes long.
///
/// `Char` copies only the bytes of its own codepoint out of the buffer it was
/// read from.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Char {
    bytes: ArrayVec<u8, 4>,
}

impl Char {
    fn from_slice(slice: &[u8]) -> Self {
        let mut bytes = ArrayVec::new();
        bytes.extend(slice.iter().copied());
        Self { bytes }
    }

    /// Returns the raw UTF-8 bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the number of bytes in the encoding (1-4).
    #[inline]
    #[must_use]
    pub fn len_utf8(&self) -> usize {
        self.bytes.len()
    }

    /// Decodes the scalar value.
    #[must_use]
    pub fn code_point(&self) -> u32 {
        decode_scalar(&self.bytes)
    }

    /// Converts to a `char`, or `None` if the bytes do not form a scalar value.
    #[must_use]
    pub fn to_char(&self) -> Option<char> {
        std::str::from_utf8(&self.bytes)
            .ok()
            .and_then(|text| text.chars().next())
    }
}

impl From<char> for Char {
    fn from(character: char) -> Self {
        let mut buffer = [0u8; 4];
        Self::from_slice(character.encode_utf8(&mut buffer).as_bytes())
    }
}

impl fmt::Display for Char {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.to_char().unwrap_or(char::REPLACEMENT_CHARACTER))
    }
}

impl fmt::Debug for Char {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_char() {
            Some(character) => write!(formatter, "Char({character:?})"),
            None => write!(formatter, "Char({:02x?})", self.bytes.as_slice()),
        }
    }
}

fn decode_scalar(bytes: &[u8]) -> u32 {
    let continuation = |index: usize| u32::from(bytes[index] & 0x3f);
    match bytes.len() {
        1 => u32::from(bytes[0]),
        2 => (u32::from(bytes[0] & 0x1f) << 6) | continuation(1),
        3 => (u32::from(bytes[0] & 0x0f) << 12) | (continuation(1) << 6) | continuation(2),
        _ => {
            (u32::from(bytes[0] & 0x07) << 18)
                | (continuation(1) << 12)
                | (continuation(2) << 6)
                | continuation(3)
        }
    }
}

// =============================================================================
// Decoding
// =============================================================================

/// Returns the codepoint `index` positions after the one starting at `offset`.
///
/// Walks forward one codepoint at a time, so the cost is proportional to
/// `index`.
///
/// # Errors
///
/// - [`SequenceError::MalformedEncoding`] if a continuation byte is found in
///   lead position.
/// - [`SequenceError::TruncatedEncoding`] if the buffer ends before the
///   requested codepoint is complete.
///
/// # Examples
///
/// ```rust
/// use strand::utf8::char_at;
///
/// let bytes = "héllo".as_bytes();
/// assert_eq!(char_at(bytes, 0, 1).unwrap().to_char(), Some('é'));
/// assert_eq!(char_at(bytes, 3, 0).unwrap().to_char(), Some('l'));
/// ```
pub fn char_at(bytes: &[u8], offset: usize, index: usize) -> Result<Char, SequenceError> {
    let mut cursor = offset;
    for _ in 0..index {
        cursor += width_at(bytes, cursor)?;
    }
    let width = width_at(bytes, cursor)?;
    Ok(Char::from_slice(&bytes[cursor..cursor + width]))
}

/// Decodes the scalar value of the codepoint starting at `offset`.
///
/// # Errors
///
/// Same as [`char_at`].
pub fn code_point_at(bytes: &[u8], offset: usize) -> Result<u32, SequenceError> {
    let width = width_at(bytes, offset)?;
    Ok(decode_scalar(&bytes[offset..offset + width]))
}

/// Returns the UTF-8 width of `code_point`, or `None` above `0x10FFFF`.
#[must_use]
pub const fn code_point_len(code_point: u32) -> Option<usize> {
    match code_point {
        0..0x80 => Some(1),
        0x80..0x800 => Some(2),
        0x800..0x1_0000 => Some(3),
        0x1_0000..=0x10_ffff => Some(4),
        _ => None,
    }
}

/// Counts the codepoints from `offset` to the end of `bytes` by lead-byte
/// classification.
///
/// # Errors
///
/// Same as [`char_at`].
pub fn count_code_points(bytes: &[u8], offset: usize) -> Result<usize, SequenceError> {
    let mut cursor = offset;
    let mut count = 0;
    while cursor < bytes.len() {
        cursor += width_at(bytes, cursor)?;
        count += 1;
    }
    Ok(count)
}
