//! Error types for sequence and text operations.
//!
//! All failures are synchronous and local. The data structure is pure, so
//! retrying an operation that failed always fails the same way.

use thiserror::Error;

/// Represents errors raised by [`Sequence`](crate::Sequence), [`Text`](crate::Text)
/// and the UTF-8 decoder.
///
/// # Examples
///
/// ```rust
/// use strand::{Sequence, SequenceError};
///
/// let empty: Sequence<i32> = Sequence::new();
/// assert_eq!(
///     empty.first(),
///     Err(SequenceError::EmptyAccess { operation: "first" })
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    /// `first`, `last`, `remove_first` or `remove_last` on an empty sequence.
    #[error("{operation} called on an empty sequence")]
    EmptyAccess {
        /// Name of the operation that was attempted.
        operation: &'static str,
    },

    /// `lookup` (or `char_at`) with an index at or past the length.
    #[error("index {index} out of bounds for length {length}")]
    IndexOutOfBounds {
        /// The requested index.
        index: usize,
        /// The measure of the sequence or run that was indexed.
        length: usize,
    },

    /// A continuation byte was found where a lead byte was expected.
    ///
    /// Text is validated when it enters the system, so this signals corrupted
    /// bytes rather than bad user input.
    #[error("malformed UTF-8: byte {byte:#04x} at offset {offset} cannot start a codepoint")]
    MalformedEncoding {
        /// Byte offset of the offending byte.
        offset: usize,
        /// The offending byte.
        byte: u8,
    },

    /// A lead byte promised more bytes than the buffer holds.
    #[error("truncated UTF-8: codepoint at offset {offset} needs {width} bytes")]
    TruncatedEncoding {
        /// Byte offset of the lead byte.
        offset: usize,
        /// Width announced by the lead byte.
        width: usize,
    },

    /// Every lead byte announced a valid width, but the bytes still do not
    /// form UTF-8 (an overlong form, a surrogate, or a bad continuation).
    #[error("invalid UTF-8 sequence at offset {offset}")]
    InvalidUtf8 {
        /// Byte offset where the invalid sequence starts.
        offset: usize,
    },

    /// A text run with no codepoints. Runs occupy at least one position.
    #[error("text runs must hold at least one codepoint")]
    EmptyTextRun,

    /// An encoded leaf header is missing, carries the wrong tag, or disagrees
    /// with its payload.
    #[error("invalid leaf header at offset {offset}")]
    InvalidHeader {
        /// Byte offset of the header word.
        offset: usize,
    },

    /// A measure does not fit in the 31-bit header length field.
    #[error("measure {measure} exceeds the 31-bit header limit")]
    MeasureOverflow {
        /// The measure that could not be encoded.
        measure: usize,
    },
}
