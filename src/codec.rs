//! Byte-level codecs shared by the sequence and text layers.
//!
//! Everything here reads from or writes into caller-provided byte buffers at an
//! explicit offset. Nothing allocates.
//!
//! - Variable-length integers: LEB128, 7 payload bits per byte, continuation
//!   bit `0x80`. `var_int_*` covers the `u32` domain (1-5 bytes), `var_long_*`
//!   covers 63-bit values (1-9 bytes). Both produce identical bytes for values
//!   below `2^32`.
//! - Fixed-width big-endian words: 16 and 32 bits.
//! - Leaf headers: a 1-bit [`LeafKind`] tag in bit 31 of a 32-bit word, with the
//!   length in bits 0-30.
//!
//! # Examples
//!
//! ```rust
//! use strand::codec::{self, LeafKind};
//!
//! let mut buffer = [0u8; 5];
//! let written = codec::var_int_write(300, &mut buffer, 0);
//! assert_eq!(written, codec::var_int_length(300));
//! assert_eq!(codec::var_int_read(&buffer, 0), Some((300, 2)));
//!
//! let header = codec::encode(LeafKind::Text, 42);
//! assert_eq!(codec::decode_type(header), LeafKind::Text);
//! assert_eq!(codec::decode_length(header), 42);
//! ```

/// Largest length that fits in the 31 low bits of a leaf header.
pub const MAX_HEADER_LENGTH: u32 = 0x7fff_ffff;

/// Size in bytes of a leaf header word.
pub const HEADER_SIZE: usize = 4;

const CONTINUATION_BIT: u8 = 0x80;
const PAYLOAD_MASK: u8 = 0x7f;
const TYPE_BIT: u32 = 0x8000_0000;
/// Payload bits the fifth byte of a `u32` varint may carry (bits 28-31).
const U32_LAST_PAYLOAD: u8 = 0x0f;

// =============================================================================
// Variable-length integers
// =============================================================================

/// Returns the number of bytes [`var_int_write`] uses for `value` (1-5).
#[must_use]
pub const fn var_int_length(value: u32) -> usize {
    let mut width = 1;
    while width < 5 {
        if (u32::MAX << (7 * width)) & value == 0 {
            return width;
        }
        width += 1;
    }
    5
}

/// Writes `value` at `offset` and returns the number of bytes written.
///
/// # Panics
///
/// Panics if `destination` has fewer than `var_int_length(value)` bytes left
/// after `offset`.
pub fn var_int_write(value: u32, destination: &mut [u8], offset: usize) -> usize {
    var_long_write(u64::from(value), destination, offset)
}

/// Reads a varint at `offset`, returning the value and the bytes consumed.
///
/// Returns `None` if the buffer ends before the terminating byte, if the
/// encoding runs past five bytes, or if the fifth byte carries bits above
/// bit 31.
#[must_use]
pub fn var_int_read(source: &[u8], offset: usize) -> Option<(u32, usize)> {
    let mut result: u32 = 0;
    for (index, shift) in (0..=28).step_by(7).enumerate() {
        let piece = *source.get(offset + index)?;
        if shift == 28 && piece & !U32_LAST_PAYLOAD != 0 {
            return None;
        }
        result |= u32::from(piece & PAYLOAD_MASK) << shift;
        if piece & CONTINUATION_BIT == 0 {
            return Some((result, index + 1));
        }
    }
    None
}

/// Returns the number of bytes [`var_long_write`] uses for `value`.
#[must_use]
pub const fn var_long_length(mut value: u64) -> usize {
    let mut width = 1;
    while value & !(PAYLOAD_MASK as u64) != 0 {
        width += 1;
        value >>= 7;
    }
    width
}

/// Writes a 63-bit `value` at `offset` and returns the number of bytes written.
///
/// Values at or above `2^63` take ten bytes, which [`var_long_read`] rejects.
///
/// # Panics
///
/// Panics if `destination` is too short.
#[allow(clippy::cast_possible_truncation)]
pub fn var_long_write(mut value: u64, destination: &mut [u8], offset: usize) -> usize {
    let mut cursor = offset;
    while value & !u64::from(PAYLOAD_MASK) != 0 {
        destination[cursor] = (value as u8 & PAYLOAD_MASK) | CONTINUATION_BIT;
        value >>= 7;
        cursor += 1;
    }
    destination[cursor] = value as u8;
    cursor + 1 - offset
}

/// Reads a 63-bit varint at `offset`, returning the value and the bytes consumed.
///
/// Returns `None` if the buffer ends before the terminating byte or if the
/// encoding runs past nine bytes.
#[must_use]
pub fn var_long_read(source: &[u8], offset: usize) -> Option<(u64, usize)> {
    let mut result: u64 = 0;
    for (index, shift) in (0..=56).step_by(7).enumerate() {
        let piece = *source.get(offset + index)?;
        result |= u64::from(piece & PAYLOAD_MASK) << shift;
        if piece & CONTINUATION_BIT == 0 {
            return Some((result, index + 1));
        }
    }
    None
}

// =============================================================================
// Fixed-width words
// =============================================================================

/// Reads a big-endian 32-bit word at `offset`.
#[must_use]
pub fn word_read(source: &[u8], offset: usize) -> Option<u32> {
    let bytes = source.get(offset..offset + 4)?;
    Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Writes `value` as a big-endian 32-bit word at `offset`.
///
/// # Panics
///
/// Panics if fewer than four bytes remain after `offset`.
pub fn word_write(value: u32, destination: &mut [u8], offset: usize) {
    destination[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
}

/// Reads a big-endian 16-bit word at `offset`.
#[must_use]
pub fn int16_read(source: &[u8], offset: usize) -> Option<u16> {
    let bytes = source.get(offset..offset + 2)?;
    Some(u16::from_be_bytes([bytes[0], bytes[1]]))
}

/// Writes `value` as a big-endian 16-bit word at `offset`.
///
/// # Panics
///
/// Panics if fewer than two bytes remain after `offset`.
pub fn int16_write(value: u16, destination: &mut [u8], offset: usize) {
    destination[offset..offset + 2].copy_from_slice(&value.to_be_bytes());
}

// =============================================================================
// Leaf headers
// =============================================================================

/// The 1-bit tag stored in bit 31 of a leaf header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeafKind {
    /// An arbitrary value with measure 1.
    Opaque = 0,
    /// A UTF-8 byte run whose measure is its codepoint count.
    Text = 1,
}

/// Packs `kind` and `length` into a header word.
///
/// Only the low 31 bits of `length` are kept.
#[must_use]
pub const fn encode(kind: LeafKind, length: u32) -> u32 {
    ((kind as u32) << 31) | (length & MAX_HEADER_LENGTH)
}

/// Extracts the tag from a header word.
#[must_use]
pub const fn decode_type(encoded: u32) -> LeafKind {
    if encoded & TYPE_BIT == 0 {
        LeafKind::Opaque
    } else {
        LeafKind::Text
    }
}

/// Extracts the 31-bit length from a header word.
#[must_use]
pub const fn decode_length(encoded: u32) -> u32 {
    encoded & MAX_HEADER_LENGTH
}
