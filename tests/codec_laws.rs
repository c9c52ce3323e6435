//! Property-based tests for the byte codecs.
//!
//! - **Varint Round Trip**: `var_int_read` after `var_int_write` returns the
//!   written value and consumes exactly `var_int_length` bytes
//! - **Codepoint Round Trip**: every scalar value, encoded to UTF-8 and read
//!   back by index with `char_at`, reproduces the original bytes

use proptest::prelude::*;
use rstest::rstest;
use strand::codec::{
    self, LeafKind, MAX_HEADER_LENGTH, var_int_length, var_int_read, var_int_write,
    var_long_length, var_long_read, var_long_write,
};
use strand::utf8::{self, Char};

// =============================================================================
// Varints
// =============================================================================

proptest! {
    #[test]
    fn prop_var_int_round_trip(value in any::<u32>(), offset in 0usize..8) {
        let mut buffer = [0u8; 16];
        let written = var_int_write(value, &mut buffer, offset);
        prop_assert_eq!(written, var_int_length(value));
        prop_assert_eq!(var_int_read(&buffer, offset), Some((value, written)));
    }

    #[test]
    fn prop_var_long_round_trip(value in 0..=(u64::MAX >> 1)) {
        let mut buffer = [0u8; 10];
        let written = var_long_write(value, &mut buffer, 0);
        prop_assert_eq!(written, var_long_length(value));
        prop_assert_eq!(var_long_read(&buffer, 0), Some((value, written)));
    }

    #[test]
    fn prop_var_long_agrees_with_var_int(value in any::<u32>()) {
        let mut narrow = [0u8; 5];
        let mut wide = [0u8; 10];
        let narrow_length = var_int_write(value, &mut narrow, 0);
        let wide_length = var_long_write(u64::from(value), &mut wide, 0);
        prop_assert_eq!(&narrow[..narrow_length], &wide[..wide_length]);
    }

    #[test]
    fn prop_var_int_read_of_truncated_buffer_fails(value in 0x80u32..) {
        let mut buffer = [0u8; 5];
        let written = var_int_write(value, &mut buffer, 0);
        prop_assert_eq!(var_int_read(&buffer[..written - 1], 0), None);
    }
}

#[rstest]
#[case(0, 1)]
#[case(0x7f, 1)]
#[case(0x80, 2)]
#[case(0x3fff, 2)]
#[case(0x4000, 3)]
#[case(u32::MAX, 5)]
fn test_var_int_length_boundaries(#[case] value: u32, #[case] expected: usize) {
    assert_eq!(var_int_length(value), expected);
}

// =============================================================================
// Leaf headers
// =============================================================================

proptest! {
    #[test]
    fn prop_header_round_trip(length in 0..=MAX_HEADER_LENGTH, text in any::<bool>()) {
        let kind = if text { LeafKind::Text } else { LeafKind::Opaque };
        let encoded = codec::encode(kind, length);
        prop_assert_eq!(codec::decode_type(encoded), kind);
        prop_assert_eq!(codec::decode_length(encoded), length);

        let mut buffer = [0u8; 4];
        codec::word_write(encoded, &mut buffer, 0);
        prop_assert_eq!(codec::word_read(&buffer, 0), Some(encoded));
    }
}

// =============================================================================
// UTF-8
// =============================================================================

/// Every scalar value: `0..=0x10FFFF` minus the surrogate range.
fn scalar_values() -> impl Iterator<Item = char> {
    (0..=0x10_ffff).filter_map(char::from_u32)
}

#[rstest]
fn test_every_code_point_round_trips_through_char_at() {
    let mut buffer = String::with_capacity(8);
    let mut checked = 0u32;
    for character in scalar_values() {
        buffer.clear();
        buffer.push('a');
        buffer.push(character);
        buffer.push('é');

        let decoded = utf8::char_at(buffer.as_bytes(), 0, 1).unwrap();
        let mut expected = [0u8; 4];
        assert_eq!(
            decoded.as_bytes(),
            character.encode_utf8(&mut expected).as_bytes(),
            "U+{:04X}",
            u32::from(character)
        );
        assert_eq!(decoded.code_point(), u32::from(character));
        assert_eq!(
            utf8::char_at(buffer.as_bytes(), 0, 2).unwrap(),
            Char::from('é')
        );
        checked += 1;
    }
    assert_eq!(checked, 0x11_0000 - 0x800);
}

#[rstest]
fn test_code_point_len_matches_char_len_utf8() {
    for character in scalar_values() {
        assert_eq!(
            utf8::code_point_len(u32::from(character)),
            Some(character.len_utf8())
        );
    }
    assert_eq!(utf8::code_point_len(0x11_0000), None);
}

proptest! {
    #[test]
    fn prop_count_code_points_matches_chars(text in "\\PC{0,64}") {
        prop_assert_eq!(
            utf8::count_code_points(text.as_bytes(), 0),
            Ok(text.chars().count())
        );
    }

    #[test]
    fn prop_code_point_at_every_boundary(text in "\\PC{1,32}") {
        for (offset, character) in text.char_indices() {
            prop_assert_eq!(
                utf8::code_point_at(text.as_bytes(), offset),
                Ok(u32::from(character))
            );
        }
    }
}
