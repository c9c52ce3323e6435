//! # strand
//!
//! A persistent sequence that serves both as an immutable collection of values
//! and as the representation of immutable UTF-8 text.
//!
//! ## Overview
//!
//! - **Sequence**: [`Sequence`], a two-slot finger tree with O(1) access at
//!   both ends, O(1) length and O(log n) positional lookup. Every operation
//!   returns a new sequence and shares the untouched structure.
//! - **Elements**: [`Element`] leaves are either opaque values (one position
//!   each) or [`TextRun`]s (one position per codepoint).
//! - **Text**: [`Text`], immutable UTF-8 text stored as a sequence of bounded
//!   text runs.
//! - **Codecs**: [`codec`] for varints, big-endian words and leaf headers;
//!   [`utf8`] for codepoint access into raw byte buffers.
//!
//! ## Feature Flags
//!
//! - `arc`: Use `Arc` instead of `Rc` for shared nodes, making sequences
//!   `Send + Sync` (enabled by default)
//! - `serde`: Serialization support
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use strand::prelude::*;
//!
//! let sequence = Sequence::new().push_value("c").push_value("b").push_value("a");
//! assert_eq!(sequence.len(), 3);
//! assert_eq!(sequence.first().unwrap().as_value(), Some(&"a"));
//! assert_eq!(sequence.last().unwrap().as_value(), Some(&"c"));
//!
//! let text = Text::from("aあb");
//! assert_eq!(text.len(), 3);
//! assert_eq!(text.char_at(1).unwrap().as_bytes(), "あ".as_bytes());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use strand::prelude::*;
/// ```
pub mod prelude {
    pub use crate::element::{Element, TextRun};
    pub use crate::error::SequenceError;
    pub use crate::sequence::{Item, Sequence};
    pub use crate::text::Text;
    pub use crate::utf8::Char;
}

pub mod codec;
pub mod element;
pub mod error;
pub mod sequence;
pub mod text;
pub mod utf8;

pub use element::{Element, TextRun};
pub use error::SequenceError;
pub use sequence::{Item, Sequence};
pub use text::Text;
pub use utf8::Char;

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// When the `arc` feature is enabled, this is `std::sync::Arc`, which lets
/// sequences cross threads.
///
/// When the `arc` feature is disabled, this is `std::rc::Rc`, which is faster
/// but not thread-safe.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;
