//! Immutable UTF-8 text backed by a [`Sequence`] of [`TextRun`]s.
//!
//! Text is split into runs of at most [`RUN_CAPACITY`] bytes, always at a
//! codepoint boundary. Each run records its codepoint count in its header, so
//! the sequence's measure is the text's length in codepoints, and
//! [`Text::char_at`] finds a codepoint in O(log n) by descending the tree and
//! then scanning at most one bounded run.
//!
//! # Examples
//!
//! ```rust
//! use strand::Text;
//!
//! let greeting = Text::from("hello, ");
//! let full = greeting.push_str("世界");
//!
//! assert_eq!(full.len(), 9);
//! assert_eq!(full.char_at(7).unwrap().to_char(), Some('世'));
//! assert_eq!(full.to_string(), "hello, 世界");
//!
//! // Structural sharing: the original text is preserved
//! assert_eq!(greeting.to_string(), "hello, ");
//! ```

use std::convert::Infallible;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::element::{Element, TextRun};
use crate::error::SequenceError;
use crate::sequence::{Item, Sequence};
use crate::utf8::Char;

/// Maximum payload size of a single run, in bytes.
pub const RUN_CAPACITY: usize = 64;

/// Immutable UTF-8 text.
///
/// # Time Complexity
///
/// | Operation  | Complexity |
/// |------------|------------|
/// | `len`      | O(1)       |
/// | `char_at`  | O(log n)   |
/// | `push_str` | O(m) for m appended bytes |
/// | `append`   | O(log n)   |
#[derive(Clone, Default)]
pub struct Text {
    runs: Sequence<Infallible>,
}

/// Splits `text` into runs of at most `RUN_CAPACITY` bytes.
fn split_runs(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let mut end = rest.len().min(RUN_CAPACITY);
        while !rest.is_char_boundary(end) {
            end -= 1;
        }
        let (run, tail) = rest.split_at(end);
        rest = tail;
        Some(run)
    })
}

fn encode_runs(text: &str) -> impl Iterator<Item = TextRun> {
    split_runs(text).map(|run| match TextRun::new(run) {
        Ok(run) => run,
        Err(_) => unreachable!("runs of at most {RUN_CAPACITY} bytes fit in a header"),
    })
}

impl Text {
    /// Creates empty text.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            runs: Sequence::new(),
        }
    }

    /// Returns the length in codepoints.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    /// Returns `true` if the text holds no codepoints.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the length in bytes.
    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.runs().map(TextRun::byte_len).sum()
    }

    /// Returns the codepoint at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::IndexOutOfBounds`] if `index >= len()`.
    pub fn char_at(&self, index: usize) -> Result<Char, SequenceError> {
        match self.runs.lookup(index)? {
            Item::Char(character) => Ok(character),
            Item::Value(never) => match *never {},
        }
    }

    /// Returns new text with `suffix` appended.
    #[must_use]
    pub fn push_str(&self, suffix: &str) -> Self {
        Self {
            runs: encode_runs(suffix).fold(self.runs.clone(), |runs, run| runs.inject_text(run)),
        }
    }

    /// Returns new text with `character` appended.
    #[must_use]
    pub fn push_char(&self, character: char) -> Self {
        self.push_str(character.encode_utf8(&mut [0u8; 4]))
    }

    /// Returns new text with `other` appended, sharing both operands' runs.
    #[must_use]
    pub fn append(&self, other: &Self) -> Self {
        Self {
            runs: self.runs.append(&other.runs),
        }
    }

    /// Creates an iterator over the codepoints.
    pub fn chars(&self) -> impl Iterator<Item = Char> + '_ {
        self.runs.items().map(|item| match item {
            Item::Char(character) => character,
            Item::Value(never) => match *never {},
        })
    }

    /// Creates an iterator over the underlying runs.
    pub fn runs(&self) -> impl Iterator<Item = &TextRun> + '_ {
        self.runs.iter().filter_map(Element::as_text)
    }

    /// Returns the backing sequence.
    #[must_use]
    pub const fn as_sequence(&self) -> &Sequence<Infallible> {
        &self.runs
    }
}

impl From<&str> for Text {
    fn from(text: &str) -> Self {
        let runs: Sequence<Infallible> = encode_runs(text).map(Element::Text).collect();
        tracing::debug!(
            bytes = text.len(),
            depth = runs.depth(),
            "encoded text into runs"
        );
        Self { runs }
    }
}

impl From<String> for Text {
    fn from(text: String) -> Self {
        Self::from(text.as_str())
    }
}

impl FromStr for Text {
    type Err = Infallible;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(text))
    }
}

impl fmt::Display for Text {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.runs()
            .try_for_each(|run| formatter.write_str(run.as_str()))
    }
}

impl fmt::Debug for Text {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "Text({:?})", self.to_string())
    }
}

impl PartialEq for Text {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .runs()
                .flat_map(|run| run.as_bytes().iter())
                .eq(other.runs().flat_map(|run| run.as_bytes().iter()))
    }
}

impl Eq for Text {}

impl Hash for Text {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for run in self.runs() {
            state.write(run.as_bytes());
        }
        state.write_u8(0xff);
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Text {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Text {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::from)
    }
}
