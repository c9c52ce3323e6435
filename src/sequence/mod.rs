//! Persistent (immutable) sequence built on a two-slot finger tree.
//!
//! # Overview
//!
//! [`Sequence`] is the general-purpose immutable collection. Its leaves are
//! [`Element`]s: opaque values that occupy one position each, or [`TextRun`]s
//! that occupy one position per codepoint. The same structure therefore backs
//! both lists of values and immutable UTF-8 text (see [`Text`](crate::Text)).
//!
//! - O(1) amortized `push`/`inject` and `remove_first`/`remove_last` for
//!   one-ended use; O(log n) worst case when alternating at a digit boundary
//! - O(1) `first`, `last`, `len` and `is_empty`
//! - O(log n) `lookup` by position
//! - O(log n) `append`
//!
//! All operations return new sequences without modifying the original, and
//! structural sharing ensures memory efficiency.
//!
//! # Finger Tree Structure
//!
//! A sequence is one of:
//! - Empty: no elements
//! - Single: one child
//! - Deep: a prefix and a suffix of one or two children each, around a middle
//!   sequence whose children are grouping nodes of the level above
//!
//! A grouping node holds two or three children and their measures, packed as
//! varints in a small byte buffer. Positional lookup compares the index against
//! those packed measures and skips whole subtrees without visiting them.
//!
//! # Examples
//!
//! ```rust
//! use strand::Sequence;
//!
//! let sequence = Sequence::new()
//!     .inject_value(1)
//!     .inject_value(2)
//!     .inject_value(3);
//!
//! assert_eq!(sequence.len(), 3);
//! assert_eq!(sequence.first().unwrap().as_value(), Some(&1));
//! assert_eq!(sequence.last().unwrap().as_value(), Some(&3));
//!
//! // Structural sharing: the original sequence is preserved
//! let extended = sequence.push_value(0);
//! assert_eq!(sequence.len(), 3);
//! assert_eq!(extended.len(), 4);
//! ```
//!
//! # References
//!
//! - Hinze & Paterson, "Finger Trees: A Simple General-purpose Data Structure" (2006)
//! - Kaplan & Tarjan, "Purely Functional, Real-Time Deques with Catenation" (1999)

mod iter;
mod node;
mod tree;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;

use crate::element::{Element, TextRun};
use crate::error::SequenceError;
use crate::utf8::Char;

pub use iter::{Items, Iter};

use node::Child;
use tree::Tree;

/// A single position of a sequence, as returned by [`Sequence::lookup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item<'a, V> {
    /// The value of an opaque leaf.
    Value(&'a V),
    /// One codepoint of a text run.
    Char(Char),
}

/// A persistent (immutable) sequence of [`Element`]s.
///
/// # Time Complexity
///
/// | Operation      | Complexity |
/// |----------------|------------|
/// | `new`          | O(1)       |
/// | `singleton`    | O(1)       |
/// | `push`         | O(log n) worst, O(1) amortized one-ended |
/// | `inject`       | O(log n) worst, O(1) amortized one-ended |
/// | `first`        | O(1)       |
/// | `last`         | O(1)       |
/// | `remove_first` | O(log n) worst, O(1) amortized one-ended |
/// | `remove_last`  | O(log n) worst, O(1) amortized one-ended |
/// | `lookup`       | O(log n)   |
/// | `len`          | O(1)       |
/// | `is_empty`     | O(1)       |
/// | `append`       | O(log n)   |
///
/// Digits hold one or two children, so alternating `push` and `remove_first`
/// at a full digit can carry into every level of the spine each time. The O(1)
/// amortized bound holds for sequences used from one end at a time.
///
/// `len` is the sum of the elements' measures: the number of opaque values plus
/// the number of codepoints in all text runs.
///
/// # Examples
///
/// ```rust
/// use strand::{Item, Sequence, TextRun};
///
/// let sequence: Sequence<i32> = Sequence::new()
///     .inject_value(7)
///     .inject_text(TextRun::new("aあb").unwrap());
///
/// assert_eq!(sequence.len(), 4);
/// assert_eq!(sequence.lookup(0), Ok(Item::Value(&7)));
/// assert_eq!(
///     sequence.lookup(2).unwrap(),
///     Item::Char('あ'.into())
/// );
/// ```
pub struct Sequence<V> {
    tree: Tree<V>,
}

impl<V> Clone for Sequence<V> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
        }
    }
}

impl<V> Sequence<V> {
    /// Creates a new empty sequence.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { tree: Tree::Empty }
    }

    /// Creates a sequence containing a single element.
    #[inline]
    #[must_use]
    pub fn singleton(element: Element<V>) -> Self {
        Self {
            tree: Tree::Single(Child::leaf(element)),
        }
    }

    /// Creates a sequence of opaque values, in iteration order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use strand::Sequence;
    ///
    /// let sequence = Sequence::from_values(["c", "b", "a"]);
    /// assert_eq!(sequence.first().unwrap().as_value(), Some(&"c"));
    /// ```
    #[must_use]
    pub fn from_values<I: IntoIterator<Item = V>>(values: I) -> Self {
        values.into_iter().map(Element::Opaque).collect()
    }

    /// Returns `true` if the sequence contains no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns the total measure of the sequence.
    ///
    /// Every leaf measures at least one, so `len() == 0` exactly when
    /// [`is_empty`](Self::is_empty) holds.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.measure()
    }

    /// Returns a new sequence with `element` prepended.
    #[must_use]
    pub fn push(&self, element: Element<V>) -> Self {
        Self {
            tree: self.tree.push(Child::leaf(element)),
        }
    }

    /// Returns a new sequence with `element` appended.
    #[must_use]
    pub fn inject(&self, element: Element<V>) -> Self {
        Self {
            tree: self.tree.inject(Child::leaf(element)),
        }
    }

    /// Prepends an opaque value.
    #[must_use]
    pub fn push_value(&self, value: V) -> Self {
        self.push(Element::Opaque(value))
    }

    /// Appends an opaque value.
    #[must_use]
    pub fn inject_value(&self, value: V) -> Self {
        self.inject(Element::Opaque(value))
    }

    /// Prepends a text run.
    #[must_use]
    pub fn push_text(&self, run: TextRun) -> Self {
        self.push(Element::Text(run))
    }

    /// Appends a text run.
    #[must_use]
    pub fn inject_text(&self, run: TextRun) -> Self {
        self.inject(Element::Text(run))
    }

    /// Returns the leading element.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::EmptyAccess`] if the sequence is empty.
    pub fn first(&self) -> Result<&Element<V>, SequenceError> {
        self.tree
            .first()
            .map(Child::first_leaf)
            .ok_or(SequenceError::EmptyAccess { operation: "first" })
    }

    /// Returns the trailing element.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::EmptyAccess`] if the sequence is empty.
    pub fn last(&self) -> Result<&Element<V>, SequenceError> {
        self.tree
            .last()
            .map(Child::last_leaf)
            .ok_or(SequenceError::EmptyAccess { operation: "last" })
    }

    /// Returns a new sequence without the leading element.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::EmptyAccess`] if the sequence is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use strand::Sequence;
    ///
    /// let sequence = Sequence::new().push_value("c").push_value("b").push_value("a");
    /// let rest = sequence.remove_first().unwrap();
    /// assert_eq!(rest, Sequence::from_values(["b", "c"]));
    /// ```
    pub fn remove_first(&self) -> Result<Self, SequenceError> {
        self.tree
            .remove_first()
            .map(|tree| Self { tree })
            .ok_or(SequenceError::EmptyAccess {
                operation: "remove_first",
            })
    }

    /// Returns a new sequence without the trailing element.
    ///
    /// # Errors
    ///
    /// Returns [`SequenceError::EmptyAccess`] if the sequence is empty.
    pub fn remove_last(&self) -> Result<Self, SequenceError> {
        self.tree
            .remove_last()
            .map(|tree| Self { tree })
            .ok_or(SequenceError::EmptyAccess {
                operation: "remove_last",
            })
    }

    /// Returns the item at position `index`.
    ///
    /// Positions count opaque values once and text runs once per codepoint, so
    /// a position inside a text run yields that run's codepoint.
    ///
    /// # Errors
    ///
    /// - [`SequenceError::IndexOutOfBounds`] if `index >= len()`.
    /// - A decoding error if a text run's bytes have been corrupted.
    pub fn lookup(&self, index: usize) -> Result<Item<'_, V>, SequenceError> {
        let length = self.len();
        let out_of_bounds = SequenceError::IndexOutOfBounds { index, length };
        if index >= length {
            return Err(out_of_bounds);
        }
        match self.tree.lookup(index).ok_or(out_of_bounds)? {
            (Element::Opaque(value), _) => Ok(Item::Value(value)),
            (Element::Text(run), offset) => run.char_at(offset).map(Item::Char),
        }
    }

    /// Returns a new sequence holding the elements of `self` followed by those
    /// of `other`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use strand::Sequence;
    ///
    /// let left = Sequence::from_values(0..10);
    /// let right = Sequence::from_values(10..20);
    /// assert_eq!(left.append(&right), Sequence::from_values(0..20));
    /// ```
    #[must_use]
    pub fn append(&self, other: &Self) -> Self {
        Self {
            tree: self.tree.concat(&other.tree),
        }
    }

    /// Creates an iterator over the leaf elements.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(&self.tree)
    }

    /// Creates an iterator over every position, expanding text runs into
    /// codepoints.
    #[must_use]
    pub fn items(&self) -> Items<'_, V> {
        Items::new(&self.tree)
    }

    /// Number of levels in the tree's spine.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.tree.depth()
    }

    #[cfg(test)]
    pub(crate) fn assert_well_formed(&self) {
        tree::invariants::assert_well_formed(&self.tree);
    }
}

impl<V> Default for Sequence<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: PartialEq> PartialEq for Sequence<V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<V: Eq> Eq for Sequence<V> {}

impl<V: fmt::Debug> fmt::Debug for Sequence<V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.iter()).finish()
    }
}

impl<V: Hash> Hash for Sequence<V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for element in self {
            element.hash(state);
        }
    }
}

impl<V> FromIterator<Element<V>> for Sequence<V> {
    fn from_iter<I: IntoIterator<Item = Element<V>>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |sequence, element| sequence.inject(element))
    }
}

impl<'a, V> IntoIterator for &'a Sequence<V> {
    type Item = &'a Element<V>;
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<V: serde::Serialize> serde::Serialize for Sequence<V> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(None)?;
        for element in self {
            seq.serialize_element(element)?;
        }
        seq.end()
    }
}

#[cfg(feature = "serde")]
struct SequenceVisitor<V> {
    marker: std::marker::PhantomData<V>,
}

#[cfg(feature = "serde")]
impl<V> SequenceVisitor<V> {
    const fn new() -> Self {
        Self {
            marker: std::marker::PhantomData,
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, V> serde::de::Visitor<'de> for SequenceVisitor<V>
where
    V: serde::Deserialize<'de>,
{
    type Value = Sequence<V>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a sequence of elements")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::SeqAccess<'de>,
    {
        let mut sequence = Sequence::new();
        while let Some(element) = seq.next_element()? {
            sequence = sequence.inject(element);
        }
        Ok(sequence)
    }
}

#[cfg(feature = "serde")]
impl<'de, V> serde::Deserialize<'de> for Sequence<V>
where
    V: serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_seq(SequenceVisitor::new())
    }
}

// =============================================================================
// Thread Safety
// =============================================================================

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(Sequence<i32>: Send, Sync);
#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(Sequence<String>: Send, Sync);
#[cfg(not(feature = "arc"))]
static_assertions::assert_not_impl_any!(Sequence<i32>: Send, Sync);

// =============================================================================
// Tests
// =============================================================================
