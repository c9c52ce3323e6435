//! Building blocks of the finger tree: children, grouping nodes and digits.
//!
//! Every level of the tree stores [`Child`]ren. At the top level they are
//! leaves; one level down they are [`Group`]s of top-level children; two levels
//! down, groups of groups, and so on. Using one closed child type for every
//! level keeps the tree non-generic in its depth.

use smallvec::SmallVec;

use crate::ReferenceCounter;
use crate::codec;
use crate::element::Element;

/// Inline capacity for a group's packed measures: three 5-byte varints.
const MEASURE_INLINE: usize = 15;

// =============================================================================
// Child
// =============================================================================

pub(crate) enum Child<V> {
    Leaf(ReferenceCounter<Element<V>>),
    Group(ReferenceCounter<Group<V>>),
}

impl<V> Clone for Child<V> {
    fn clone(&self) -> Self {
        match self {
            Self::Leaf(element) => Self::Leaf(element.clone()),
            Self::Group(group) => Self::Group(group.clone()),
        }
    }
}

impl<V> Child<V> {
    pub(crate) fn leaf(element: Element<V>) -> Self {
        Self::Leaf(ReferenceCounter::new(element))
    }

    pub(crate) fn measure(&self) -> usize {
        match self {
            Self::Leaf(element) => element.measure(),
            Self::Group(group) => group.measure(),
        }
    }

    /// Leftmost leaf beneath this child.
    pub(crate) fn first_leaf(&self) -> &Element<V> {
        let mut current = self;
        loop {
            match current {
                Self::Leaf(element) => return element,
                Self::Group(group) => current = &group.children[0],
            }
        }
    }

    /// Rightmost leaf beneath this child.
    pub(crate) fn last_leaf(&self) -> &Element<V> {
        let mut current = self;
        loop {
            match current {
                Self::Leaf(element) => return element,
                Self::Group(group) => current = &group.children[group.children.len() - 1],
            }
        }
    }

    /// Finds the leaf covering `index` and the offset of `index` inside it.
    ///
    /// Groups are skipped using their packed measures; only the group that
    /// contains `index` is entered.
    pub(crate) fn lookup(&self, mut index: usize) -> Option<(&Element<V>, usize)> {
        let mut current = self;
        loop {
            match current {
                Self::Leaf(element) => {
                    return (index < element.measure()).then_some((element.as_ref(), index));
                }
                Self::Group(group) => {
                    let (child, offset) = group
                        .children
                        .iter()
                        .zip(group.measures())
                        .scan(index, |remaining, (child, measure)| {
                            let position = *remaining;
                            *remaining = remaining.saturating_sub(measure);
                            Some((child, position, measure))
                        })
                        .find(|(_, position, measure)| position < measure)
                        .map(|(child, position, _)| (child, position))?;
                    current = child;
                    index = offset;
                }
            }
        }
    }
}

// =============================================================================
// Group
// =============================================================================

/// A grouping node: 2 or 3 children from the level above, followed by their
/// measures packed as consecutive varints.
pub(crate) struct Group<V> {
    pub(crate) children: SmallVec<[Child<V>; 3]>,
    measures: SmallVec<[u8; MEASURE_INLINE]>,
}

impl<V> Group<V> {
    fn from_children(children: SmallVec<[Child<V>; 3]>) -> Self {
        debug_assert!((2..=3).contains(&children.len()));
        let mut measures = SmallVec::new();
        for child in &children {
            let measure = child.measure() as u64;
            let start = measures.len();
            measures.resize(start + codec::var_long_length(measure), 0);
            codec::var_long_write(measure, &mut measures, start);
        }
        Self { children, measures }
    }

    pub(crate) fn pair(first: Child<V>, second: Child<V>) -> Child<V> {
        let mut children = SmallVec::new();
        children.push(first);
        children.push(second);
        Child::Group(ReferenceCounter::new(Self::from_children(children)))
    }

    pub(crate) fn triple(first: Child<V>, second: Child<V>, third: Child<V>) -> Child<V> {
        let mut children = SmallVec::new();
        children.push(first);
        children.push(second);
        children.push(third);
        Child::Group(ReferenceCounter::new(Self::from_children(children)))
    }

    /// Decodes the packed per-child measures.
    pub(crate) fn measures(&self) -> GroupMeasures<'_> {
        GroupMeasures {
            bytes: &self.measures,
            offset: 0,
        }
    }

    /// Sum of the children's measures, read from the packed buffer.
    pub(crate) fn measure(&self) -> usize {
        self.measures().sum()
    }

    #[cfg(test)]
    pub(crate) fn packed_measures(&self) -> &[u8] {
        &self.measures
    }
}

pub(crate) struct GroupMeasures<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl Iterator for GroupMeasures<'_> {
    type Item = usize;

    #[allow(clippy::cast_possible_truncation)]
    fn next(&mut self) -> Option<Self::Item> {
        let (value, width) = codec::var_long_read(self.bytes, self.offset)?;
        self.offset += width;
        Some(value as usize)
    }
}

/// Packs a run of at least two children into 2- and 3-child groups, in order.
pub(crate) fn group_children<V>(children: Vec<Child<V>>) -> Vec<Child<V>> {
    debug_assert!(children.len() >= 2);
    let mut grouped = Vec::with_capacity(children.len() / 2);
    let mut remaining = children.len();
    let mut iterator = children.into_iter();
    while remaining > 0 {
        let take = match remaining {
            2 | 4 => 2,
            _ => 3,
        };
        let mut next = || match iterator.next() {
            Some(child) => child,
            None => unreachable!("group sizes always sum to the child count"),
        };
        grouped.push(if take == 2 {
            Group::pair(next(), next())
        } else {
            Group::triple(next(), next(), next())
        });
        remaining -= take;
    }
    grouped
}

// =============================================================================
// Digit
// =============================================================================

/// The directly stored prefix or suffix of a deep node: one or two children.
pub(crate) enum Digit<V> {
    One(Child<V>),
    Two(Child<V>, Child<V>),
}

impl<V> Clone for Digit<V> {
    fn clone(&self) -> Self {
        match self {
            Self::One(first) => Self::One(first.clone()),
            Self::Two(first, second) => Self::Two(first.clone(), second.clone()),
        }
    }
}

impl<V> Digit<V> {
    pub(crate) const fn head(&self) -> &Child<V> {
        match self {
            Self::One(first) | Self::Two(first, _) => first,
        }
    }

    pub(crate) const fn last(&self) -> &Child<V> {
        match self {
            Self::One(first) => first,
            Self::Two(_, second) => second,
        }
    }

    pub(crate) fn measure(&self) -> usize {
        match self {
            Self::One(first) => first.measure(),
            Self::Two(first, second) => first.measure() + second.measure(),
        }
    }

    pub(crate) fn children(&self) -> impl DoubleEndedIterator<Item = &Child<V>> {
        let (first, second) = match self {
            Self::One(first) => (first, None),
            Self::Two(first, second) => (first, Some(second)),
        };
        std::iter::once(first).chain(second)
    }

    pub(crate) fn lookup(&self, mut index: usize) -> Option<(&Element<V>, usize)> {
        for child in self.children() {
            let measure = child.measure();
            if index < measure {
                return child.lookup(index);
            }
            index -= measure;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::TextRun;
    use rstest::rstest;

    fn opaque(value: i32) -> Child<i32> {
        Child::leaf(Element::Opaque(value))
    }

    fn text(value: &str) -> Child<i32> {
        Child::leaf(Element::Text(TextRun::new(value).unwrap()))
    }

    #[rstest]
    fn test_pair_packs_child_measures_as_varints() {
        let group = Group::pair(opaque(1), text("aあb"));
        let Child::Group(group) = group else {
            panic!("expected group")
        };
        assert_eq!(group.packed_measures(), &[0x01, 0x03]);
        assert_eq!(group.measures().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(group.measure(), 4);
    }

    #[rstest]
    fn test_large_measure_uses_multibyte_varint() {
        let long = "x".repeat(200);
        let Child::Group(group) = Group::pair(text(&long), opaque(0)) else {
            panic!("expected group")
        };
        assert_eq!(group.packed_measures(), &[0xc8, 0x01, 0x01]);
        assert_eq!(group.measure(), 201);
    }

    #[rstest]
    fn test_nested_group_measure_is_sum_of_children() {
        let inner = Group::pair(opaque(1), opaque(2));
        let outer = Group::triple(inner, opaque(3), text("hé"));
        assert_eq!(outer.measure(), 5);
    }

    #[rstest]
    fn test_child_lookup_descends_into_text() {
        let group = Group::triple(opaque(1), text("aあb"), opaque(2));
        let (element, offset) = group.lookup(2).unwrap();
        assert!(matches!(element, Element::Text(_)));
        assert_eq!(offset, 1);
        let (element, offset) = group.lookup(4).unwrap();
        assert_eq!(element.as_value(), Some(&2));
        assert_eq!(offset, 0);
        assert!(group.lookup(5).is_none());
    }

    #[rstest]
    fn test_first_and_last_leaf() {
        let group = Group::pair(Group::pair(opaque(1), opaque(2)), opaque(3));
        assert_eq!(group.first_leaf().as_value(), Some(&1));
        assert_eq!(group.last_leaf().as_value(), Some(&3));
    }

    #[rstest]
    #[case(2, vec![2])]
    #[case(3, vec![3])]
    #[case(4, vec![2, 2])]
    #[case(5, vec![3, 2])]
    #[case(6, vec![3, 3])]
    #[case(7, vec![3, 2, 2])]
    fn test_group_children_arity(#[case] count: i32, #[case] expected: Vec<usize>) {
        let children = (0..count).map(opaque).collect();
        let arities: Vec<usize> = group_children(children)
            .iter()
            .map(|child| match child {
                Child::Group(group) => group.children.len(),
                Child::Leaf(_) => 0,
            })
            .collect();
        assert_eq!(arities, expected);
    }

    #[rstest]
    fn test_digit_lookup_and_measure() {
        let digit = Digit::Two(text("ab"), opaque(9));
        assert_eq!(digit.measure(), 3);
        assert_eq!(digit.lookup(1).map(|(_, offset)| offset), Some(1));
        assert_eq!(digit.lookup(2).and_then(|(element, _)| element.as_value()), Some(&9));
        assert!(digit.lookup(3).is_none());
        assert_eq!(digit.head().measure(), 2);
        assert_eq!(digit.last().measure(), 1);
    }
}
