//! The finger-tree algebra behind [`Sequence`](super::Sequence).
//!
//! A tree is `Empty`, a `Single` child, or `Deep`: a one- or two-slot prefix, a
//! middle tree whose children are [`Group`]s, and a one- or two-slot suffix.
//! Growing past a two-slot digit packs the two existing slots into a group and
//! pushes it into the middle; shrinking past a one-slot digit unpacks a group
//! from the middle, or collapses onto the opposite digit when the middle is
//! empty.
//!
//! Every operation builds new nodes and shares the untouched ones. Nothing is
//! mutated after construction; each `Deep` node computes its measure eagerly.

use crate::ReferenceCounter;
use crate::element::Element;

use super::node::{Child, Digit, Group, group_children};

pub(crate) enum Tree<V> {
    Empty,
    Single(Child<V>),
    Deep(ReferenceCounter<Deep<V>>),
}

pub(crate) struct Deep<V> {
    pub(crate) prefix: Digit<V>,
    pub(crate) middle: Tree<V>,
    pub(crate) suffix: Digit<V>,
    measure: usize,
}

impl<V> Clone for Tree<V> {
    fn clone(&self) -> Self {
        match self {
            Self::Empty => Self::Empty,
            Self::Single(child) => Self::Single(child.clone()),
            Self::Deep(deep) => Self::Deep(deep.clone()),
        }
    }
}

impl<V> Tree<V> {
    fn deep(prefix: Digit<V>, middle: Self, suffix: Digit<V>) -> Self {
        let measure = prefix.measure() + middle.measure() + suffix.measure();
        Self::Deep(ReferenceCounter::new(Deep {
            prefix,
            middle,
            suffix,
            measure,
        }))
    }

    fn from_digit(digit: &Digit<V>) -> Self {
        match digit {
            Digit::One(only) => Self::Single(only.clone()),
            Digit::Two(first, second) => Self::deep(
                Digit::One(first.clone()),
                Self::Empty,
                Digit::One(second.clone()),
            ),
        }
    }

    pub(crate) const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub(crate) fn measure(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Single(child) => child.measure(),
            Self::Deep(deep) => deep.measure,
        }
    }

    pub(crate) fn first(&self) -> Option<&Child<V>> {
        match self {
            Self::Empty => None,
            Self::Single(child) => Some(child),
            Self::Deep(deep) => Some(deep.prefix.head()),
        }
    }

    pub(crate) fn last(&self) -> Option<&Child<V>> {
        match self {
            Self::Empty => None,
            Self::Single(child) => Some(child),
            Self::Deep(deep) => Some(deep.suffix.last()),
        }
    }

    pub(crate) fn push(&self, child: Child<V>) -> Self {
        match self {
            Self::Empty => Self::Single(child),
            Self::Single(existing) => {
                Self::deep(Digit::One(child), Self::Empty, Digit::One(existing.clone()))
            }
            Self::Deep(deep) => match &deep.prefix {
                Digit::One(first) => Self::deep(
                    Digit::Two(child, first.clone()),
                    deep.middle.clone(),
                    deep.suffix.clone(),
                ),
                Digit::Two(first, second) => {
                    tracing::trace!(measure = deep.measure, "prefix full, packing pair into middle");
                    let group = Group::pair(first.clone(), second.clone());
                    Self::deep(
                        Digit::One(child),
                        deep.middle.push(group),
                        deep.suffix.clone(),
                    )
                }
            },
        }
    }

    pub(crate) fn inject(&self, child: Child<V>) -> Self {
        match self {
            Self::Empty => Self::Single(child),
            Self::Single(existing) => {
                Self::deep(Digit::One(existing.clone()), Self::Empty, Digit::One(child))
            }
            Self::Deep(deep) => match &deep.suffix {
                Digit::One(last) => Self::deep(
                    deep.prefix.clone(),
                    deep.middle.clone(),
                    Digit::Two(last.clone(), child),
                ),
                Digit::Two(first, second) => {
                    tracing::trace!(measure = deep.measure, "suffix full, packing pair into middle");
                    let group = Group::pair(first.clone(), second.clone());
                    Self::deep(
                        deep.prefix.clone(),
                        deep.middle.inject(group),
                        Digit::One(child),
                    )
                }
            },
        }
    }

    pub(crate) fn remove_first(&self) -> Option<Self> {
        match self {
            Self::Empty => None,
            Self::Single(_) => Some(Self::Empty),
            Self::Deep(deep) => Some(match &deep.prefix {
                Digit::Two(_, second) => Self::deep(
                    Digit::One(second.clone()),
                    deep.middle.clone(),
                    deep.suffix.clone(),
                ),
                Digit::One(_) => Self::borrow_front(&deep.middle, &deep.suffix),
            }),
        }
    }

    pub(crate) fn remove_last(&self) -> Option<Self> {
        match self {
            Self::Empty => None,
            Self::Single(_) => Some(Self::Empty),
            Self::Deep(deep) => Some(match &deep.suffix {
                Digit::Two(first, _) => Self::deep(
                    deep.prefix.clone(),
                    deep.middle.clone(),
                    Digit::One(first.clone()),
                ),
                Digit::One(_) => Self::borrow_back(&deep.prefix, &deep.middle),
            }),
        }
    }

    /// Refills an exhausted prefix from the first group of `middle`.
    fn borrow_front(middle: &Self, suffix: &Digit<V>) -> Self {
        let (Some(head), Some(rest)) = (middle.first(), middle.remove_first()) else {
            return Self::from_digit(suffix);
        };
        let Child::Group(group) = head else {
            unreachable!("middle levels only hold groups")
        };
        match group.children.as_slice() {
            [first, second] => Self::deep(
                Digit::Two(first.clone(), second.clone()),
                rest,
                suffix.clone(),
            ),
            [first, second, third] => Self::deep(
                Digit::One(first.clone()),
                rest.push(Group::pair(second.clone(), third.clone())),
                suffix.clone(),
            ),
            _ => unreachable!("groups hold two or three children"),
        }
    }

    /// Refills an exhausted suffix from the last group of `middle`.
    fn borrow_back(prefix: &Digit<V>, middle: &Self) -> Self {
        let (Some(tail), Some(rest)) = (middle.last(), middle.remove_last()) else {
            return Self::from_digit(prefix);
        };
        let Child::Group(group) = tail else {
            unreachable!("middle levels only hold groups")
        };
        match group.children.as_slice() {
            [first, second] => Self::deep(
                prefix.clone(),
                rest,
                Digit::Two(first.clone(), second.clone()),
            ),
            [first, second, third] => Self::deep(
                prefix.clone(),
                rest.inject(Group::pair(first.clone(), second.clone())),
                Digit::One(third.clone()),
            ),
            _ => unreachable!("groups hold two or three children"),
        }
    }

    /// Finds the leaf covering `index` and the offset of `index` inside it.
    ///
    /// Each level compares `index` against the prefix, middle and suffix
    /// measures and descends into exactly one of them.
    pub(crate) fn lookup(&self, index: usize) -> Option<(&Element<V>, usize)> {
        match self {
            Self::Empty => None,
            Self::Single(child) => child.lookup(index),
            Self::Deep(deep) => {
                let prefix = deep.prefix.measure();
                if index < prefix {
                    return deep.prefix.lookup(index);
                }
                let index = index - prefix;
                let middle = deep.middle.measure();
                if index < middle {
                    return deep.middle.lookup(index);
                }
                deep.suffix.lookup(index - middle)
            }
        }
    }

    pub(crate) fn concat(&self, other: &Self) -> Self {
        Self::concat_with(self, Vec::new(), other)
    }

    /// Joins `left`, the loose children in `middle`, and `right`.
    ///
    /// When both sides are deep, the inner digits and loose children are packed
    /// into 2- and 3-child groups and the middles are joined one level down.
    fn concat_with(left: &Self, middle: Vec<Child<V>>, right: &Self) -> Self {
        match (left, right) {
            (Self::Empty, _) => middle
                .into_iter()
                .rev()
                .fold(right.clone(), |tree, child| tree.push(child)),
            (_, Self::Empty) => middle
                .into_iter()
                .fold(left.clone(), |tree, child| tree.inject(child)),
            (Self::Single(child), _) => {
                Self::concat_with(&Self::Empty, middle, right).push(child.clone())
            }
            (_, Self::Single(child)) => {
                Self::concat_with(left, middle, &Self::Empty).inject(child.clone())
            }
            (Self::Deep(left), Self::Deep(right)) => {
                let seam: Vec<Child<V>> = left
                    .suffix
                    .children()
                    .cloned()
                    .chain(middle)
                    .chain(right.prefix.children().cloned())
                    .collect();
                tracing::trace!(seam = seam.len(), "grouping concatenation seam");
                Self::deep(
                    left.prefix.clone(),
                    Self::concat_with(&left.middle, group_children(seam), &right.middle),
                    right.suffix.clone(),
                )
            }
        }
    }

    /// Number of `Deep` levels along the spine.
    pub(crate) fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self;
        while let Self::Deep(deep) = current {
            depth += 1;
            current = &deep.middle;
        }
        depth
    }
}
