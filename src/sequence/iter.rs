//! Iterators over a [`Sequence`](super::Sequence).

use smallvec::SmallVec;

use crate::element::{Element, TextRun};
use crate::utf8;

use super::Item;
use super::node::Child;
use super::tree::Tree;

enum Pending<'a, V> {
    Tree(&'a Tree<V>),
    Child(&'a Child<V>),
}

/// Iterator over the leaf elements of a sequence, front to back.
///
/// Created by [`Sequence::iter`](super::Sequence::iter).
pub struct Iter<'a, V> {
    stack: SmallVec<[Pending<'a, V>; 16]>,
}

impl<'a, V> Iter<'a, V> {
    pub(crate) fn new(tree: &'a Tree<V>) -> Self {
        let mut stack = SmallVec::new();
        stack.push(Pending::Tree(tree));
        Self { stack }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a Element<V>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(pending) = self.stack.pop() {
            match pending {
                Pending::Tree(Tree::Empty) => {}
                Pending::Tree(Tree::Single(child)) => self.stack.push(Pending::Child(child)),
                Pending::Tree(Tree::Deep(deep)) => {
                    self.stack
                        .extend(deep.suffix.children().rev().map(Pending::Child));
                    self.stack.push(Pending::Tree(&deep.middle));
                    self.stack
                        .extend(deep.prefix.children().rev().map(Pending::Child));
                }
                Pending::Child(Child::Leaf(element)) => return Some(element.as_ref()),
                Pending::Child(Child::Group(group)) => {
                    self.stack
                        .extend(group.children.iter().rev().map(Pending::Child));
                }
            }
        }
        None
    }
}

/// Iterator over the positions of a sequence: one [`Item`] per unit of
/// measure.
///
/// Opaque leaves yield [`Item::Value`]; text runs yield one [`Item::Char`] per
/// codepoint, decoded sequentially rather than by repeated indexing.
///
/// Created by [`Sequence::items`](super::Sequence::items).
pub struct Items<'a, V> {
    leaves: Iter<'a, V>,
    run: Option<(&'a TextRun, usize)>,
}

impl<'a, V> Items<'a, V> {
    pub(crate) fn new(tree: &'a Tree<V>) -> Self {
        Self {
            leaves: Iter::new(tree),
            run: None,
        }
    }
}

impl<'a, V> Iterator for Items<'a, V> {
    type Item = Item<'a, V>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((run, offset)) = self.run.take() {
                if offset < run.encoded().len() {
                    let character = match utf8::char_at(run.encoded(), offset, 0) {
                        Ok(character) => character,
                        Err(_) => unreachable!("text run payloads are validated at construction"),
                    };
                    self.run = Some((run, offset + character.len_utf8()));
                    return Some(Item::Char(character));
                }
            }
            match self.leaves.next()? {
                Element::Opaque(value) => return Some(Item::Value(value)),
                Element::Text(run) => self.run = Some((run, crate::codec::HEADER_SIZE)),
            }
        }
    }
}
