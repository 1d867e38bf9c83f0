//! Read-only traversal over a node's child set.

use std::collections::btree_map::{self, BTreeMap};
use std::fmt;
use std::iter::FusedIterator;
use std::ptr;
use std::rc::Rc;

use crate::domain::Payload;

/// Double-ended iterator over the payloads of a node's direct children.
///
/// Children are yielded in ascending id order, which is stable for as long as
/// the child set is not modified. The iterator borrows the genealogy, so the
/// set cannot change (and no child can be removed) while it is alive.
///
/// Two iterators compare equal when they walk the same child set and have the
/// same remaining range. A default iterator walks nothing and equals only
/// other default iterators.
pub struct Children<'a, P: Payload> {
    set: Option<&'a BTreeMap<P::Id, Rc<P>>>,
    values: Option<btree_map::Values<'a, P::Id, Rc<P>>>,
    front: usize,
    back: usize,
}

impl<'a, P: Payload> Children<'a, P> {
    pub(crate) fn new(set: &'a BTreeMap<P::Id, Rc<P>>) -> Self {
        Self {
            set: Some(set),
            values: Some(set.values()),
            front: 0,
            back: set.len(),
        }
    }

    /// Position of the next front element within the child set.
    pub fn position(&self) -> usize {
        self.front
    }
}

impl<'a, P: Payload> Iterator for Children<'a, P> {
    type Item = &'a P;

    fn next(&mut self) -> Option<Self::Item> {
        let payload = self.values.as_mut()?.next()?;
        self.front += 1;
        Some(payload.as_ref())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<P: Payload> DoubleEndedIterator for Children<'_, P> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let payload = self.values.as_mut()?.next_back()?;
        self.back -= 1;
        Some(payload.as_ref())
    }
}

impl<P: Payload> ExactSizeIterator for Children<'_, P> {}

impl<P: Payload> FusedIterator for Children<'_, P> {}

impl<P: Payload> Default for Children<'_, P> {
    fn default() -> Self {
        Self {
            set: None,
            values: None,
            front: 0,
            back: 0,
        }
    }
}

impl<P: Payload> Clone for Children<'_, P> {
    fn clone(&self) -> Self {
        Self {
            set: self.set,
            values: self.values.clone(),
            front: self.front,
            back: self.back,
        }
    }
}

impl<P: Payload> PartialEq for Children<'_, P> {
    fn eq(&self, other: &Self) -> bool {
        let same_set = match (self.set, other.set) {
            (Some(a), Some(b)) => ptr::eq(a, b),
            (None, None) => true,
            _ => false,
        };
        same_set && self.front == other.front && self.back == other.back
    }
}

impl<P: Payload> Eq for Children<'_, P> {}

impl<P: Payload> fmt::Debug for Children<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Children")
            .field("front", &self.front)
            .field("back", &self.back)
            .field("remaining", &self.clone().map(|p| p.id()).collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::{init_test_setup, Virus};
    use crate::Genealogy;

    fn sample() -> Genealogy<Virus> {
        init_test_setup();
        let mut gen = Genealogy::new("1".to_string()).unwrap();
        gen.create("2".to_string(), &"1".to_string()).unwrap();
        gen.create("3".to_string(), &"1".to_string()).unwrap();
        gen.create("4".to_string(), &"1".to_string()).unwrap();
        gen
    }

    #[test]
    fn test_children_are_yielded_in_both_directions() {
        let gen = sample();
        let forward: Vec<_> = gen.children(&"1".to_string()).unwrap().map(|v| v.id().clone()).collect();
        let mut backward: Vec<_> = gen
            .children(&"1".to_string())
            .unwrap()
            .rev()
            .map(|v| v.id().clone())
            .collect();
        backward.reverse();
        assert_eq!(forward, vec!["2", "3", "4"]);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_iterators_compare_by_position() {
        let gen = sample();
        let stem = "1".to_string();
        let mut a = gen.children(&stem).unwrap();
        let b = gen.children(&stem).unwrap();
        assert_eq!(a, b);

        a.next();
        assert_ne!(a, b);
        assert_eq!(a.position(), 1);

        let mut c = b.clone();
        c.next();
        assert_eq!(a, c);
    }

    #[test]
    fn test_iterators_over_different_sets_differ() {
        let gen = sample();
        let empty_a = gen.children(&"2".to_string()).unwrap();
        let empty_b = gen.children(&"3".to_string()).unwrap();
        assert_eq!(empty_a.len(), 0);
        assert_ne!(empty_a, empty_b);
    }

    #[test]
    fn test_default_iterator_is_empty() {
        let mut it: Children<'_, Virus> = Children::default();
        assert_eq!(it.len(), 0);
        assert!(it.next().is_none());
        assert!(it.next_back().is_none());
        assert_eq!(it, Children::default());
    }

    #[test]
    fn test_exhausted_iterators_meet_in_the_middle() {
        let gen = sample();
        let mut it = gen.children(&"1".to_string()).unwrap();
        assert_eq!(it.next().map(|v| v.id().as_str()), Some("2"));
        assert_eq!(it.next_back().map(|v| v.id().as_str()), Some("4"));
        assert_eq!(it.len(), 1);
        assert_eq!(it.next().map(|v| v.id().as_str()), Some("3"));
        assert!(it.next().is_none());
        assert!(it.next_back().is_none());
    }
}
