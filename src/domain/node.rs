//! Node record: one payload plus its parent ids and child handles.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::rc::Rc;

use crate::domain::payload::Payload;

/// A genealogy node.
///
/// Parents are held by id and children by shared payload handle, so the
/// ownership graph only ever points downwards. The node's own id is the key
/// it is indexed under and is not repeated here.
pub struct Node<P: Payload> {
    pub(crate) payload: Rc<P>,
    pub(crate) parents: BTreeSet<P::Id>,
    pub(crate) children: BTreeMap<P::Id, Rc<P>>,
}

impl<P: Payload> Node<P> {
    pub(crate) fn new(payload: Rc<P>, parents: BTreeSet<P::Id>) -> Self {
        Self {
            payload,
            parents,
            children: BTreeMap::new(),
        }
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn parents(&self) -> &BTreeSet<P::Id> {
        &self.parents
    }

    pub fn children(&self) -> &BTreeMap<P::Id, Rc<P>> {
        &self.children
    }
}

impl<P: Payload> fmt::Debug for Node<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", self.payload.id())
            .field("parents", &self.parents)
            .field("children", &self.children.keys().collect::<Vec<_>>())
            .finish()
    }
}
