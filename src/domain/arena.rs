use std::collections::HashMap;
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::node::Node;
use crate::domain::payload::Payload;

/// Identifier index over arena-stored nodes.
///
/// The id map is the single source of truth for existence. Nodes live in a
/// generational arena so that a removal plan can hold `Index` handles that stay
/// valid until the plan is committed.
pub(crate) struct NodeArena<P: Payload> {
    /// Arena storage for all genealogy nodes
    arena: Arena<Node<P>>,
    /// Id of every live node to its arena slot
    index: HashMap<P::Id, Index>,
}

impl<P: Payload> Default for NodeArena<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Payload> NodeArena<P> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            index: HashMap::new(),
        }
    }

    #[instrument(level = "trace", skip(self))]
    pub fn contains(&self, id: &P::Id) -> bool {
        self.index.contains_key(id)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn handle(&self, id: &P::Id) -> Option<Index> {
        self.index.get(id).copied()
    }

    #[instrument(level = "trace", skip(self))]
    pub fn node(&self, id: &P::Id) -> Option<&Node<P>> {
        self.handle(id).and_then(|idx| self.arena.get(idx))
    }

    pub fn get(&self, idx: Index) -> Option<&Node<P>> {
        self.arena.get(idx)
    }

    pub fn get_mut(&mut self, idx: Index) -> Option<&mut Node<P>> {
        self.arena.get_mut(idx)
    }

    /// Store `node` under `id`. The caller guarantees `id` is not yet present.
    #[instrument(level = "trace", skip(self, node))]
    pub fn insert(&mut self, id: P::Id, node: Node<P>) -> Index {
        let idx = self.arena.insert(node);
        self.index.insert(id, idx);
        idx
    }

    /// Drop the node stored under `id` at `idx`.
    #[instrument(level = "trace", skip(self))]
    pub fn remove(&mut self, id: &P::Id, idx: Index) -> Option<Node<P>> {
        self.index.remove(id);
        self.arena.remove(idx)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &P::Id> {
        self.index.keys()
    }
}

impl<P: Payload> fmt::Debug for NodeArena<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.index
                    .iter()
                    .filter_map(|(id, &idx)| self.arena.get(idx).map(|node| (id, node))),
            )
            .finish()
    }
}
