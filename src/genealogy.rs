//! Genealogy facade: stem, identifier index and the read operations.
//!
//! Mutations live in [`crate::mutation`].

use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

use generational_arena::Index;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::children::Children;
use crate::config::Settings;
use crate::domain::{GenealogyError, GenealogyResult, Node, NodeArena, Payload};

/// Directed acyclic lineage of payloads hanging off a single, permanent stem.
///
/// A node may have several parents and several children; edges form a set.
/// Every operation either succeeds completely or returns an error with the
/// genealogy left exactly as it was.
///
/// The type holds `Rc` handles and is neither `Send` nor `Sync`. Hosts that
/// share it across threads must wrap the whole genealogy in their own lock.
pub struct Genealogy<P: Payload> {
    pub(crate) stem: P::Id,
    pub(crate) nodes: NodeArena<P>,
    pub(crate) settings: Settings,
}

impl<P: Payload> Genealogy<P> {
    /// Create a genealogy holding only the stem.
    pub fn new(stem: P::Id) -> GenealogyResult<Self, P::Id> {
        Self::with_settings(stem, Settings::default())
    }

    #[instrument(level = "debug", skip(settings))]
    pub fn with_settings(stem: P::Id, settings: Settings) -> GenealogyResult<Self, P::Id> {
        let payload = build_payload::<P>(stem.clone())?;
        let mut nodes = NodeArena::new();
        nodes.insert(stem.clone(), Node::new(payload, BTreeSet::new()));
        Ok(Self {
            stem,
            nodes,
            settings,
        })
    }

    pub fn stem_id(&self) -> &P::Id {
        &self.stem
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[instrument(level = "trace", skip(self))]
    pub fn exists(&self, id: &P::Id) -> bool {
        self.nodes.contains(id)
    }

    /// Payload stored under `id`.
    #[instrument(level = "trace", skip(self))]
    pub fn lookup(&self, id: &P::Id) -> GenealogyResult<&P, P::Id> {
        Ok(self.node(id)?.payload())
    }

    /// Ids of the direct parents of `id`, in ascending order. Empty for the stem.
    #[instrument(level = "trace", skip(self))]
    pub fn parents(&self, id: &P::Id) -> GenealogyResult<&BTreeSet<P::Id>, P::Id> {
        Ok(self.node(id)?.parents())
    }

    /// Iterator over the payloads of the direct children of `id`.
    #[instrument(level = "trace", skip(self))]
    pub fn children(&self, id: &P::Id) -> GenealogyResult<Children<'_, P>, P::Id> {
        Ok(Children::new(self.node(id)?.children()))
    }

    /// Whether `child_id` is a direct child of `parent_id`.
    pub fn has_edge(&self, parent_id: &P::Id, child_id: &P::Id) -> bool {
        self.nodes
            .node(child_id)
            .is_some_and(|child| child.parents().contains(parent_id))
    }

    /// Number of nodes, stem included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// All ids in ascending order.
    pub fn ids(&self) -> Vec<P::Id> {
        self.nodes.ids().cloned().sorted().collect()
    }

    pub(crate) fn node(&self, id: &P::Id) -> GenealogyResult<&Node<P>, P::Id> {
        self.nodes
            .node(id)
            .ok_or_else(|| GenealogyError::UnknownId(id.clone()))
    }

    /// Arena handle of an existing node.
    pub(crate) fn resolve(&self, id: &P::Id) -> GenealogyResult<Index, P::Id> {
        self.nodes.handle(id).ok_or_else(|| {
            debug!(?id, "unknown id");
            GenealogyError::UnknownId(id.clone())
        })
    }

    pub(crate) fn ensure_absent(&self, id: &P::Id) -> GenealogyResult<(), P::Id> {
        if self.nodes.contains(id) {
            debug!(?id, "id already exists");
            return Err(GenealogyError::AlreadyExists(id.clone()));
        }
        Ok(())
    }
}

/// Construct a payload in isolation; nothing shared is touched.
pub(crate) fn build_payload<P: Payload>(id: P::Id) -> GenealogyResult<Rc<P>, P::Id> {
    match P::from_id(id.clone()) {
        Ok(payload) => Ok(Rc::new(payload)),
        Err(source) => {
            debug!(?id, error = %source, "payload construction failed");
            Err(GenealogyError::payload(id, source))
        }
    }
}

impl<P: Payload> fmt::Debug for Genealogy<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Genealogy")
            .field("stem", &self.stem)
            .field("nodes", &self.nodes)
            .finish()
    }
}
