use std::collections::BTreeMap;
use std::rc::Rc;

use generational_arena::Index;
use tracing::{debug, instrument, trace};

use crate::config::EmptyParentsPolicy;
use crate::domain::{GenealogyError, GenealogyResult, Node, Payload};
use crate::genealogy::{build_payload, Genealogy};

impl<P: Payload> Genealogy<P> {
    /// Create `id` as a child of `parent_id`.
    ///
    /// # Errors
    /// * `AlreadyExists` if `id` is present.
    /// * `UnknownId` if `parent_id` is absent.
    /// * `Payload` if the payload cannot be built.
    #[instrument(level = "debug", skip(self))]
    pub fn create(&mut self, id: P::Id, parent_id: &P::Id) -> GenealogyResult<(), P::Id> {
        self.ensure_absent(&id)?;
        let parent = self.resolve(parent_id)?;
        let payload = build_payload::<P>(id.clone())?;

        self.attach(id, payload, BTreeMap::from([(parent_id.clone(), parent)]));
        Ok(())
    }

    /// Create `id` as a child of every node in `parent_ids`.
    ///
    /// Duplicate parent ids collapse into one edge. `id` is checked first, then
    /// the parents in the order given; the first failing check is reported.
    /// An empty `parent_ids` is handled according to
    /// [`Settings::empty_parents`](crate::config::Settings::empty_parents).
    #[instrument(level = "debug", skip(self))]
    pub fn create_with_parents(
        &mut self,
        id: P::Id,
        parent_ids: &[P::Id],
    ) -> GenealogyResult<(), P::Id> {
        self.ensure_absent(&id)?;

        if parent_ids.is_empty() {
            return match self.settings.empty_parents {
                EmptyParentsPolicy::Reject => {
                    debug!(?id, "rejecting node without parents");
                    Err(GenealogyError::EmptyParents(id))
                }
                EmptyParentsPolicy::Ignore => {
                    debug!(?id, "ignoring node without parents");
                    Ok(())
                }
            };
        }

        let mut parents = BTreeMap::new();
        for parent_id in parent_ids {
            let parent = self.resolve(parent_id)?;
            parents.insert(parent_id.clone(), parent);
        }
        let payload = build_payload::<P>(id.clone())?;

        self.attach(id, payload, parents);
        Ok(())
    }

    /// Add the edge `parent_id -> child_id`.
    ///
    /// Returns `false` when the edge already exists, leaving everything as is.
    /// The direction is trusted: connecting a node below one of its own
    /// descendants is not detected.
    #[instrument(level = "debug", skip(self))]
    pub fn connect(&mut self, child_id: &P::Id, parent_id: &P::Id) -> GenealogyResult<bool, P::Id> {
        let child = self.resolve(child_id)?;
        let parent = self.resolve(parent_id)?;
        if *child_id == self.stem {
            debug!(?child_id, "stem cannot take a parent");
            return Err(GenealogyError::ForbiddenStemParent(child_id.clone()));
        }
        if child_id == parent_id {
            debug!(?child_id, "self edge rejected");
            return Err(GenealogyError::SelfEdge(child_id.clone()));
        }

        let child_node = self
            .nodes
            .get_mut(child)
            .ok_or_else(|| GenealogyError::UnknownId(child_id.clone()))?;
        if !child_node.parents.insert(parent_id.clone()) {
            trace!("edge already present");
            return Ok(false);
        }
        let payload = Rc::clone(&child_node.payload);

        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.insert(child_id.clone(), payload);
        }
        Ok(true)
    }

    /// Link a built payload below resolved parents, then index it.
    ///
    /// All handles in `parents` were resolved by the caller and nothing was
    /// removed since, so none of the lookups below can miss.
    fn attach(&mut self, id: P::Id, payload: Rc<P>, parents: BTreeMap<P::Id, Index>) {
        let handles: Vec<Index> = parents.values().copied().collect();
        let node = Node::new(Rc::clone(&payload), parents.into_keys().collect());

        for handle in handles {
            if let Some(parent) = self.nodes.get_mut(handle) {
                parent.children.insert(id.clone(), Rc::clone(&payload));
            }
        }
        trace!(?id, parents = node.parents.len(), "node linked");
        self.nodes.insert(id, node);
    }
}
