use std::collections::{BTreeMap, HashSet};

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::{GenealogyError, GenealogyResult, NodeArena, Payload};
use crate::genealogy::Genealogy;

/// Everything a cascading removal will change, computed without mutating.
///
/// Built by [`RemovalPlan::compute`], which may fail, and applied by
/// [`RemovalPlan::commit`], which cannot. Handles stay valid in between only
/// as long as the arena is not modified, which `Genealogy::remove` ensures by
/// committing right after computing.
#[derive(Debug)]
pub(crate) struct RemovalPlan<P: Payload> {
    target: P::Id,
    /// Nodes to delete, the target first
    doomed_ids: Vec<P::Id>,
    doomed_handles: Vec<Index>,
    /// Surviving nodes and the parent ids they lose
    detached: Vec<(Index, Vec<P::Id>)>,
    /// Parents of the target whose child sets lose the target
    unlinked: Vec<Index>,
}

impl<P: Payload> RemovalPlan<P> {
    /// Walk the subtree below `id` and decide what dies and what survives.
    ///
    /// A descendant is scheduled for deletion once every one of its parent
    /// edges has been cut by already scheduled nodes. Only then are its own
    /// children visited, so each edge is counted exactly once even when a
    /// descendant is reachable along several paths.
    #[instrument(level = "trace", skip(nodes))]
    pub(crate) fn compute(nodes: &NodeArena<P>, id: &P::Id) -> GenealogyResult<Self, P::Id> {
        let unknown = |id: &P::Id| GenealogyError::UnknownId(id.clone());

        let target = nodes.handle(id).ok_or_else(|| unknown(id))?;
        let target_node = nodes.get(target).ok_or_else(|| unknown(id))?;

        let mut unlinked = Vec::with_capacity(target_node.parents.len());
        for parent_id in &target_node.parents {
            unlinked.push(nodes.handle(parent_id).ok_or_else(|| unknown(parent_id))?);
        }

        let mut doomed_ids = vec![id.clone()];
        let mut doomed_handles = vec![target];
        let mut scheduled = HashSet::from([target]);
        // Partially orphaned descendants: handle plus the parents cut so far
        let mut cuts: BTreeMap<P::Id, (Index, Vec<P::Id>)> = BTreeMap::new();
        let mut worklist = vec![(id.clone(), target)];

        while let Some((parent_id, parent)) = worklist.pop() {
            let parent_node = nodes.get(parent).ok_or_else(|| unknown(&parent_id))?;
            for child_id in parent_node.children.keys() {
                let child = nodes.handle(child_id).ok_or_else(|| unknown(child_id))?;
                if scheduled.contains(&child) {
                    // only reachable if a caller connected a cycle
                    continue;
                }
                let child_node = nodes.get(child).ok_or_else(|| unknown(child_id))?;

                let (_, cut) = cuts
                    .entry(child_id.clone())
                    .or_insert_with(|| (child, Vec::new()));
                cut.push(parent_id.clone());

                if cut.len() == child_node.parents.len() {
                    cuts.remove(child_id);
                    scheduled.insert(child);
                    doomed_ids.push(child_id.clone());
                    doomed_handles.push(child);
                    worklist.push((child_id.clone(), child));
                }
            }
        }

        Ok(Self {
            target: id.clone(),
            doomed_ids,
            doomed_handles,
            detached: cuts.into_values().collect(),
            unlinked,
        })
    }

    /// Ids that the plan deletes, the target first.
    pub(crate) fn doomed(&self) -> &[P::Id] {
        &self.doomed_ids
    }

    /// Number of surviving nodes that lose at least one parent.
    pub(crate) fn detached_count(&self) -> usize {
        self.detached.len()
    }

    /// Apply the plan. Only erases through handles resolved in `compute`.
    pub(crate) fn commit(self, nodes: &mut NodeArena<P>) -> Vec<P::Id> {
        for (survivor, parent_ids) in &self.detached {
            if let Some(node) = nodes.get_mut(*survivor) {
                for parent_id in parent_ids {
                    node.parents.remove(parent_id);
                }
            }
        }
        for &parent in &self.unlinked {
            if let Some(node) = nodes.get_mut(parent) {
                node.children.remove(&self.target);
            }
        }
        for (id, &handle) in self.doomed_ids.iter().zip(&self.doomed_handles) {
            nodes.remove(id, handle);
        }
        self.doomed_ids
    }
}

impl<P: Payload> Genealogy<P> {
    /// Remove `id` and every descendant left without a parent as a result.
    ///
    /// Descendants that keep a parent outside the removed subtree survive and
    /// only lose the edges coming from it. Returns the ids of all deleted
    /// nodes, `id` first.
    ///
    /// Plans and the index they operate on stay inside the crate:
    ///
    /// ```compile_fail
    /// use genealogy::mutation::removal::RemovalPlan;
    /// ```
    ///
    /// ```compile_fail
    /// use genealogy::domain::arena::NodeArena;
    /// ```
    ///
    /// # Errors
    /// * `ForbiddenRootRemoval` if `id` is the stem.
    /// * `UnknownId` if `id` is absent.
    #[instrument(level = "debug", skip(self))]
    pub fn remove(&mut self, id: &P::Id) -> GenealogyResult<Vec<P::Id>, P::Id> {
        if *id == self.stem {
            debug!(?id, "stem removal rejected");
            return Err(GenealogyError::ForbiddenRootRemoval(id.clone()));
        }
        let plan = RemovalPlan::compute(&self.nodes, id)?;
        debug!(
            removed = plan.doomed().len(),
            detached = plan.detached_count(),
            "removal planned"
        );
        Ok(plan.commit(&mut self.nodes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::{init_test_setup, snapshot, Virus};

    fn s(id: &str) -> String {
        id.to_string()
    }

    /// S -> A -> {B, C} -> D, plus E -> C with E under S.
    fn diamond() -> Genealogy<Virus> {
        init_test_setup();
        let mut gen = Genealogy::new(s("S")).unwrap();
        gen.create(s("A"), &s("S")).unwrap();
        gen.create(s("E"), &s("S")).unwrap();
        gen.create(s("B"), &s("A")).unwrap();
        gen.create_with_parents(s("C"), &[s("A"), s("E")]).unwrap();
        gen.create_with_parents(s("D"), &[s("B"), s("C")]).unwrap();
        gen
    }

    #[test]
    fn test_compute_does_not_mutate() {
        let gen = diamond();
        let before = snapshot(&gen);
        let plan = RemovalPlan::compute(&gen.nodes, &s("A")).unwrap();
        assert_eq!(snapshot(&gen), before);

        assert_eq!(plan.doomed(), &[s("A"), s("B")]);
        // C keeps E; D keeps C
        assert_eq!(plan.detached_count(), 2);
    }

    #[test]
    fn test_compute_keeps_nodes_with_outside_parents() {
        let mut gen = diamond();
        gen.connect(&s("B"), &s("E")).unwrap();
        let plan = RemovalPlan::compute(&gen.nodes, &s("E")).unwrap();
        // B keeps A, C keeps A
        assert_eq!(plan.doomed(), &[s("E")]);
        assert_eq!(plan.detached_count(), 2);
    }

    #[test]
    fn test_commit_removes_shared_descendant_once() {
        let mut gen: Genealogy<Virus> = Genealogy::new(s("S")).unwrap();
        gen.create(s("A"), &s("S")).unwrap();
        gen.create(s("B"), &s("A")).unwrap();
        gen.create(s("C"), &s("A")).unwrap();
        gen.create_with_parents(s("D"), &[s("B"), s("C")]).unwrap();

        let mut removed = gen.remove(&s("A")).unwrap();
        removed.sort();

        assert_eq!(removed, vec![s("A"), s("B"), s("C"), s("D")]);
        assert_eq!(gen.ids(), vec![s("S")]);
        assert_eq!(gen.children(&s("S")).unwrap().len(), 0);
    }

    #[test]
    fn test_compute_unknown_id_fails() {
        let gen = diamond();
        let result = RemovalPlan::compute(&gen.nodes, &s("Z"));
        assert!(matches!(result, Err(GenealogyError::UnknownId(_))));
    }
}
