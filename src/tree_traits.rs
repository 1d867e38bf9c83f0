use std::fmt::Display;

use termtree::Tree;
use tracing::instrument;

use crate::domain::Payload;
use crate::Genealogy;

/// Render a genealogy as a `termtree` tree rooted at the stem.
///
/// A node with several parents is rendered again below each of them, so the
/// output grows exponentially with stacked diamonds. Meant for small
/// genealogies and debugging.
pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl<P> TreeNodeConvert for Genealogy<P>
where
    P: Payload,
    P::Id: Display,
{
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        fn build_tree<P>(gen: &Genealogy<P>, id: &P::Id) -> Tree<String>
        where
            P: Payload,
            P::Id: Display,
        {
            let leaves: Vec<_> = gen
                .children(id)
                .map(|children| children.map(|child| build_tree(gen, child.id())).collect())
                .unwrap_or_default();
            Tree::new(id.to_string()).with_leaves(leaves)
        }

        build_tree(self, self.stem_id())
    }
}
