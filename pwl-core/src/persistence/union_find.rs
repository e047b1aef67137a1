//! Union-find (disjoint set) forest used by the edge filtration.
//!
//! The filtration walks edges in weight order and merges the components of
//! their endpoints. Merging is deliberately asymmetric: the root of the first
//! argument is attached beneath the root of the second, so the caller decides
//! which component survives.

#[derive(Clone, Debug)]
pub(super) struct DisjointSetForest {
    parent: Vec<usize>,
}

impl DisjointSetForest {
    pub(super) fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    /// Returns the root of `node`, compressing the path on the way.
    ///
    /// A node outside the forest is its own root.
    pub(super) fn find(&mut self, mut node: usize) -> usize {
        let mut root = node;
        while let Some(&parent) = self.parent.get(root)
            && parent != root
        {
            root = parent;
        }

        while let Some(slot) = self.parent.get_mut(node)
            && *slot != node
        {
            node = std::mem::replace(slot, root);
        }

        root
    }

    /// Attaches the root of `child` beneath the root of `survivor`.
    pub(super) fn merge(&mut self, child: usize, survivor: usize) {
        let child = self.find(child);
        let survivor = self.find(survivor);
        if child != survivor
            && let Some(slot) = self.parent.get_mut(child)
        {
            *slot = survivor;
        }
    }

    /// Vertices that are their own parent, in ascending order.
    pub(super) fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        self.parent
            .iter()
            .enumerate()
            .filter_map(|(vertex, &parent)| (vertex == parent).then_some(vertex))
    }
}
