//! Subtree reconstruction: flatten to a sorted chain, then build a complete tree from it.
//!
//! Both phases only relink handles. No node changes slot, so handles held by callers keep
//! naming the same entries.

use super::RawSGTreeMap;
use crate::raw::handle::Handle;

impl<K, V, C> RawSGTreeMap<K, V, C> {
    /// Rebuilds the subtree rooted at `subtree`, which must hold exactly `weight` nodes, into a
    /// complete tree hanging where `subtree` used to.
    pub(super) fn rebuild_subtree(&mut self, subtree: Handle, weight: usize) {
        let parent = self.nodes.get(subtree).parent();
        let side = parent.map(|parent| self.nodes.get(parent).side_of(subtree));

        let chain = self.flatten(Some(subtree), None);
        self.detach_chain(chain);
        let (rebuilt, rest) = self.build(weight, chain);
        debug_assert!(rest.is_none(), "`RawSGTreeMap::rebuild_subtree()` - `weight` is too small!");

        if let Some(rebuilt) = rebuilt {
            self.nodes.get_mut(rebuilt).set_parent(parent);
        }
        match (parent, side) {
            (Some(parent), Some(side)) => self.nodes.get_mut(parent).set_child(side, rebuilt),
            _ => self.root = rebuilt,
        }
    }

    /// Rebuilds the whole tree.
    pub(super) fn rebuild_all(&mut self) {
        if let Some(root) = self.root {
            self.rebuild_subtree(root, self.len);
        }
    }

    /// Threads the subtree rooted at `subtree` into an ascending chain through the chain links
    /// and prepends it to `tail`. Returns the head of the combined chain.
    ///
    /// Iterates down the left spine and recurses only into right children, so the recursion
    /// depth is bounded by the subtree height.
    fn flatten(&mut self, subtree: Option<Handle>, mut tail: Option<Handle>) -> Option<Handle> {
        let mut current = subtree;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            let (left, right) = (node.left(), node.right());
            let next = self.flatten(right, tail);
            self.nodes.get_mut(handle).set_chain_next(next);
            tail = Some(handle);
            current = left;
        }
        tail
    }

    /// Clears the stale tree links of every node in the chain starting at `head`.
    fn detach_chain(&mut self, head: Option<Handle>) {
        let mut current = head;
        while let Some(handle) = current {
            let node = self.nodes.get_mut(handle);
            node.detach_for_chain();
            current = node.chain_next();
        }
    }

    /// Builds a complete tree from the first `n` nodes of the chain at `head`.
    ///
    /// Returns the root of the new tree (with no parent set) and the remainder of the chain.
    /// The left part gets `ceil((n - 1) / 2)` nodes, the right part `floor((n - 1) / 2)`.
    fn build(&mut self, n: usize, head: Option<Handle>) -> (Option<Handle>, Option<Handle>) {
        if n == 0 {
            return (None, head);
        }

        let (left, rest) = self.build((n - 1).div_ceil(2), head);
        let mid = rest.expect("`RawSGTreeMap::build()` - chain is shorter than `n`!");
        let next = self.nodes.get(mid).chain_next();
        let (right, rest) = self.build((n - 1) / 2, next);

        let node = self.nodes.get_mut(mid);
        node.set_left(left);
        node.set_right(right);
        for child in [left, right].into_iter().flatten() {
            self.nodes.get_mut(child).set_parent(Some(mid));
        }

        (Some(mid), rest)
    }
}
