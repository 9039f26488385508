use alloc::vec::Vec;
use core::cmp::Ordering;

use super::arena::Arena;
use super::handle::Handle;
use super::navigate;
use super::node::{Node, Side};
use crate::alpha::Alpha;
use crate::comparator::Comparator;

mod rebuild;

/// The scapegoat tree backing `SGTreeMap`.
///
/// Nodes carry no balance metadata. Insertion checks the depth of the new node against
/// `floor(log_{1/alpha}(len))` and, when it is too deep, rebuilds the subtree of the first
/// ancestor that is not alpha-weight-balanced. Removal rebuilds the whole tree once `len` falls
/// below `alpha * max_len`.
pub(crate) struct RawSGTreeMap<K, V, C> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<K>>,
    /// Arena storing all values, addressed from the nodes.
    values: Arena<V>,
    /// Handle to the root node, if the tree is non-empty.
    root: Option<Handle>,
    /// In-order minimum.
    first: Option<Handle>,
    /// In-order maximum.
    last: Option<Handle>,
    /// Total number of key-value pairs in the tree.
    len: usize,
    /// High-water mark of `len` since the last rebuild.
    max_len: usize,
    alpha: Alpha,
    comparator: C,
}

/// Result of an insertion attempt.
pub(crate) enum InsertResult<V> {
    /// A new node was linked in.
    Inserted(Handle),
    /// The key is already present at `node`; the rejected value is handed back.
    Occupied { node: Handle, value: V },
}

impl<K, V, C> RawSGTreeMap<K, V, C> {
    /// Creates a new, empty tree.
    pub(crate) const fn new(alpha: Alpha, comparator: C) -> Self {
        Self {
            nodes: Arena::new(),
            values: Arena::new(),
            root: None,
            first: None,
            last: None,
            len: 0,
            max_len: 0,
            alpha,
            comparator,
        }
    }

    /// Creates a new tree with room for `capacity` entries.
    pub(crate) fn with_capacity(capacity: usize, alpha: Alpha, comparator: C) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            values: Arena::with_capacity(capacity),
            ..Self::new(alpha, comparator)
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn capacity(&self) -> usize {
        self.values.capacity()
    }

    pub(crate) const fn alpha(&self) -> Alpha {
        self.alpha
    }

    pub(crate) const fn first(&self) -> Option<Handle> {
        self.first
    }

    pub(crate) const fn last(&self) -> Option<Handle> {
        self.last
    }

    /// Clears all elements from the tree, keeping `alpha` and the comparator.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.values.clear();
        self.root = None;
        self.first = None;
        self.last = None;
        self.len = 0;
        self.max_len = 0;
    }

    #[inline]
    pub(crate) fn value(&self, node: Handle) -> &V {
        self.values.get(self.nodes.get(node).value())
    }

    #[inline]
    pub(crate) fn entry(&self, node: Handle) -> (&K, &V) {
        let node = self.nodes.get(node);
        (node.key(), self.values.get(node.value()))
    }

    #[inline]
    pub(crate) fn entry_mut(&mut self, node: Handle) -> (&K, &mut V) {
        let node = self.nodes.get(node);
        (node.key(), self.values.get_mut(node.value()))
    }

    /// Shared access to both arenas, for iterators.
    pub(crate) fn arenas(&self) -> (&Arena<Node<K>>, &Arena<V>) {
        (&self.nodes, &self.values)
    }

    /// Shared access to the nodes plus the base pointer of the value slots, for `IterMut`.
    ///
    /// The pointer stays valid for as long as the returned borrow: nothing can insert or
    /// remove while `self` is mutably borrowed.
    pub(crate) fn arenas_mut(&mut self) -> (&Arena<Node<K>>, *mut Option<V>) {
        let values = self.values.slots_mut_ptr();
        (&self.nodes, values)
    }

    pub(crate) fn successor(&self, node: Handle) -> Option<Handle> {
        navigate::successor(&self.nodes, node)
    }

    pub(crate) fn predecessor(&self, node: Handle) -> Option<Handle> {
        navigate::predecessor(&self.nodes, node)
    }

    /// Number of levels, `0` for an empty tree.
    pub(crate) fn height(&self) -> usize {
        navigate::levels(&self.nodes, self.root)
    }

    /// Handles of every entry in key order.
    pub(crate) fn handles_in_order(&self) -> Vec<Handle> {
        navigate::in_order(&self.nodes, self.first, self.len)
    }

    /// Drains all key-value pairs in key order. O(n): the tree is dismantled, not rebalanced.
    pub(crate) fn drain_to_vec(&mut self) -> Vec<(K, V)> {
        let handles = self.handles_in_order();
        let mut result = Vec::with_capacity(handles.len());
        for handle in handles {
            let (key, value) = self.nodes.take(handle).into_parts();
            result.push((key, self.values.take(value)));
        }
        self.clear();
        result
    }

    /// Unlinks `node`, frees it, and returns its key and value.
    ///
    /// May rebuild the whole tree afterwards; every other handle stays valid either way.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a live entry.
    pub(crate) fn remove_node(&mut self, node: Handle) -> (K, V) {
        assert!(self.nodes.contains(node), "`RawSGTreeMap::remove_node()` - `node` is invalid!");

        if self.first == Some(node) {
            self.first = self.successor(node);
        }
        if self.last == Some(node) {
            self.last = self.predecessor(node);
        }

        let removed = self.nodes.get(node);
        match (removed.left(), removed.right()) {
            (None, right) => self.replace_subtree(node, right),
            (left @ Some(_), None) => self.replace_subtree(node, left),
            (Some(left), Some(right)) => {
                let heir = navigate::subtree_min(&self.nodes, right);
                if self.nodes.get(heir).parent() != Some(node) {
                    let heir_right = self.nodes.get(heir).right();
                    self.replace_subtree(heir, heir_right);
                    self.nodes.get_mut(heir).set_right(Some(right));
                    self.nodes.get_mut(right).set_parent(Some(heir));
                }
                self.replace_subtree(node, Some(heir));
                self.nodes.get_mut(heir).set_left(Some(left));
                self.nodes.get_mut(left).set_parent(Some(heir));
            }
        }

        self.len -= 1;
        let (key, value) = self.nodes.take(node).into_parts();
        let value = self.values.take(value);

        if self.alpha.falls_short(self.len, self.max_len) {
            tracing::debug!(len = self.len, max_len = self.max_len, "rebuilding whole tree after removal");
            self.rebuild_all();
            self.max_len = self.len;
        }

        (key, value)
    }

    pub(crate) fn pop_first(&mut self) -> Option<(K, V)> {
        let first = self.first?;
        Some(self.remove_node(first))
    }

    pub(crate) fn pop_last(&mut self) -> Option<(K, V)> {
        let last = self.last?;
        Some(self.remove_node(last))
    }

    /// Puts `replacement` (possibly empty) where `old` hangs, fixing the parent link on both
    /// sides. `old` keeps its own links.
    fn replace_subtree(&mut self, old: Handle, replacement: Option<Handle>) {
        let parent = self.nodes.get(old).parent();
        match parent {
            None => self.root = replacement,
            Some(parent) => {
                let side = self.nodes.get(parent).side_of(old);
                self.nodes.get_mut(parent).set_child(side, replacement);
            }
        }
        if let Some(replacement) = replacement {
            self.nodes.get_mut(replacement).set_parent(parent);
        }
    }

    /// Walks up from a freshly inserted node that sits `depth` edges deep and rebuilds the
    /// subtree of the first ancestor with a child heavier than `alpha` of its weight.
    ///
    /// Weights are accumulated on the way up: only the sibling subtree at each step has to be
    /// counted, so the whole search costs O(weight of the scapegoat).
    fn rebuild_scapegoat(&mut self, inserted: Handle, depth: usize) {
        let mut child = inserted;
        let mut child_weight = 1;

        while let Some(parent) = self.nodes.get(child).parent() {
            let parent_node = self.nodes.get(parent);
            let sibling = match parent_node.side_of(child) {
                Side::Left => parent_node.right(),
                Side::Right => parent_node.left(),
            };
            let sibling_weight = navigate::weight(&self.nodes, sibling);
            let weight = child_weight + 1 + sibling_weight;

            if !self.alpha.admits(child_weight, weight) || !self.alpha.admits(sibling_weight, weight) {
                tracing::debug!(depth, weight, len = self.len, "rebuilding scapegoat subtree");
                self.rebuild_subtree(parent, weight);
                self.max_len = self.len;
                return;
            }

            child = parent;
            child_weight = weight;
        }

        // Not reached: a node deeper than the limit always has an unbalanced ancestor.
    }

    /// Entry-by-entry structural comparison: same keys and values in the same order, and each
    /// entry's parent (or its absence) matching as well.
    pub(crate) fn structurally_eq(&self, other: &Self) -> bool
    where
        K: PartialEq,
        V: PartialEq,
    {
        if self.len != other.len {
            return false;
        }

        let mut ours = self.first;
        let mut theirs = other.first;
        while let (Some(a), Some(b)) = (ours, theirs) {
            if self.entry(a) != other.entry(b) {
                return false;
            }
            let parents_match = match (self.nodes.get(a).parent(), other.nodes.get(b).parent()) {
                (None, None) => true,
                (Some(pa), Some(pb)) => self.entry(pa) == other.entry(pb),
                _ => false,
            };
            if !parents_match {
                return false;
            }
            ours = self.successor(a);
            theirs = other.successor(b);
        }
        true
    }
}

impl<K, V, C: Comparator<K>> RawSGTreeMap<K, V, C> {
    /// Finds the node holding `key`.
    pub(crate) fn search(&self, key: &K) -> Option<Handle> {
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            current = match self.comparator.compare(key, node.key()) {
                Ordering::Less => node.left(),
                Ordering::Greater => node.right(),
                Ordering::Equal => return Some(handle),
            };
        }
        None
    }

    pub(crate) fn get(&self, key: &K) -> Option<&V> {
        self.search(key).map(|node| self.value(node))
    }

    pub(crate) fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let node = self.search(key)?;
        Some(self.entry_mut(node).1)
    }

    pub(crate) fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.search(key).map(|node| self.entry(node))
    }

    /// Inserts `key` unless an equivalent key is present.
    ///
    /// A new node is attached as a leaf; if it lands deeper than `floor(log_{1/alpha}(len))`
    /// (and the tree holds more than two entries) a scapegoat subtree is rebuilt.
    pub(crate) fn insert(&mut self, key: K, value: V) -> InsertResult<V> {
        let mut parent = None;
        let mut side = Side::Left;
        let mut current = self.root;
        let mut depth = 0;
        let mut is_first = true;
        let mut is_last = true;

        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            parent = Some(handle);
            depth += 1;
            match self.comparator.compare(&key, node.key()) {
                Ordering::Less => {
                    side = Side::Left;
                    is_last = false;
                    current = node.left();
                }
                Ordering::Greater => {
                    side = Side::Right;
                    is_first = false;
                    current = node.right();
                }
                Ordering::Equal => return InsertResult::Occupied { node: handle, value },
            }
        }

        let value = self.values.alloc(value);
        let mut node = Node::new(key, value);
        node.set_parent(parent);
        let handle = self.nodes.alloc(node);
        match parent {
            Some(parent) => self.nodes.get_mut(parent).set_child(side, Some(handle)),
            None => self.root = Some(handle),
        }

        self.len += 1;
        self.max_len = self.max_len.max(self.len);
        if is_first {
            self.first = Some(handle);
        }
        if is_last {
            self.last = Some(handle);
        }

        tracing::trace!(depth, len = self.len, "inserted entry");
        if self.len > 2 && self.alpha.exceeds_height_limit(depth, self.len) {
            self.rebuild_scapegoat(handle, depth);
        }

        InsertResult::Inserted(handle)
    }

    pub(crate) fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let node = self.search(key)?;
        Some(self.remove_node(node))
    }
}

impl<K: Clone, V: Clone, C: Clone> Clone for RawSGTreeMap<K, V, C> {
    /// Arena slots are copied one-for-one, so the clone has the same shape and the same
    /// handles as the original.
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            values: self.values.clone(),
            root: self.root,
            first: self.first,
            last: self.last,
            len: self.len,
            max_len: self.max_len,
            alpha: self.alpha,
            comparator: self.comparator.clone(),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::uninlined_format_args, clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
mod tests {
    use super::*;
    use crate::comparator::OrdComparator;
    use alloc::string::String;
    use proptest::prelude::*;

    type Tree = RawSGTreeMap<i32, i32, OrdComparator>;

    fn tree() -> Tree {
        RawSGTreeMap::new(Alpha::DEFAULT, OrdComparator)
    }

    impl<K: Ord + core::fmt::Debug, V, C> RawSGTreeMap<K, V, C> {
        /// Validates the structural invariants. Panics with a descriptive message if any are
        /// violated.
        pub(crate) fn validate_invariants(&self) {
            let Some(root) = self.root else {
                assert_eq!(self.len, 0, "Empty tree should have len 0");
                assert!(self.first.is_none(), "Empty tree should have no first");
                assert!(self.last.is_none(), "Empty tree should have no last");
                return;
            };

            let mut errors: Vec<String> = Vec::new();

            if self.nodes.get(root).parent().is_some() {
                errors.push(alloc::format!("Root {:?} has a parent", root));
            }

            // Depth-first walk checking links and collecting depths.
            let mut count = 0;
            let mut deepest = 0;
            let mut stack = alloc::vec![(root, 0usize)];
            while let Some((handle, depth)) = stack.pop() {
                count += 1;
                deepest = deepest.max(depth);
                let node = self.nodes.get(handle);
                for child in [node.left(), node.right()].into_iter().flatten() {
                    if self.nodes.get(child).parent() != Some(handle) {
                        errors.push(alloc::format!(
                            "Parent link mismatch: child {:?} of {:?} points at {:?}",
                            child,
                            handle,
                            self.nodes.get(child).parent()
                        ));
                    }
                    stack.push((child, depth + 1));
                }
            }

            if count != self.len {
                errors.push(alloc::format!("len mismatch: self.len={}, reachable={}", self.len, count));
            }
            if self.len > self.max_len {
                errors.push(alloc::format!("len {} exceeds max_len {}", self.len, self.max_len));
            }

            let bound = self.alpha.height_limit(self.max_len) + 1;
            if deepest > bound {
                errors.push(alloc::format!(
                    "Depth {} exceeds bound {} (len={}, max_len={})",
                    deepest,
                    bound,
                    self.len,
                    self.max_len
                ));
            }

            let min = navigate::subtree_min(&self.nodes, root);
            let max = navigate::subtree_max(&self.nodes, root);
            if self.first != Some(min) {
                errors.push(alloc::format!("first mismatch: expected {:?}, got {:?}", min, self.first));
            }
            if self.last != Some(max) {
                errors.push(alloc::format!("last mismatch: expected {:?}, got {:?}", max, self.last));
            }

            let in_order = self.handles_in_order();
            if in_order.len() != self.len {
                errors.push(alloc::format!(
                    "Successor walk visited {} nodes, expected {}",
                    in_order.len(),
                    self.len
                ));
            }
            for pair in in_order.windows(2) {
                let (a, b) = (self.key(pair[0]), self.key(pair[1]));
                if a >= b {
                    errors.push(alloc::format!("Keys out of order: {:?} then {:?}", a, b));
                }
                if self.predecessor(pair[1]) != Some(pair[0]) {
                    errors.push(alloc::format!("predecessor({:?}) is not {:?}", pair[1], pair[0]));
                }
            }

            assert!(errors.is_empty(), "Tree invariant violations:\n{}", errors.join("\n"));
        }

        /// Returns `true` if every node satisfies the alpha-weight-balance condition.
        pub(crate) fn is_weight_balanced(&self) -> bool {
            self.handles_in_order().into_iter().all(|handle| {
                let node = self.nodes.get(handle);
                let weight = navigate::weight(&self.nodes, Some(handle));
                let left = navigate::weight(&self.nodes, node.left());
                let right = navigate::weight(&self.nodes, node.right());
                self.alpha.admits(left, weight) && self.alpha.admits(right, weight)
            })
        }

        pub(crate) fn key(&self, node: Handle) -> &K {
            self.nodes.get(node).key()
        }

        pub(crate) fn keys_in_order(&self) -> Vec<&K> {
            self.handles_in_order().into_iter().map(|h| self.key(h)).collect()
        }
    }

    #[test]
    fn empty_tree() {
        let tree = tree();
        tree.validate_invariants();
        assert!(tree.is_empty());
        assert_eq!(tree.height(), 0);
        assert!(tree.search(&1).is_none());
    }

    #[test]
    fn insert_reports_occupied_key() {
        let mut tree = tree();
        let InsertResult::Inserted(first) = tree.insert(1, 10) else {
            panic!("fresh key should be inserted");
        };
        match tree.insert(1, 20) {
            InsertResult::Occupied { node, value } => {
                assert_eq!(node, first);
                assert_eq!(value, 20);
            }
            InsertResult::Inserted(_) => panic!("duplicate key must not be inserted"),
        }
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.get(&1), Some(&10));
    }

    #[test]
    fn ten_keys_traverse_in_order() {
        let mut tree = tree();
        for key in [5, 3, 8, 1, 4, 7, 9, 2, 6, 0] {
            tree.insert(key, key * 10);
            tree.validate_invariants();
        }
        let keys: Vec<i32> = tree.keys_in_order().into_iter().copied().collect();
        assert_eq!(keys, (0..10).collect::<Vec<_>>());
        assert_eq!(tree.height(), 4);
        assert_eq!(tree.get(&7), Some(&70));
    }

    #[test]
    fn ascending_inserts_stay_shallow() {
        let mut tree = tree();
        for key in 1..=100 {
            tree.insert(key, key);
            tree.validate_invariants();
        }
        // Depth limit is h_alpha(100) + 1 = 9 edges, i.e. at most 10 levels.
        assert!(tree.height() <= 10, "height {}", tree.height());
        assert_eq!(*tree.key(tree.first().unwrap()), 1);
        assert_eq!(*tree.key(tree.last().unwrap()), 100);
    }

    #[test]
    fn descending_inserts_stay_shallow() {
        let mut tree = tree();
        for key in (0..1000).rev() {
            tree.insert(key, key);
        }
        tree.validate_invariants();
        let bound = Alpha::DEFAULT.height_limit(1000) + 2;
        assert!(tree.height() <= bound, "height {} > {}", tree.height(), bound);
    }

    #[test]
    fn third_ascending_insert_rebuilds_chain() {
        let mut tree = tree();
        tree.insert(1, 1);
        tree.insert(2, 2);
        assert_eq!(tree.height(), 2);
        tree.insert(3, 3);
        // 3 lands at depth 2 > h_alpha(3) = 1; the old root is the scapegoat.
        assert_eq!(tree.height(), 2);
        assert_eq!(*tree.key(tree.root.unwrap()), 2);
        assert_eq!(tree.max_len, 3);
        tree.validate_invariants();
    }

    #[test]
    fn alpha_next_to_one_inserts_in_linear_depth_time() {
        let alpha = Alpha::new(1.0 - f64::EPSILON / 2.0).unwrap();
        let mut tree: Tree = RawSGTreeMap::new(alpha, OrdComparator);
        for key in 0..2_000 {
            tree.insert(key, key);
        }
        // No insertion ever counts as too deep, so the keys form one chain.
        assert_eq!(tree.len(), 2_000);
        assert_eq!(tree.height(), 2_000);
        assert_eq!(tree.get(&1_999), Some(&1_999));

        // Any removal leaves fewer than alpha * max_len entries and rebuilds the whole tree.
        assert_eq!(tree.remove_entry(&0), Some((0, 0)));
        assert_eq!(tree.height(), 11);
        assert!(tree.is_weight_balanced());
        assert_eq!(tree.keys_in_order(), (1..2_000).collect::<Vec<_>>().iter().collect::<Vec<_>>());
    }

    #[test]
    fn remove_updates_extremes() {
        let mut tree = tree();
        for key in 0..50 {
            tree.insert(key, key);
        }
        for key in 0..49 {
            assert_eq!(tree.remove_entry(&key), Some((key, key)));
            tree.validate_invariants();
            assert_eq!(*tree.key(tree.first().unwrap()), key + 1);
            assert_eq!(*tree.key(tree.last().unwrap()), 49);
        }
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.remove_entry(&0), None);
        assert_eq!(tree.pop_last(), Some((49, 49)));
        tree.validate_invariants();
        assert!(tree.pop_first().is_none());
    }

    #[test]
    fn remove_node_with_two_children_keeps_other_handles() {
        let mut tree = tree();
        let mut handles = Vec::new();
        for key in [4, 2, 6, 1, 3, 5, 7] {
            if let InsertResult::Inserted(h) = tree.insert(key, key * 10) {
                handles.push((key, h));
            }
        }
        let root = tree.root.unwrap();
        let root_key = *tree.key(root);
        tree.remove_node(root);
        tree.validate_invariants();

        for (key, handle) in handles.into_iter().filter(|&(k, _)| k != root_key) {
            assert!(tree.nodes.contains(handle));
            assert_eq!(tree.entry(handle), (&key, &(key * 10)));
        }
    }

    #[test]
    #[should_panic(expected = "`RawSGTreeMap::remove_node()` - `node` is invalid!")]
    fn remove_freed_node_panics() {
        let mut tree = tree();
        let InsertResult::Inserted(node) = tree.insert(1, 1) else {
            unreachable!()
        };
        tree.remove_node(node);
        tree.remove_node(node);
    }

    #[test]
    fn whole_tree_rebuild_balances_every_node() {
        let mut tree = tree();
        for key in 0..200 {
            tree.insert(key, key);
        }
        let mut rebuilds = 0;
        for key in (0..200).filter(|k| k % 4 != 0) {
            tree.remove_entry(&key);
            tree.validate_invariants();
            // `max_len` is reset to `len` only by a rebuild.
            if tree.max_len == tree.len && !tree.is_empty() {
                rebuilds += 1;
                assert!(tree.is_weight_balanced());
            }
        }
        assert_eq!(rebuilds, 2);
        assert_eq!(tree.len(), 50);
    }

    #[test]
    fn clone_preserves_shape_and_handles() {
        let mut tree = tree();
        for key in [8, 3, 10, 1, 6, 14, 4, 7, 13] {
            tree.insert(key, -key);
        }
        let copy = tree.clone();
        copy.validate_invariants();
        assert!(tree.structurally_eq(&copy));
        assert_eq!(copy.root, tree.root);
        assert_eq!(copy.max_len, tree.max_len);
    }

    #[test]
    fn structural_eq_sees_shape() {
        let mut a = tree();
        a.insert(1, 1);
        a.insert(2, 2);
        let mut b = tree();
        b.insert(2, 2);
        b.insert(1, 1);
        assert!(!a.structurally_eq(&b));
        assert!(a.structurally_eq(&a.clone()));
    }

    #[test]
    fn drain_returns_sorted_entries_and_empties() {
        let mut tree = tree();
        for key in [3, 1, 2] {
            tree.insert(key, key + 100);
        }
        assert_eq!(tree.drain_to_vec(), [(1, 101), (2, 102), (3, 103)]);
        assert!(tree.is_empty());
        tree.validate_invariants();
        tree.insert(9, 9);
        tree.validate_invariants();
    }

    // Test operations enum for property testing
    #[derive(Clone, Debug)]
    enum Op {
        Insert(i32),
        Remove(i32),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => (0i32..1000).prop_map(Op::Insert),
            1 => (0i32..1000).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn tree_invariants_maintained_after_operations(ops in prop::collection::vec(op_strategy(), 0..500)) {
            let mut tree = tree();

            for op in ops {
                match op {
                    Op::Insert(key) => {
                        tree.insert(key, key * 2);
                    }
                    Op::Remove(key) => {
                        tree.remove_entry(&key);
                    }
                }
                tree.validate_invariants();
            }
        }

        #[test]
        fn invariants_hold_for_any_alpha(
            alpha in 0.51f64..0.99,
            ops in prop::collection::vec(op_strategy(), 0..300),
        ) {
            let mut tree: Tree = RawSGTreeMap::new(Alpha::new(alpha).unwrap(), OrdComparator);

            for op in ops {
                match op {
                    Op::Insert(key) => {
                        tree.insert(key, key);
                    }
                    Op::Remove(key) => {
                        tree.remove_entry(&key);
                    }
                }
            }
            tree.validate_invariants();
        }

        #[test]
        fn removal_order_does_not_matter(keys in prop::collection::btree_set(0i32..500, 1..200)) {
            let mut tree = tree();
            for &key in &keys {
                tree.insert(key, key);
            }
            // Remove every other key starting from the largest.
            for &key in keys.iter().rev().step_by(2) {
                prop_assert_eq!(tree.remove_entry(&key), Some((key, key)));
                tree.validate_invariants();
            }
            let mut expected: Vec<i32> = keys.iter().rev().skip(1).step_by(2).copied().collect();
            expected.reverse();
            let actual: Vec<i32> = tree.keys_in_order().into_iter().copied().collect();
            prop_assert_eq!(actual, expected);
        }
    }
}
