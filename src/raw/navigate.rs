//! Parent-link navigation over the node arena.
//!
//! Everything here reads `parent`/`left`/`right` only; no stack of ancestors is kept between
//! calls. Each step is O(height).

use alloc::vec::Vec;

use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::Node;

/// Explicit stack for subtree walks. Trees stay logarithmically shallow, so the inline
/// capacity covers every realistic walk without touching the heap.
type Stack<T> = SmallVec<[T; 32]>;

/// Leftmost node of the subtree rooted at `handle`.
pub(crate) fn subtree_min<K>(nodes: &Arena<Node<K>>, mut handle: Handle) -> Handle {
    while let Some(left) = nodes.get(handle).left() {
        handle = left;
    }
    handle
}

/// Rightmost node of the subtree rooted at `handle`.
pub(crate) fn subtree_max<K>(nodes: &Arena<Node<K>>, mut handle: Handle) -> Handle {
    while let Some(right) = nodes.get(handle).right() {
        handle = right;
    }
    handle
}

/// In-order successor of `handle`, or `None` if it is the maximum.
pub(crate) fn successor<K>(nodes: &Arena<Node<K>>, handle: Handle) -> Option<Handle> {
    let node = nodes.get(handle);
    if let Some(right) = node.right() {
        return Some(subtree_min(nodes, right));
    }

    // Climb while we are a right child; the first ancestor reached from its left is next.
    let mut child = handle;
    let mut parent = node.parent();
    while let Some(p) = parent {
        let parent_node = nodes.get(p);
        if parent_node.left() == Some(child) {
            return Some(p);
        }
        child = p;
        parent = parent_node.parent();
    }
    None
}

/// In-order predecessor of `handle`, or `None` if it is the minimum.
pub(crate) fn predecessor<K>(nodes: &Arena<Node<K>>, handle: Handle) -> Option<Handle> {
    let node = nodes.get(handle);
    if let Some(left) = node.left() {
        return Some(subtree_max(nodes, left));
    }

    let mut child = handle;
    let mut parent = node.parent();
    while let Some(p) = parent {
        let parent_node = nodes.get(p);
        if parent_node.right() == Some(child) {
            return Some(p);
        }
        child = p;
        parent = parent_node.parent();
    }
    None
}

/// Number of nodes in the subtree rooted at `subtree`.
pub(crate) fn weight<K>(nodes: &Arena<Node<K>>, subtree: Option<Handle>) -> usize {
    let mut count = 0;
    let mut stack: Stack<Handle> = subtree.into_iter().collect();
    while let Some(handle) = stack.pop() {
        count += 1;
        let node = nodes.get(handle);
        stack.extend(node.left());
        stack.extend(node.right());
    }
    count
}

/// Number of levels in the subtree rooted at `subtree`: `0` when empty, `1` for a leaf.
pub(crate) fn levels<K>(nodes: &Arena<Node<K>>, subtree: Option<Handle>) -> usize {
    let mut deepest = 0;
    let mut stack: Stack<(Handle, usize)> = subtree.map(|h| (h, 1)).into_iter().collect();
    while let Some((handle, level)) = stack.pop() {
        deepest = deepest.max(level);
        let node = nodes.get(handle);
        stack.extend(node.left().map(|h| (h, level + 1)));
        stack.extend(node.right().map(|h| (h, level + 1)));
    }
    deepest
}

/// All handles reachable from `first` by successor steps, in key order.
pub(crate) fn in_order<K>(nodes: &Arena<Node<K>>, first: Option<Handle>, len: usize) -> Vec<Handle> {
    let mut handles = Vec::with_capacity(len);
    let mut current = first;
    while let Some(handle) = current {
        handles.push(handle);
        current = successor(nodes, handle);
    }
    handles
}
