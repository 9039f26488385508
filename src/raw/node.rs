use super::handle::Handle;

/// A single tree entry: its key, the handle of its value, and its links.
///
/// `left` and `right` are owning in the sense that a node is reachable from the root only
/// through them; `parent` is a back-reference used for navigation and re-attachment.
#[derive(Clone, Debug)]
pub(crate) struct Node<K> {
    key: K,
    value: Handle,
    parent: Option<Handle>,
    left: Option<Handle>,
    right: Option<Handle>,
}

/// Which child slot of its parent a node occupies.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl<K> Node<K> {
    /// Creates a detached leaf.
    pub(crate) const fn new(key: K, value: Handle) -> Self {
        Self {
            key,
            value,
            parent: None,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub(crate) const fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub(crate) const fn value(&self) -> Handle {
        self.value
    }

    /// Consumes the node, returning its key and value handle.
    pub(crate) fn into_parts(self) -> (K, Handle) {
        (self.key, self.value)
    }

    #[inline]
    pub(crate) const fn parent(&self) -> Option<Handle> {
        self.parent
    }

    #[inline]
    pub(crate) const fn left(&self) -> Option<Handle> {
        self.left
    }

    #[inline]
    pub(crate) const fn right(&self) -> Option<Handle> {
        self.right
    }

    pub(crate) fn set_parent(&mut self, parent: Option<Handle>) {
        self.parent = parent;
    }

    pub(crate) fn set_left(&mut self, left: Option<Handle>) {
        self.left = left;
    }

    pub(crate) fn set_right(&mut self, right: Option<Handle>) {
        self.right = right;
    }

    pub(crate) fn set_child(&mut self, side: Side, child: Option<Handle>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    /// Returns the side on which `child` hangs off this node.
    ///
    /// `child` must be one of this node's children.
    pub(crate) fn side_of(&self, child: Handle) -> Side {
        if self.left == Some(child) {
            Side::Left
        } else {
            debug_assert_eq!(self.right, Some(child), "`Node::side_of()` - `child` is not a child!");
            Side::Right
        }
    }

    // While a subtree is being rebuilt its nodes form a singly linked chain in ascending key
    // order. The chain reuses the `right` slot, which is free at that point: flattening
    // clears `left`/`parent`, and building overwrites all three links.

    /// Next node of the rebuild chain.
    #[inline]
    pub(crate) const fn chain_next(&self) -> Option<Handle> {
        self.right
    }

    pub(crate) fn set_chain_next(&mut self, next: Option<Handle>) {
        self.right = next;
    }

    /// Drops `left` and `parent`, leaving only the chain link.
    pub(crate) fn detach_for_chain(&mut self) {
        self.left = None;
        self.parent = None;
    }
}
