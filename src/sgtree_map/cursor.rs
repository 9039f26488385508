use core::fmt;

use crate::comparator::OrdComparator;
use crate::raw::{Handle, RawSGTreeMap};

/// Identity of one entry in an [`SGTreeMap`](crate::SGTreeMap).
///
/// A `NodeId` stays attached to its entry through every insertion, removal and rebuild that
/// does not remove that entry. Once the entry is removed the id is stale. Using it panics
/// until a later insertion reuses the slot; from then on it names that new entry, which may
/// have any key.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) Handle);

/// A place in the in-order sequence of a map: an entry, or one past the last entry.
///
/// An entry position is only as durable as its [`NodeId`]: after the entry is removed, the
/// position may end up aliasing whichever entry is inserted into the freed slot.
///
/// # Examples
///
/// ```
/// use sgtree::{Position, SGTreeMap};
///
/// let map = SGTreeMap::from([(1, "a"), (2, "b")]);
/// let first = map.begin();
/// assert_eq!(map.get_at(first), Some((&1, &"a")));
///
/// let second = map.next_position(first);
/// let end = map.next_position(second);
/// assert_eq!(end, Position::End);
/// assert_eq!(end, map.end());
/// assert_eq!(map.prev_position(end), Some(second));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Position {
    /// The entry with this id.
    Entry(NodeId),
    /// One past the last entry. Every empty map's only position.
    End,
}

impl Position {
    pub(crate) fn from_handle(handle: Option<Handle>) -> Self {
        handle.map_or(Position::End, |handle| Position::Entry(NodeId(handle)))
    }

    pub(crate) fn handle(self) -> Option<Handle> {
        match self {
            Position::Entry(NodeId(handle)) => Some(handle),
            Position::End => None,
        }
    }

    /// Returns `true` for [`Position::End`].
    #[must_use]
    pub const fn is_end(self) -> bool {
        matches!(self, Position::End)
    }
}

/// Steps `position` one entry forward.
pub(crate) fn step_forward<K, V, C>(raw: &RawSGTreeMap<K, V, C>, position: Position, caller: &str) -> Position {
    let Some(handle) = position.handle() else {
        panic!("`{caller}` - cannot advance past the end!");
    };
    Position::from_handle(raw.successor(handle))
}

/// Steps `position` one entry back, or returns `None` at the first entry.
pub(crate) fn step_back<K, V, C>(raw: &RawSGTreeMap<K, V, C>, position: Position) -> Option<Position> {
    let previous = match position.handle() {
        Some(handle) => raw.predecessor(handle),
        None => raw.last(),
    };
    previous.map(|handle| Position::Entry(NodeId(handle)))
}

/// A read-only cursor over an [`SGTreeMap`](crate::SGTreeMap).
///
/// Created by [`SGTreeMap::cursor`](crate::SGTreeMap::cursor). It points either at an entry or at
/// the end.
///
/// # Examples
///
/// ```
/// use sgtree::SGTreeMap;
///
/// let map = SGTreeMap::from([(1, 'a'), (3, 'c'), (2, 'b')]);
/// let mut cursor = map.cursor(map.find(&2));
/// assert_eq!(cursor.key_value(), Some((&2, &'b')));
///
/// cursor.move_next();
/// assert_eq!(cursor.key(), Some(&3));
/// cursor.move_next();
/// assert!(cursor.position().is_end());
///
/// while cursor.move_prev() {}
/// assert_eq!(cursor.key(), Some(&1));
/// ```
pub struct Cursor<'a, K, V, C = OrdComparator> {
    raw: &'a RawSGTreeMap<K, V, C>,
    position: Position,
}

impl<'a, K, V, C> Cursor<'a, K, V, C> {
    pub(crate) fn new(raw: &'a RawSGTreeMap<K, V, C>, position: Position) -> Self {
        Cursor { raw, position }
    }

    /// Returns the position the cursor is at.
    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Returns the entry under the cursor, or `None` at the end.
    #[must_use]
    pub fn key_value(&self) -> Option<(&'a K, &'a V)> {
        let raw = self.raw;
        self.position.handle().map(|handle| raw.entry(handle))
    }

    #[must_use]
    pub fn key(&self) -> Option<&'a K> {
        self.key_value().map(|(key, _)| key)
    }

    #[must_use]
    pub fn value(&self) -> Option<&'a V> {
        self.key_value().map(|(_, value)| value)
    }

    /// Moves to the next entry, or to the end after the last entry.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is already at the end.
    pub fn move_next(&mut self) {
        self.position = step_forward(self.raw, self.position, "Cursor::move_next()");
    }

    /// Moves to the previous entry. From the end this is the last entry.
    ///
    /// Returns `false`, leaving the cursor where it is, when there is no previous entry.
    pub fn move_prev(&mut self) -> bool {
        match step_back(self.raw, self.position) {
            Some(position) => {
                self.position = position;
                true
            }
            None => false,
        }
    }
}

impl<K, V, C> Clone for Cursor<'_, K, V, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V, C> Copy for Cursor<'_, K, V, C> {}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for Cursor<'_, K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.key_value()).finish()
    }
}

/// A cursor over an [`SGTreeMap`](crate::SGTreeMap) that can change values and remove entries.
///
/// Created by [`SGTreeMap::cursor_mut`](crate::SGTreeMap::cursor_mut).
///
/// # Examples
///
/// ```
/// use sgtree::SGTreeMap;
///
/// let mut map: SGTreeMap<i32, i32> = (0..6).map(|k| (k, k * 10)).collect();
/// let mut cursor = map.cursor_mut(map.begin());
/// while let Some((&key, value)) = cursor.key_value_mut() {
///     if key % 2 == 0 {
///         cursor.remove_current();
///     } else {
///         *value += 1;
///         cursor.move_next();
///     }
/// }
///
/// assert_eq!(map.into_iter().collect::<Vec<_>>(), [(1, 11), (3, 31), (5, 51)]);
/// ```
pub struct CursorMut<'a, K, V, C = OrdComparator> {
    raw: &'a mut RawSGTreeMap<K, V, C>,
    position: Position,
}

impl<'a, K, V, C> CursorMut<'a, K, V, C> {
    pub(crate) fn new(raw: &'a mut RawSGTreeMap<K, V, C>, position: Position) -> Self {
        CursorMut { raw, position }
    }

    /// Returns the position the cursor is at.
    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Returns the entry under the cursor, or `None` at the end.
    #[must_use]
    pub fn key_value(&self) -> Option<(&K, &V)> {
        self.position.handle().map(|handle| self.raw.entry(handle))
    }

    /// Returns the entry under the cursor with a mutable value, or `None` at the end.
    pub fn key_value_mut(&mut self) -> Option<(&K, &mut V)> {
        let handle = self.position.handle()?;
        Some(self.raw.entry_mut(handle))
    }

    #[must_use]
    pub fn key(&self) -> Option<&K> {
        self.key_value().map(|(key, _)| key)
    }

    pub fn value_mut(&mut self) -> Option<&mut V> {
        self.key_value_mut().map(|(_, value)| value)
    }

    /// Moves to the next entry, or to the end after the last entry.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is already at the end.
    pub fn move_next(&mut self) {
        self.position = step_forward(self.raw, self.position, "CursorMut::move_next()");
    }

    /// Moves to the previous entry. From the end this is the last entry.
    ///
    /// Returns `false`, leaving the cursor where it is, when there is no previous entry.
    pub fn move_prev(&mut self) -> bool {
        match step_back(self.raw, self.position) {
            Some(position) => {
                self.position = position;
                true
            }
            None => false,
        }
    }

    /// Removes the entry under the cursor and moves the cursor to the entry that followed it.
    ///
    /// Returns `None`, doing nothing, at the end.
    pub fn remove_current(&mut self) -> Option<(K, V)> {
        let handle = self.position.handle()?;
        // Entry identities survive the rebuild a removal may trigger, so the successor found
        // beforehand is still the right place afterwards.
        let next = self.raw.successor(handle);
        let entry = self.raw.remove_node(handle);
        self.position = Position::from_handle(next);
        Some(entry)
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for CursorMut<'_, K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CursorMut").field(&self.key_value()).finish()
    }
}
