use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::ops::Index;

use crate::alpha::Alpha;
use crate::comparator::{Comparator, OrdComparator};
use crate::raw::{Arena, Handle, InsertResult, Node, RawSGTreeMap, successor, predecessor};

mod capacity;
mod cursor;

pub use cursor::{Cursor, CursorMut, NodeId, Position};

/// An ordered map based on a [scapegoat tree].
///
/// A scapegoat tree is a binary search tree that keeps no balance information in its nodes.
/// After an insertion lands too deep (deeper than `log_{1/alpha}(len)`), the subtree of the
/// nearest ancestor whose children are out of proportion is rebuilt into a perfectly balanced
/// one; after removals have shrunk the map below `alpha` of its recent high-water mark, the
/// whole tree is rebuilt. The balance factor `alpha` is an [`Alpha`] in `(0.5, 1)` chosen per
/// map, `0.57` by default.
///
/// Keys are ordered by a per-map [`Comparator`]. The default, [`OrdComparator`], uses the
/// key type's [`Ord`] implementation; any `Fn(&K, &K) -> Ordering` works as well.
///
/// Iterators obtained from functions such as [`SGTreeMap::iter`], [`SGTreeMap::into_iter`],
/// [`SGTreeMap::values`], or [`SGTreeMap::keys`] produce their items in key order, and take
/// amortized constant time per item returned.
///
/// It is a logic error for a key to be modified in such a way that the key's ordering relative to
/// any other key, as determined by the comparator, changes while it is in the map. The behavior
/// resulting from such a logic error is not specified, but will be encapsulated to the
/// `SGTreeMap` that observed the logic error and not result in undefined behavior.
///
/// Two maps are equal (`==`) only if they hold the same entries *and* the same tree shape: at
/// every in-order slot the parent entry must match as well. A [`Clone`] is always equal to its
/// source; two maps built from the same entries in different orders generally are not.
///
/// # Examples
///
/// ```
/// use sgtree::SGTreeMap;
///
/// // type inference lets us omit an explicit type signature (which
/// // would be `SGTreeMap<&str, &str>` in this example).
/// let mut movie_reviews = SGTreeMap::new();
///
/// // review some movies.
/// movie_reviews.insert("Office Space",       "Deals with real issues in the workplace.");
/// movie_reviews.insert("Pulp Fiction",       "Masterpiece.");
/// movie_reviews.insert("The Godfather",      "Very enjoyable.");
/// movie_reviews.insert("The Blues Brothers", "Eye lyked it a lot.");
///
/// // check for a specific one.
/// if !movie_reviews.contains_key(&"Les Miserables") {
///     println!("We've got {} reviews, but Les Miserables ain't one.",
///              movie_reviews.len());
/// }
///
/// // oops, this review has a lot of spelling mistakes, let's delete it.
/// movie_reviews.remove(&"The Blues Brothers");
///
/// // look up the values associated with some keys.
/// let to_find = ["Up!", "Office Space"];
/// for movie in &to_find {
///     match movie_reviews.get(movie) {
///        Some(review) => println!("{movie}: {review}"),
///        None => println!("{movie} is unreviewed.")
///     }
/// }
///
/// // Look up the value for a key (will panic if the key is not found).
/// println!("Movie review: {}", movie_reviews[&"Office Space"]);
///
/// // iterate over everything.
/// for (movie, review) in &movie_reviews {
///     println!("{movie}: \"{review}\"");
/// }
/// ```
///
/// An `SGTreeMap` with a known list of items can be initialized from an array:
///
/// ```
/// use sgtree::SGTreeMap;
///
/// let solar_distance = SGTreeMap::from([
///     ("Mercury", 0.4),
///     ("Venus", 0.7),
///     ("Earth", 1.0),
///     ("Mars", 1.5),
/// ]);
/// ```
///
/// [scapegoat tree]: https://en.wikipedia.org/wiki/Scapegoat_tree
pub struct SGTreeMap<K, V, C = OrdComparator> {
    raw: RawSGTreeMap<K, V, C>,
}

/// An iterator over the entries of an `SGTreeMap`.
///
/// This `struct` is created by the [`iter`] method on [`SGTreeMap`]. See its
/// documentation for more.
///
/// # Examples
///
/// ```
/// use sgtree::SGTreeMap;
///
/// let map = SGTreeMap::from([(1, "a"), (2, "b")]);
/// let mut iter = map.iter();
/// assert_eq!(iter.next(), Some((&1, &"a")));
/// assert_eq!(iter.next_back(), Some((&2, &"b")));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`iter`]: SGTreeMap::iter
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Iter<'a, K, V> {
    arenas: Option<(&'a Arena<Node<K>>, &'a Arena<V>)>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
}

/// A mutable iterator over the entries of an `SGTreeMap`.
///
/// This `struct` is created by the [`iter_mut`] method on [`SGTreeMap`]. See its
/// documentation for more.
///
/// # Examples
///
/// ```
/// use sgtree::SGTreeMap;
///
/// let mut map = SGTreeMap::from([(1, 10), (2, 20)]);
/// for (_, value) in map.iter_mut() {
///     *value += 1;
/// }
/// let values: Vec<_> = map.values().copied().collect();
/// assert_eq!(values, [11, 21]);
/// ```
///
/// [`iter_mut`]: SGTreeMap::iter_mut
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IterMut<'a, K: 'a, V: 'a> {
    nodes: Option<&'a Arena<Node<K>>>,
    /// Base of the value slots. Each live handle is yielded at most once, so the `&mut V`
    /// handed out never alias.
    values: *mut Option<V>,
    front: Option<Handle>,
    back: Option<Handle>,
    remaining: usize,
    _marker: PhantomData<&'a mut V>,
}

// SAFETY: IterMut behaves as a sequence of (&K, &mut V).
unsafe impl<K: Sync, V: Send> Send for IterMut<'_, K, V> {}
unsafe impl<K: Sync, V: Sync> Sync for IterMut<'_, K, V> {}

/// An owning iterator over the entries of an `SGTreeMap`, sorted by key.
///
/// This `struct` is created by the [`into_iter`] method on [`SGTreeMap`]
/// (provided by the [`IntoIterator`] trait). See its documentation for more.
///
/// # Examples
///
/// ```
/// use sgtree::SGTreeMap;
///
/// let map = SGTreeMap::from([(1, "a"), (2, "b")]);
/// let mut iter = map.into_iter();
/// assert_eq!(iter.next(), Some((1, "a")));
/// assert_eq!(iter.next_back(), Some((2, "b")));
/// assert_eq!(iter.next(), None);
/// ```
///
/// [`into_iter`]: IntoIterator::into_iter
pub struct IntoIter<K, V> {
    inner: alloc::vec::IntoIter<(K, V)>,
}

/// An iterator over the keys of an `SGTreeMap`.
///
/// This `struct` is created by the [`keys`] method on [`SGTreeMap`].
///
/// [`keys`]: SGTreeMap::keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Keys<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// An iterator over the values of an `SGTreeMap`.
///
/// This `struct` is created by the [`values`] method on [`SGTreeMap`].
///
/// [`values`]: SGTreeMap::values
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Values<'a, K, V> {
    inner: Iter<'a, K, V>,
}

/// A mutable iterator over the values of an `SGTreeMap`.
///
/// This `struct` is created by the [`values_mut`] method on [`SGTreeMap`].
///
/// [`values_mut`]: SGTreeMap::values_mut
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct ValuesMut<'a, K, V> {
    inner: IterMut<'a, K, V>,
}

/// An owning iterator over the keys of an `SGTreeMap`.
///
/// This `struct` is created by the [`into_keys`] method on [`SGTreeMap`].
///
/// [`into_keys`]: SGTreeMap::into_keys
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IntoKeys<K, V> {
    inner: IntoIter<K, V>,
}

/// An owning iterator over the values of an `SGTreeMap`.
///
/// This `struct` is created by the [`into_values`] method on [`SGTreeMap`].
///
/// [`into_values`]: SGTreeMap::into_values
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct IntoValues<K, V> {
    inner: IntoIter<K, V>,
}

impl<K, V> SGTreeMap<K, V> {
    /// Makes a new, empty `SGTreeMap` ordered by [`Ord`] with the default balance factor.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use sgtree::SGTreeMap;
    ///
    /// let mut map = SGTreeMap::new();
    ///
    /// // entries can now be inserted into the empty map
    /// map.insert(1, "a");
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn new() -> SGTreeMap<K, V> {
        SGTreeMap {
            raw: RawSGTreeMap::new(Alpha::DEFAULT, OrdComparator),
        }
    }

    /// Makes a new, empty `SGTreeMap` ordered by [`Ord`] with the given balance factor.
    #[must_use]
    pub const fn with_alpha(alpha: Alpha) -> SGTreeMap<K, V> {
        SGTreeMap {
            raw: RawSGTreeMap::new(alpha, OrdComparator),
        }
    }
}

impl<K, V, C> SGTreeMap<K, V, C> {
    /// Makes a new, empty `SGTreeMap` ordered by `comparator` with the default balance factor.
    ///
    /// # Examples
    ///
    /// ```
    /// use sgtree::SGTreeMap;
    ///
    /// let mut by_length = SGTreeMap::with_comparator(|a: &&str, b: &&str| a.len().cmp(&b.len()));
    /// by_length.insert("three", 3);
    /// by_length.insert("one", 1);
    /// // Same length as "one", so it counts as the same key.
    /// by_length.insert("two", 2);
    ///
    /// assert_eq!(by_length.len(), 2);
    /// assert_eq!(by_length.get(&"six"), Some(&2));
    /// ```
    #[must_use]
    pub const fn with_comparator(comparator: C) -> Self {
        SGTreeMap {
            raw: RawSGTreeMap::new(Alpha::DEFAULT, comparator),
        }
    }

    /// Makes a new, empty `SGTreeMap` with both the balance factor and the ordering chosen.
    #[must_use]
    pub const fn with_alpha_and_comparator(alpha: Alpha, comparator: C) -> Self {
        SGTreeMap {
            raw: RawSGTreeMap::new(alpha, comparator),
        }
    }

    /// Returns the balance factor of the map.
    #[must_use]
    pub const fn alpha(&self) -> Alpha {
        self.raw.alpha()
    }

    /// Clears the map, removing all elements. The balance factor and comparator are kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use sgtree::SGTreeMap;
    ///
    /// let mut a = SGTreeMap::new();
    /// a.insert(1, "a");
    /// a.clear();
    /// assert!(a.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n) to drop the entries.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns the first key-value pair in the map.
    /// The key in this pair is the minimum key in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use sgtree::SGTreeMap;
    ///
    /// let mut map = SGTreeMap::new();
    /// assert_eq!(map.first_key_value(), None);
    /// map.insert(1, "b");
    /// map.insert(2, "a");
    /// assert_eq!(map.first_key_value(), Some((&1, &"b")));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.raw.first().map(|node| self.raw.entry(node))
    }

    /// Returns the last key-value pair in the map.
    /// The key in this pair is the maximum key in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use sgtree::SGTreeMap;
    ///
    /// let mut map = SGTreeMap::new();
    /// map.insert(1, "b");
    /// map.insert(2, "a");
    /// assert_eq!(map.last_key_value(), Some((&2, &"a")));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.raw.last().map(|node| self.raw.entry(node))
    }

    /// Removes and returns the first element in the map.
    /// The key of this element is the minimum key that was in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use sgtree::SGTreeMap;
    ///
    /// let mut map = SGTreeMap::new();
    /// map.insert(1, "a");
    /// map.insert(2, "b");
    /// while let Some((key, _val)) = map.pop_first() {
    ///     assert!(map.iter().all(|(k, _v)| *k > key));
    /// }
    /// assert!(map.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) amortized.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        self.raw.pop_first()
    }

    /// Removes and returns the last element in the map.
    /// The key of this element is the maximum key that was in the map.
    ///
    /// # Complexity
    ///
    /// O(log n) amortized.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        self.raw.pop_last()
    }

    /// Retains only the elements specified by the predicate.
    ///
    /// In other words, remove all pairs `(k, v)` for which `f(&k, &mut v)` returns `false`.
    /// The elements are visited in ascending key order.
    ///
    /// # Examples
    ///
    /// ```
    /// use sgtree::SGTreeMap;
    ///
    /// let mut map: SGTreeMap<i32, i32> = (0..8).map(|x| (x, x * 10)).collect();
    /// // Keep only the elements with even-numbered keys.
    /// map.retain(|&k, _| k % 2 == 0);
    /// assert!(map.into_iter().eq(vec![(0, 0), (2, 20), (4, 40), (6, 60)]));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n log n) in the worst case (when many elements are removed).
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        // Removal may rebuild the tree but never invalidates the other handles.
        for node in self.raw.handles_in_order() {
            let (key, value) = self.raw.entry_mut(node);
            if !f(key, value) {
                self.raw.remove_node(node);
            }
        }
    }

    /// Returns the number of levels in the tree: `0` when empty, `1` for a single entry.
    ///
    /// The scapegoat rules keep this within `log_{1/alpha}(n) + 2` for a map that has held at
    /// most `n` entries since its last rebuild.
    ///
    /// # Examples
    ///
    /// ```
    /// use sgtree::SGTreeMap;
    ///
    /// let map: SGTreeMap<i32, ()> = (0..100).map(|k| (k, ())).collect();
    /// assert!(map.height() <= 10);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n)
    #[must_use]
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Returns the position of the first entry, or [`Position::End`] if the map is empty.
    #[must_use]
    pub fn begin(&self) -> Position {
        Position::from_handle(self.raw.first())
    }

    /// Returns [`Position::End`].
    #[must_use]
    pub fn end(&self) -> Position {
        Position::End
    }

    /// Returns the position after `position`.
    ///
    /// # Panics
    ///
    /// Panics if `position` is [`Position::End`] or names a removed entry.
    ///
    /// A position whose entry was removed is stale. Until a later insertion reuses its slot,
    /// using it panics; afterwards it silently names that newer entry instead.
    ///
    /// # Complexity
    ///
    /// O(log n) amortized over a full traversal.
    #[must_use]
    pub fn next_position(&self, position: Position) -> Position {
        cursor::step_forward(&self.raw, position, "SGTreeMap::next_position()")
    }

    /// Returns the position before `position`, or `None` if `position` is the first entry.
    ///
    /// The position before [`Position::End`] is the last entry.
    ///
    /// # Panics
    ///
    /// Panics if `position` names a removed entry.
    ///
    /// A position whose entry was removed is stale. Until a later insertion reuses its slot,
    /// using it panics; afterwards it silently names that newer entry instead.
    #[must_use]
    pub fn prev_position(&self, position: Position) -> Option<Position> {
        cursor::step_back(&self.raw, position)
    }

    /// Returns the entry at `position`, or `None` at the end.
    ///
    /// # Examples
    ///
    /// ```
    /// use sgtree::SGTreeMap;
    ///
    /// let mut map = SGTreeMap::from([(1, "a"), (2, "b")]);
    /// let stale = map.find(&1);
    /// map.remove_at(stale);
    ///
    /// // The freed slot goes to the next new entry, and the stale position with it.
    /// map.insert(10, "j");
    /// assert_eq!(map.get_at(stale), Some((&10, &"j")));
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `position` names a removed entry.
    ///
    /// A position whose entry was removed is stale. Until a later insertion reuses its slot,
    /// using it panics; afterwards it silently names that newer entry instead.
    #[must_use]
    pub fn get_at(&self, position: Position) -> Option<(&K, &V)> {
        position.handle().map(|node| self.raw.entry(node))
    }

    /// Returns the entry at `position` with a mutable value, or `None` at the end.
    ///
    /// # Panics
    ///
    /// Panics if `position` names a removed entry.
    ///
    /// A position whose entry was removed is stale. Until a later insertion reuses its slot,
    /// using it panics; afterwards it silently names that newer entry instead.
    pub fn get_at_mut(&mut self, position: Position) -> Option<(&K, &mut V)> {
        let node = position.handle()?;
        Some(self.raw.entry_mut(node))
    }

    /// Removes the entry at `position` and returns it.
    ///
    /// # Examples
    ///
    /// ```
    /// use sgtree::SGTreeMap;
    ///
    /// let mut map = SGTreeMap::from([(1, "a"), (2, "b"), (3, "c")]);
    /// let second = map.next_position(map.begin());
    /// assert_eq!(map.remove_at(second), (2, "b"));
    /// assert_eq!(map.len(), 2);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `position` is [`Position::End`] or names a removed entry.
    ///
    /// A position whose entry was removed is stale. Until a later insertion reuses its slot,
    /// using it panics; afterwards it silently names that newer entry instead.
    ///
    /// # Complexity
    ///
    /// O(log n) amortized.
    pub fn remove_at(&mut self, position: Position) -> (K, V) {
        let Some(node) = position.handle() else {
            panic!("`SGTreeMap::remove_at()` - `position` is the end!");
        };
        self.raw.remove_node(node)
    }

    /// Returns a read-only cursor at `position`.
    #[must_use]
    pub fn cursor(&self, position: Position) -> Cursor<'_, K, V, C> {
        Cursor::new(&self.raw, position)
    }

    /// Returns a cursor at `position` that can modify values and remove entries.
    pub fn cursor_mut(&mut self, position: Position) -> CursorMut<'_, K, V, C> {
        CursorMut::new(&mut self.raw, position)
    }

    /// Creates a consuming iterator visiting all the keys, in sorted order.
    /// The map cannot be used after calling this.
    ///
    /// # Examples
    ///
    /// ```
    /// use sgtree::SGTreeMap;
    ///
    /// let mut a = SGTreeMap::new();
    /// a.insert(2, "b");
    /// a.insert(1, "a");
    ///
    /// let keys: Vec<i32> = a.into_keys().collect();
    /// assert_eq!(keys, [1, 2]);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n) to drain the tree; each iteration step is O(1).
    pub fn into_keys(mut self) -> IntoKeys<K, V> {
        IntoKeys {
            inner: IntoIter {
                inner: self.raw.drain_to_vec().into_iter(),
            },
        }
    }

    /// Creates a consuming iterator visiting all the values, in order by key.
    /// The map cannot be used after calling this.
    ///
    /// # Complexity
    ///
    /// O(n) to drain the tree; each iteration step is O(1).
    pub fn into_values(mut self) -> IntoValues<K, V> {
        IntoValues {
            inner: IntoIter {
                inner: self.raw.drain_to_vec().into_iter(),
            },
        }
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use sgtree::SGTreeMap;
    ///
    /// let mut map = SGTreeMap::new();
    /// map.insert(3, "c");
    /// map.insert(2, "b");
    /// map.insert(1, "a");
    ///
    /// for (key, value) in map.iter() {
    ///     println!("{key}: {value}");
    /// }
    ///
    /// let (first_key, first_value) = map.iter().next().unwrap();
    /// assert_eq!((*first_key, *first_value), (1, "a"));
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1) to create the iterator; each iteration step is O(1) amortized.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            arenas: Some(self.raw.arenas()),
            front: self.raw.first(),
            back: self.raw.last(),
            remaining: self.raw.len(),
        }
    }

    /// Gets a mutable iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use sgtree::SGTreeMap;
    ///
    /// let mut map = SGTreeMap::from([
    ///    ("a", 1),
    ///    ("b", 2),
    ///    ("c", 3),
    /// ]);
    ///
    /// // add 10 to the value if the key isn't "a"
    /// for (key, value) in map.iter_mut() {
    ///     if key != &"a" {
    ///         *value += 10;
    ///     }
    /// }
    /// assert_eq!(map[&"c"], 13);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1) to create the iterator; each iteration step is O(1) amortized.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        let front = self.raw.first();
        let back = self.raw.last();
        let remaining = self.raw.len();
        let (nodes, values) = self.raw.arenas_mut();
        IterMut {
            nodes: Some(nodes),
            values,
            front,
            back,
            remaining,
            _marker: PhantomData,
        }
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    ///
    /// # Examples
    ///
    /// ```
    /// use sgtree::SGTreeMap;
    ///
    /// let mut a = SGTreeMap::new();
    /// a.insert(2, "b");
    /// a.insert(1, "a");
    ///
    /// let keys: Vec<_> = a.keys().cloned().collect();
    /// assert_eq!(keys, [1, 2]);
    /// ```
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys {
            inner: self.iter(),
        }
    }

    /// Gets an iterator over the values of the map, in order by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use sgtree::SGTreeMap;
    ///
    /// let mut a = SGTreeMap::new();
    /// a.insert(1, "hello");
    /// a.insert(2, "goodbye");
    ///
    /// let values: Vec<&str> = a.values().cloned().collect();
    /// assert_eq!(values, ["hello", "goodbye"]);
    /// ```
    pub fn values(&self) -> Values<'_, K, V> {
        Values {
            inner: self.iter(),
        }
    }

    /// Gets a mutable iterator over the values of the map, in order by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use sgtree::SGTreeMap;
    ///
    /// let mut a = SGTreeMap::new();
    /// a.insert(1, String::from("hello"));
    /// a.insert(2, String::from("goodbye"));
    ///
    /// for value in a.values_mut() {
    ///     value.push_str("!");
    /// }
    ///
    /// let values: Vec<String> = a.values().cloned().collect();
    /// assert_eq!(values, [String::from("hello!"),
    ///                     String::from("goodbye!")]);
    /// ```
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Returns the number of elements in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use sgtree::SGTreeMap;
    ///
    /// let mut a = SGTreeMap::new();
    /// assert_eq!(a.len(), 0);
    /// a.insert(1, "a");
    /// assert_eq!(a.len(), 1);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map contains no elements.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

impl<K, V, C: Comparator<K>> SGTreeMap<K, V, C> {
    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use sgtree::SGTreeMap;
    ///
    /// let mut map = SGTreeMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.get(&1), Some(&"a"));
    /// assert_eq!(map.get(&2), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get(&self, key: &K) -> Option<&V> {
        self.raw.get(key)
    }

    /// Returns the key-value pair corresponding to the supplied key. This is
    /// potentially useful for key types where non-identical keys can be considered equal.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.raw.get_key_value(key)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use sgtree::SGTreeMap;
    ///
    /// let mut map = SGTreeMap::new();
    /// map.insert(1, "a");
    /// if let Some(x) = map.get_mut(&1) {
    ///     *x = "b";
    /// }
    /// assert_eq!(map[&1], "b");
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.raw.get_mut(key)
    }

    /// Returns `true` if the map contains a value for the specified key.
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn contains_key(&self, key: &K) -> bool {
        self.raw.search(key).is_some()
    }

    /// Returns the position of `key`, or [`Position::End`] if it is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use sgtree::{Position, SGTreeMap};
    ///
    /// let map = SGTreeMap::from([(1, "a"), (2, "b")]);
    /// assert_eq!(map.get_at(map.find(&2)), Some((&2, &"b")));
    /// assert_eq!(map.find(&3), Position::End);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n)
    pub fn find(&self, key: &K) -> Position {
        Position::from_handle(self.raw.search(key))
    }

    /// Inserts a key-value pair into the map.
    ///
    /// Returns the position of the entry for `key` and whether the map changed:
    ///
    /// - a new key is inserted: `true`;
    /// - the key is present with an equal value: nothing happens, `false`;
    /// - the key is present with a different value: the value is replaced, `true`.
    ///
    /// The key already in the map is kept in the latter two cases. Use [`upsert`] to get the
    /// displaced value back instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use sgtree::SGTreeMap;
    ///
    /// let mut map = SGTreeMap::new();
    /// let (position, changed) = map.insert(37, "a");
    /// assert!(changed);
    /// assert_eq!(map.get_at(position), Some((&37, &"a")));
    ///
    /// assert_eq!(map.insert(37, "a"), (position, false));
    /// assert_eq!(map.insert(37, "b"), (position, true));
    /// assert_eq!(map[&37], "b");
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) amortized.
    ///
    /// [`upsert`]: SGTreeMap::upsert
    pub fn insert(&mut self, key: K, value: V) -> (Position, bool)
    where
        V: PartialEq,
    {
        match self.raw.insert(key, value) {
            InsertResult::Inserted(node) => (Position::Entry(NodeId(node)), true),
            InsertResult::Occupied { node, value } => {
                let slot = self.raw.entry_mut(node).1;
                let changed = *slot != value;
                if changed {
                    *slot = value;
                }
                (Position::Entry(NodeId(node)), changed)
            }
        }
    }

    /// Inserts a key-value pair into the map, replacing and returning any previous value.
    ///
    /// The key already in the map is kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use sgtree::SGTreeMap;
    ///
    /// let mut map = SGTreeMap::new();
    /// assert_eq!(map.upsert(37, "a"), None);
    /// assert_eq!(map.upsert(37, "b"), Some("a"));
    /// assert_eq!(map[&37], "b");
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) amortized.
    pub fn upsert(&mut self, key: K, value: V) -> Option<V> {
        match self.raw.insert(key, value) {
            InsertResult::Inserted(_) => None,
            InsertResult::Occupied { node, value } => {
                Some(core::mem::replace(self.raw.entry_mut(node).1, value))
            }
        }
    }

    /// Removes a key from the map, returning the value at the key if the key
    /// was previously in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use sgtree::SGTreeMap;
    ///
    /// let mut map = SGTreeMap::new();
    /// map.insert(1, "a");
    /// assert_eq!(map.remove(&1), Some("a"));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n) amortized.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.raw.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes a key from the map, returning the stored key and value if the key
    /// was previously in the map.
    ///
    /// # Complexity
    ///
    /// O(log n) amortized.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        self.raw.remove_entry(key)
    }
}

impl<K: Clone, V: Clone, C: Clone> Clone for SGTreeMap<K, V, C> {
    /// Copies the map entry for entry and node for node: the clone has the same shape, so it
    /// compares equal to `self`.
    fn clone(&self) -> Self {
        SGTreeMap {
            raw: self.raw.clone(),
        }
    }
}

impl<K: Hash, V: Hash, C> Hash for SGTreeMap<K, V, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for (k, v) in self {
            k.hash(state);
            v.hash(state);
        }
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for SGTreeMap<K, V, C> {
    /// Structural equality: equal entries in equal order, with equal parent entries.
    ///
    /// ```
    /// use sgtree::SGTreeMap;
    ///
    /// let mut a = SGTreeMap::new();
    /// a.insert(1, ());
    /// a.insert(2, ());
    ///
    /// let mut b = SGTreeMap::new();
    /// b.insert(2, ());
    /// b.insert(1, ());
    ///
    /// assert!(a.iter().eq(b.iter()));
    /// assert_ne!(a, b);
    /// assert_eq!(a, a.clone());
    /// ```
    fn eq(&self, other: &Self) -> bool {
        self.raw.structurally_eq(&other.raw)
    }
}

impl<K: Eq, V: Eq, C> Eq for SGTreeMap<K, V, C> {}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for SGTreeMap<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C: Default> Default for SGTreeMap<K, V, C> {
    fn default() -> Self {
        SGTreeMap::with_comparator(C::default())
    }
}

impl<K, V, C: Comparator<K> + Default> FromIterator<(K, V)> for SGTreeMap<K, V, C> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = SGTreeMap::default();
        map.extend(iter);
        map
    }
}

impl<K, V, C: Comparator<K>> Extend<(K, V)> for SGTreeMap<K, V, C> {
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (k, v) in iter {
            self.upsert(k, v);
        }
    }
}

impl<'a, K: Copy, V: Copy, C: Comparator<K>> Extend<(&'a K, &'a V)> for SGTreeMap<K, V, C> {
    fn extend<T: IntoIterator<Item = (&'a K, &'a V)>>(&mut self, iter: T) {
        for (&k, &v) in iter {
            self.upsert(k, v);
        }
    }
}

impl<'a, K, V, C> IntoIterator for &'a SGTreeMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V, C> IntoIterator for &'a mut SGTreeMap<K, V, C> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> IterMut<'a, K, V> {
        self.iter_mut()
    }
}

impl<K, V, C> IntoIterator for SGTreeMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    /// Gets an owning iterator over the entries of the map, sorted by key.
    ///
    /// # Examples
    ///
    /// ```
    /// use sgtree::SGTreeMap;
    ///
    /// let map = SGTreeMap::from([(2, "b"), (1, "a")]);
    /// let mut iter = map.into_iter();
    /// assert_eq!(iter.next(), Some((1, "a")));
    /// assert_eq!(iter.next_back(), Some((2, "b")));
    /// ```
    fn into_iter(mut self) -> IntoIter<K, V> {
        IntoIter {
            inner: self.raw.drain_to_vec().into_iter(),
        }
    }
}

impl<K, V, C: Comparator<K>> Index<&K> for SGTreeMap<K, V, C> {
    type Output = V;

    /// Returns a reference to the value corresponding to the supplied key.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the `SGTreeMap`.
    fn index(&self, key: &K) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K: Ord, V, const N: usize> From<[(K, V); N]> for SGTreeMap<K, V> {
    /// Converts a `[(K, V); N]` into an `SGTreeMap<K, V>`. A later pair overwrites an earlier
    /// one with the same key.
    fn from(arr: [(K, V); N]) -> Self {
        arr.into_iter().collect()
    }
}

impl<'a, K: 'a, V: 'a> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let (nodes, values) = self.arenas?;
        let handle = self.front?;
        self.remaining -= 1;
        self.front = successor(nodes, handle);

        let node = nodes.get(handle);
        Some((node.key(), values.get(node.value())))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    fn last(mut self) -> Option<Self::Item> {
        self.next_back()
    }
}

impl<'a, K: 'a, V: 'a> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let (nodes, values) = self.arenas?;
        let handle = self.back?;
        self.remaining -= 1;
        self.back = predecessor(nodes, handle);

        let node = nodes.get(handle);
        Some((node.key(), values.get(node.value())))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<K, V> Default for Iter<'_, K, V> {
    /// Creates an empty `sgtree_map::Iter`.
    ///
    /// ```
    /// # use sgtree::sgtree_map;
    /// let iter: sgtree_map::Iter<'_, u8, u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        Iter {
            arenas: None,
            front: None,
            back: None,
            remaining: 0,
        }
    }
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            arenas: self.arenas,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> IterMut<'a, K, V> {
    /// Hands out the value of `node`.
    ///
    /// # Safety
    ///
    /// `node` must be a live entry of the map this iterator borrows, and must not have been
    /// yielded before.
    unsafe fn value_of(&self, node: &Node<K>) -> &'a mut V {
        // SAFETY: live value handles index initialized slots below the slot count, and the
        // map stays mutably borrowed for `'a`, so the arena cannot reallocate. The caller
        // guarantees this slot has not been handed out already.
        let slot = unsafe { &mut *self.values.add(node.value().to_index()) };
        slot.as_mut().expect("`IterMut::value_of()` - value slot is empty!")
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let nodes = self.nodes?;
        let handle = self.front?;
        self.remaining -= 1;
        self.front = successor(nodes, handle);

        let node = nodes.get(handle);
        // SAFETY: front and back walk towards each other and `remaining` stops them before
        // they cross, so every handle is yielded once.
        let value = unsafe { self.value_of(node) };
        Some((node.key(), value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }

    fn last(mut self) -> Option<Self::Item> {
        self.next_back()
    }
}

impl<K, V> DoubleEndedIterator for IterMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let nodes = self.nodes?;
        let handle = self.back?;
        self.remaining -= 1;
        self.back = predecessor(nodes, handle);

        let node = nodes.get(handle);
        // SAFETY: Same as in next().
        let value = unsafe { self.value_of(node) };
        Some((node.key(), value))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for IterMut<'_, K, V> {}

impl<K, V> fmt::Debug for IterMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut").field("remaining", &self.remaining).finish()
    }
}

impl<K, V> Default for IterMut<'_, K, V> {
    /// Creates an empty `sgtree_map::IterMut`.
    ///
    /// ```
    /// # use sgtree::sgtree_map;
    /// let iter: sgtree_map::IterMut<'_, u8, u8> = Default::default();
    /// assert_eq!(iter.len(), 0);
    /// ```
    fn default() -> Self {
        IterMut {
            nodes: None,
            values: core::ptr::null_mut(),
            front: None,
            back: None,
            remaining: 0,
            _marker: PhantomData,
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoIter<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for IntoIter<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.as_slice()).finish()
    }
}

impl<K, V> Default for IntoIter<K, V> {
    fn default() -> Self {
        IntoIter {
            inner: alloc::vec::Vec::new().into_iter(),
        }
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<K: fmt::Debug, V> fmt::Debug for Keys<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<K, V> Default for Keys<'_, K, V> {
    fn default() -> Self {
        Keys {
            inner: Iter::default(),
        }
    }
}

impl<K, V> Clone for Keys<'_, K, V> {
    fn clone(&self) -> Self {
        Keys {
            inner: self.inner.clone(),
        }
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }

    fn last(mut self) -> Option<Self::Item> {
        self.next_back()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for Values<'_, K, V> {}

impl<K, V> Clone for Values<'_, K, V> {
    fn clone(&self) -> Self {
        Values {
            inner: self.inner.clone(),
        }
    }
}

impl<K, V> Default for Values<'_, K, V> {
    fn default() -> Self {
        Values {
            inner: Iter::default(),
        }
    }
}

impl<K, V: fmt::Debug> fmt::Debug for Values<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }

    fn last(mut self) -> Option<Self::Item> {
        self.next_back()
    }
}

impl<K, V> DoubleEndedIterator for ValuesMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for ValuesMut<'_, K, V> {}

impl<K, V> fmt::Debug for ValuesMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValuesMut").field("remaining", &self.inner.remaining).finish()
    }
}

impl<K, V> Default for ValuesMut<'_, K, V> {
    fn default() -> Self {
        ValuesMut {
            inner: IterMut::default(),
        }
    }
}

impl<K, V> Iterator for IntoKeys<K, V> {
    type Item = K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoKeys<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for IntoKeys<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoKeys<K, V> {}

impl<K: fmt::Debug, V> fmt::Debug for IntoKeys<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.inner.as_slice().iter().map(|(k, _)| k)).finish()
    }
}

impl<K, V> Default for IntoKeys<K, V> {
    fn default() -> Self {
        IntoKeys {
            inner: IntoIter::default(),
        }
    }
}

impl<K, V> Iterator for IntoValues<K, V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoValues<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for IntoValues<K, V> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<K, V> FusedIterator for IntoValues<K, V> {}

impl<K, V: fmt::Debug> fmt::Debug for IntoValues<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.inner.as_slice().iter().map(|(_, v)| v)).finish()
    }
}

impl<K, V> Default for IntoValues<K, V> {
    fn default() -> Self {
        IntoValues {
            inner: IntoIter::default(),
        }
    }
}
