use super::SGTreeMap;
use crate::alpha::Alpha;
use crate::comparator::OrdComparator;
use crate::raw::RawSGTreeMap;

impl<K, V> SGTreeMap<K, V> {
    /// Creates an empty map with capacity for at least `capacity` elements.
    ///
    /// This is an extension and is not part of the standard `BTreeMap` API.
    ///
    /// # Examples
    ///
    /// ```
    /// use sgtree::SGTreeMap;
    ///
    /// let map: SGTreeMap<i32, i32> = SGTreeMap::with_capacity(32);
    /// assert!(map.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        SGTreeMap {
            raw: RawSGTreeMap::with_capacity(capacity, Alpha::DEFAULT, OrdComparator),
        }
    }
}

impl<K, V, C> SGTreeMap<K, V, C> {
    /// Returns the number of entries the map can hold without reallocating.
    ///
    /// This is an extension and is not part of the standard `BTreeMap` API.
    ///
    /// # Examples
    ///
    /// ```
    /// use sgtree::SGTreeMap;
    ///
    /// let map: SGTreeMap<i32, i32> = SGTreeMap::with_capacity(32);
    /// assert_eq!(map.capacity(), 32);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(1)
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }
}
