use super::OSRBTreeMap;
use crate::raw::RawOSRBTreeMap;

impl<K, V> OSRBTreeMap<K, V> {
    /// Creates an empty map with room for at least `capacity` entries before
    /// the node arena reallocates.
    ///
    /// This is an extension and is not part of the standard `BTreeMap` API.
    ///
    /// # Examples
    ///
    /// ```
    /// use osrb_tree::OSRBTreeMap;
    ///
    /// let map: OSRBTreeMap<i32, i32> = OSRBTreeMap::with_capacity(32);
    /// assert!(map.is_empty());
    /// assert!(map.capacity() >= 32);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        OSRBTreeMap {
            raw: RawOSRBTreeMap::with_capacity(capacity),
        }
    }

    /// Returns how many entries the map can hold before the node arena
    /// reallocates. Slots freed by removals are reused first.
    ///
    /// This is an extension and is not part of the standard `BTreeMap` API.
    ///
    /// # Examples
    ///
    /// ```
    /// use osrb_tree::OSRBTreeMap;
    ///
    /// let mut map = OSRBTreeMap::with_capacity(4);
    /// let capacity = map.capacity();
    /// for k in 0..4 {
    ///     map.insert(k, k);
    /// }
    /// map.remove(&0);
    /// map.insert(10, 10);
    /// assert_eq!(map.capacity(), capacity);
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
