//! Fixed-capacity cache with FIFO-by-slot eviction.

/// Capacity used when the requested size is non-positive.
pub const DEFAULT_CAPACITY: usize = 5;

/// A small bounded key→value cache.
///
/// Not an LRU: new keys go into the slot one past the last written
/// (circular), overwriting whatever occupied it, while a rewrite of an
/// existing key updates in place without moving the eviction cursor.
/// Lookup is a linear scan, which is fine at this size.
#[derive(Debug)]
pub struct BoundedCache<K, V> {
    slots: Vec<(K, V)>,
    cursor: usize,
    capacity: usize,
}

impl<K: PartialEq, V> BoundedCache<K, V> {
    /// Create a cache holding at most `capacity` entries; zero falls back
    /// to [`DEFAULT_CAPACITY`].
    pub fn new(capacity: usize) -> Self {
        let capacity = if capacity == 0 {
            DEFAULT_CAPACITY
        } else {
            capacity
        };
        Self {
            slots: Vec::with_capacity(capacity),
            cursor: 0,
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.slots.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn put(&mut self, key: K, value: V) {
        if let Some(slot) = self.slots.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
            return;
        }
        if self.slots.len() < self.capacity {
            self.slots.push((key, value));
        } else {
            self.slots[self.cursor] = (key, value);
        }
        self.cursor = (self.cursor + 1) % self.capacity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fourth_insert_evicts_oldest() {
        let mut cache = BoundedCache::new(3);
        cache.put("k1", 1);
        cache.put("k2", 2);
        cache.put("k3", 3);
        cache.put("k4", 4);

        assert_eq!(cache.get(&"k1"), None);
        assert_eq!(cache.get(&"k2"), Some(&2));
        assert_eq!(cache.get(&"k3"), Some(&3));
        assert_eq!(cache.get(&"k4"), Some(&4));
    }

    #[test]
    fn test_rewrite_updates_in_place_without_evicting() {
        let mut cache = BoundedCache::new(3);
        cache.put("k1", 1);
        cache.put("k2", 2);
        cache.put("k3", 3);
        cache.put("k2", 20);

        // Nothing was evicted and the value was replaced.
        assert_eq!(cache.get(&"k1"), Some(&1));
        assert_eq!(cache.get(&"k2"), Some(&20));
        assert_eq!(cache.get(&"k3"), Some(&3));
    }

    #[test]
    fn test_rewrite_does_not_move_eviction_cursor() {
        let mut cache = BoundedCache::new(3);
        cache.put("k1", 1);
        cache.put("k2", 2);
        cache.put("k3", 3);
        cache.put("k4", 4); // slot of k1
        cache.put("k2", 20); // in place; cursor still points at k2's slot
        cache.put("k5", 5); // evicts k2, the oldest slot

        assert_eq!(cache.get(&"k2"), None);
        assert_eq!(cache.get(&"k3"), Some(&3));
        assert_eq!(cache.get(&"k4"), Some(&4));
        assert_eq!(cache.get(&"k5"), Some(&5));
    }

    #[test]
    fn test_evicted_key_misses_on_reinsert_cycle() {
        let mut cache = BoundedCache::new(2);
        cache.put("a", 1);
        cache.put("b", 2);
        cache.put("c", 3); // evicts a
        assert_eq!(cache.get(&"a"), None);
        cache.put("a", 10); // evicts b
        assert_eq!(cache.get(&"b"), None);
        assert_eq!(cache.get(&"a"), Some(&10));
        assert_eq!(cache.get(&"c"), Some(&3));
    }

    #[test]
    fn test_zero_capacity_falls_back_to_default() {
        let cache: BoundedCache<&str, u8> = BoundedCache::new(0);
        assert_eq!(cache.capacity(), DEFAULT_CAPACITY);

        let cache: BoundedCache<&str, u8> = BoundedCache::new(1);
        assert_eq!(cache.capacity(), 1);
    }
}
