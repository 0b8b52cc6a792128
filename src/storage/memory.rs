use crate::storage::KeyValueStore;
use std::collections::HashMap;

/// In-memory [`KeyValueStore`] backed by a `HashMap`
#[derive(Debug, Clone)]
pub struct MemoryStore<V> {
    entries: HashMap<String, V>,
}

impl<V> MemoryStore<V> {
    /// Creates a store with room for `capacity` keys before rehashing
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
        }
    }

    /// Keys the store can hold without rehashing
    pub fn capacity(&self) -> usize {
        self.entries.capacity()
    }
}

impl<V> Default for MemoryStore<V> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl<V> KeyValueStore<V> for MemoryStore<V> {
    fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    fn put(&mut self, key: String, value: V) -> Option<V> {
        self.entries.insert(key, value)
    }

    fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&str, &V),
    {
        for (key, value) in &self.entries {
            f(key, value);
        }
    }
}
