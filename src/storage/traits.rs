//! Storage trait

/// A string-keyed associative store
///
/// Implementations are used from behind the graph lock, so they need no
/// internal synchronization.
pub trait KeyValueStore<V> {
    /// Returns the value stored for `key`
    fn get(&self, key: &str) -> Option<&V>;

    /// Stores `value` under `key`, returning the previous value if any
    fn put(&mut self, key: String, value: V) -> Option<V>;

    /// Returns true if `key` has a value
    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of stored keys
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Visits every entry; iteration order is unspecified
    fn for_each<F>(&self, f: F)
    where
        F: FnMut(&str, &V);
}
