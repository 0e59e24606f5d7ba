//! Bounded key/value cache with least-recently-touched eviction.
//!
//! Both `get` and `set` refresh an entry's recency. When a new key is
//! inserted into a full cache, the least recently touched entry is evicted
//! first. Overwriting an existing key never evicts anything. `has` is a
//! pure membership test and leaves the recency order alone.

use std::hash::Hash;
use std::num::NonZeroUsize;

use lru::LruCache;
use tokio::sync::RwLock;

/// Default number of entries kept by the page cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 50;

/// Fixed-capacity cache with LRU eviction.
///
/// The cache is thread-safe and can be shared across async tasks via `Arc`.
///
/// # Example
///
/// ```
/// use slide_carousel::cache::BoundedCache;
///
/// #[tokio::main]
/// async fn main() {
///     let cache = BoundedCache::with_capacity(2);
///     cache.set("a", 1).await;
///     cache.set("b", 2).await;
///
///     // Touch "a" so that "b" becomes the eviction candidate
///     assert_eq!(cache.get(&"a").await, Some(1));
///     cache.set("c", 3).await;
///
///     assert!(cache.has(&"a").await);
///     assert!(!cache.has(&"b").await);
/// }
/// ```
pub struct BoundedCache<K: Hash + Eq, V> {
    entries: RwLock<LruCache<K, V>>,
    max_size: usize,
}

impl<K: Hash + Eq, V: Clone> BoundedCache<K, V> {
    /// Create a cache holding [`DEFAULT_CACHE_CAPACITY`] entries.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// Create a cache holding at most `max_size` entries.
    ///
    /// A capacity of zero is raised to one.
    pub fn with_capacity(max_size: usize) -> Self {
        let capacity = NonZeroUsize::new(max_size).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: RwLock::new(LruCache::new(capacity)),
            max_size: capacity.get(),
        }
    }

    /// Get a value, marking it most recently used.
    pub async fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.write().await;
        entries.get(key).cloned()
    }

    /// Insert or overwrite a value, marking it most recently used.
    ///
    /// Returns the evicted `(key, value)` pair when inserting a new key
    /// pushed the least recently used entry out.
    pub async fn set(&self, key: K, value: V) -> Option<(K, V)> {
        let mut entries = self.entries.write().await;
        if entries.contains(&key) {
            entries.put(key, value);
            return None;
        }
        entries.push(key, value)
    }

    /// Check membership without updating recency.
    pub async fn has(&self, key: &K) -> bool {
        let entries = self.entries.read().await;
        entries.contains(key)
    }

    /// Remove a value, returning it if present.
    pub async fn delete(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.write().await;
        entries.pop(key)
    }

    /// Remove every entry.
    pub async fn clear(&self) {
        let mut entries = self.entries.write().await;
        entries.clear();
    }

    /// Current number of entries.
    pub async fn size(&self) -> usize {
        let entries = self.entries.read().await;
        entries.len()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.max_size
    }
}

impl<K: Hash + Eq, V: Clone> Default for BoundedCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
