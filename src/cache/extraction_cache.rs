use lru::LruCache;
use sha2::{Digest, Sha256};
use std::num::NonZeroUsize;
use std::sync::Mutex;

/// Thread-safe LRU cache for LLM extraction responses
///
/// Caches the JSON payload returned for a given input text so repeated
/// pipeline runs over the same text avoid redundant API calls. Keys are
/// SHA-256 digests of the extraction kind plus the input, keeping entity
/// and relation responses for identical text distinct.
pub struct ExtractionCache {
    cache: Mutex<LruCache<String, String>>,
}

impl ExtractionCache {
    /// Create a new extraction cache with the specified capacity
    ///
    /// # Panics
    ///
    /// Panics if capacity is 0 (LRU cache requires non-zero capacity)
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity.max(1))
            .expect("Cache capacity must be at least 1");

        Self {
            cache: Mutex::new(LruCache::new(cap)),
        }
    }

    fn key(kind: &str, input: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(kind.as_bytes());
        hasher.update(b"\0");
        hasher.update(input.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Get a cached payload for an extraction kind and input text
    pub fn get(&self, kind: &str, input: &str) -> Option<String> {
        self.cache
            .lock()
            .unwrap()
            .get(&Self::key(kind, input))
            .cloned()
    }

    /// Store a payload for an extraction kind and input text
    pub fn put(&self, kind: &str, input: &str, payload: String) {
        self.cache
            .lock()
            .unwrap()
            .put(Self::key(kind, input), payload);
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.cache.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
