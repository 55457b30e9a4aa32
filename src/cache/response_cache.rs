//! Processed-response cache with FIFO eviction.
//!
//! Keyed by a SHA-256 digest of the semantically relevant request fields.
//! Only a bounded prefix of the context field enters the digest, so two
//! distinct long inputs sharing that prefix can collide and serve a stale
//! answer for the other request. For a coding-assistance cache that is an
//! accepted tolerance, not a bug.
//!
//! Insertion order is the only recency notion: reads never refresh an
//! entry, and the earliest-inserted entry is evicted first at capacity.
//! The struct itself is not synchronized; shared callers wrap it in a
//! mutex.

use sha2::{Digest, Sha256};
use std::collections::{HashMap, VecDeque};
use tracing::debug;

use crate::context::prepare::prefix_chars;

/// Maximum characters of the context field that enter the cache key.
const KEY_CONTEXT_PREFIX_CHARS: usize = 512;

/// Default cache capacity.
pub const DEFAULT_CAPACITY: usize = 50;

/// Bounded key → processed-text map with FIFO eviction.
pub struct ResponseCache {
    entries: HashMap<String, String>,
    /// Key insertion order (front = oldest, back = newest).
    order: VecDeque<String>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl ResponseCache {
    /// Create a cache with the given capacity (clamped to a minimum of 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            capacity,
            hits: 0,
            misses: 0,
        }
    }

    /// Build a deterministic cache key from the request fields.
    ///
    /// Uses length-prefixed encoding so field boundaries cannot collide
    /// (`context="a", query="bc"` vs `context="ab", query="c"`). The
    /// context is cut to [`KEY_CONTEXT_PREFIX_CHARS`] characters before
    /// hashing to bound key cost on large files.
    pub fn cache_key(operation: &str, context: &str, query: &str, language: &str) -> String {
        let context = prefix_chars(context, KEY_CONTEXT_PREFIX_CHARS);
        let mut hasher = Sha256::new();
        for field in [operation, context, query, language] {
            hasher.update((field.len() as u64).to_le_bytes());
            hasher.update(field.as_bytes());
        }
        format!("{:x}", hasher.finalize())
    }

    /// Look up a cached response. Reads do not refresh insertion order.
    pub fn get(&mut self, key: &str) -> Option<String> {
        match self.entries.get(key) {
            Some(value) => {
                self.hits += 1;
                Some(value.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Store a response, evicting the earliest-inserted entry at capacity.
    ///
    /// Re-inserting an existing key overwrites the value in place and
    /// keeps its original position in the eviction order.
    pub fn put(&mut self, key: String, value: String) {
        if let Some(slot) = self.entries.get_mut(&key) {
            *slot = value;
            return;
        }
        while self.entries.len() >= self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    debug!(key = %&oldest[..8.min(oldest.len())], "evicting oldest cache entry");
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }
        self.order.push_back(key.clone());
        self.entries.insert(key, value);
    }

    /// Return aggregate statistics about the cache.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
        }
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    /// Number of entries currently cached.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Aggregate cache statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of entries currently in the cache.
    pub entries: usize,
    /// Lookups that found an entry.
    pub hits: u64,
    /// Lookups that found nothing.
    pub misses: u64,
}
