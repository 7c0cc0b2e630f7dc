//! Deduplication cache for breaking rebroadcast loops
//!
//! In a flood topology every node that accepts a message rebroadcasts it to
//! all neighbors, so without per-node suppression a single message would
//! bounce between nodes forever:
//!
//! 1. Node A broadcasts a message
//! 2. Node B accepts it and rebroadcasts
//! 3. Node A receives its own message back from B
//! 4. Node A rebroadcasts again... and so on
//!
//! The [`DedupCache`] is the loop-breaking mechanism: a bounded set of the
//! most recently *first-seen* message ids. A message whose id is already in
//! the set is dropped without any further effect.
//!
//! # Eviction discipline
//!
//! Eviction is strict FIFO by insertion: seeing a cached id again never
//! refreshes its position, so the window tracks recency of first sight.
//! The backing [`LruCache`] only degenerates to LRU order when entries are
//! touched on access - membership checks here go through `contains`, which
//! leaves the order untouched.

use lru::LruCache;
use std::num::NonZeroUsize;
use tracing::trace;

use terramesh_core::MessageId;

use crate::config::DEDUP_CAPACITY;

/// Bounded FIFO set of recently first-seen message identifiers.
///
/// Owned by value by exactly one [`RelayCore`](crate::RelayCore); never
/// shared across nodes or threads, never persisted.
#[derive(Debug)]
pub struct DedupCache {
    seen: LruCache<MessageId, ()>,
}

impl DedupCache {
    /// Create a cache with the default capacity ([`DEDUP_CAPACITY`])
    pub fn new() -> Self {
        Self::with_capacity(DEDUP_CAPACITY)
    }

    /// Create a cache with a custom capacity (minimum 1)
    pub fn with_capacity(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity.max(1)).unwrap();
        Self {
            seen: LruCache::new(cap),
        }
    }

    /// Record an id, returning `true` if it was new.
    ///
    /// A new id is inserted, evicting the oldest entry when the cache is at
    /// capacity. A known id leaves the cache completely untouched - no
    /// refresh-on-hit.
    pub fn observe(&mut self, id: &MessageId) -> bool {
        if self.seen.contains(id) {
            return false;
        }
        if let Some((evicted, ())) = self.seen.push(id.clone(), ()) {
            trace!(evicted = %evicted, "dedup window full, oldest id evicted");
        }
        true
    }

    /// Membership test without recording
    pub fn contains(&self, id: &MessageId) -> bool {
        self.seen.contains(id)
    }

    /// Number of ids currently tracked
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Configured capacity
    pub fn capacity(&self) -> usize {
        self.seen.cap().get()
    }
}

impl Default for DedupCache {
    fn default() -> Self {
        Self::new()
    }
}
