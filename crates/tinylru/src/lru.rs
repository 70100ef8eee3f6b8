//! LRU (Least Recently Used) cache implementation
//!
//! Entries live in a `Vec` arena and are linked by slot index, so moving an
//! entry to the front or dropping the tail never touches the allocator.
//!
//! ```text
//!   slot 0 (head) ──► [MRU] ◄──► ... ◄──► [LRU] ◄── slot 1 (tail)
//! ```
//!
//! Slots 0 and 1 are sentinels: they never hold an entry, which keeps
//! splicing free of empty-list special cases.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::iter::FusedIterator;

use ahash::RandomState;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::stats::CacheStats;

const HEAD: usize = 0;
const TAIL: usize = 1;

/// Upper bound on the slots reserved at construction; larger caches grow on demand.
const MAX_PREALLOC: usize = 4096;

struct Entry<K, V> {
    key: K,
    value: V,
}

/// Arena slot. `entry` is `None` for the sentinels and for freed slots.
struct Node<K, V> {
    entry: Option<Entry<K, V>>,
    prev: usize,
    next: usize,
}

impl<K, V> Node<K, V> {
    fn sentinel(prev: usize, next: usize) -> Self {
        Self {
            entry: None,
            prev,
            next,
        }
    }
}

/// LRU cache with fixed capacity
///
/// # Examples
/// ```
/// use tinylru::LruCache;
///
/// let mut cache = LruCache::new(2)?;
/// cache.put("a", 1);
/// cache.put("b", 2);
/// assert_eq!(cache.get(&"a"), Some(&1));
///
/// // "b" is now the least recently used entry
/// cache.put("c", 3);
/// assert_eq!(cache.get(&"b"), None);
/// # Ok::<(), tinylru::Error>(())
/// ```
pub struct LruCache<K, V> {
    map: HashMap<K, usize, RandomState>,
    nodes: Vec<Node<K, V>>,
    free_list: Vec<usize>,
    capacity: usize,
    stats: CacheStats,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a new LRU cache holding at most `capacity` entries
    ///
    /// # Errors
    /// Returns [`Error::InvalidCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity(capacity));
        }

        let reserve = capacity.min(MAX_PREALLOC);
        let mut nodes = Vec::with_capacity(reserve.saturating_add(2));
        nodes.push(Node::sentinel(HEAD, TAIL));
        nodes.push(Node::sentinel(HEAD, TAIL));

        Ok(Self {
            map: HashMap::with_capacity_and_hasher(reserve, RandomState::new()),
            nodes,
            free_list: Vec::new(),
            capacity,
            stats: CacheStats::new(),
        })
    }

    /// Get a value from the cache, marking it most recently used
    pub fn get(&mut self, key: &K) -> Option<&V> {
        match self.map.get(key) {
            Some(&idx) => {
                self.stats.record_hit();
                self.move_to_front(idx);
                self.nodes[idx].entry.as_ref().map(|entry| &entry.value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Insert or overwrite a key-value pair, marking it most recently used
    ///
    /// Inserting a new key into a full cache first evicts the least recently
    /// used entry. Overwriting an existing key never evicts.
    pub fn put(&mut self, key: K, value: V) {
        if let Some(&idx) = self.map.get(&key) {
            if let Some(entry) = &mut self.nodes[idx].entry {
                entry.value = value;
            }
            self.move_to_front(idx);
            self.stats.record_update();
            return;
        }

        if self.map.len() >= self.capacity {
            self.evict();
        }

        let idx = self.alloc_node(Entry {
            key: key.clone(),
            value,
        });
        self.link_front(idx);
        self.map.insert(key, idx);
        self.stats.record_insert();
    }

    /// Remove a key from the cache
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let idx = self.map.remove(key)?;
        self.release(idx).map(|entry| entry.value)
    }

    /// Check whether a key is cached, without touching recency
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Drop every entry and reset statistics
    pub fn clear(&mut self) {
        let dropped = self.map.len();

        self.map.clear();
        self.nodes.truncate(2);
        self.nodes[HEAD].next = TAIL;
        self.nodes[TAIL].prev = HEAD;
        self.free_list.clear();
        self.stats.reset();

        debug!(dropped, "cleared cache");
    }

    fn evict(&mut self) {
        let idx = self.nodes[TAIL].prev;
        if idx == HEAD {
            return;
        }

        if let Some(entry) = self.release(idx) {
            self.map.remove(&entry.key);
        }
        self.stats.record_eviction();
        trace!(
            slot = idx,
            capacity = self.capacity,
            "evicted least recently used entry"
        );
    }
}

impl<K, V> LruCache<K, V> {
    /// Get the current number of entries
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Maximum number of entries, fixed at construction
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Zero all statistics counters
    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    /// Iterate entries from most to least recently used
    ///
    /// Iteration does not affect recency order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            nodes: &self.nodes,
            cursor: self.nodes[HEAD].next,
            remaining: self.map.len(),
        }
    }

    /// Collect entries from most to least recently used
    ///
    /// Intended for debugging and tests.
    pub fn snapshot(&self) -> Vec<(&K, &V)> {
        self.iter().collect()
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.nodes[HEAD].next == idx {
            return;
        }

        self.unlink(idx);
        self.link_front(idx);
    }

    fn link_front(&mut self, idx: usize) {
        let first = self.nodes[HEAD].next;

        self.nodes[idx].prev = HEAD;
        self.nodes[idx].next = first;
        self.nodes[first].prev = idx;
        self.nodes[HEAD].next = idx;
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);

        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
    }

    fn alloc_node(&mut self, entry: Entry<K, V>) -> usize {
        if let Some(idx) = self.free_list.pop() {
            self.nodes[idx].entry = Some(entry);
            idx
        } else {
            let idx = self.nodes.len();
            self.nodes.push(Node {
                entry: Some(entry),
                prev: HEAD,
                next: TAIL,
            });
            idx
        }
    }

    /// Unlink a live slot and hand its entry back, freeing the slot
    fn release(&mut self, idx: usize) -> Option<Entry<K, V>> {
        self.unlink(idx);
        let entry = self.nodes[idx].entry.take();
        self.free_list.push(idx);
        entry
    }
}

/// Iterator over cache entries, most recently used first
pub struct Iter<'a, K, V> {
    nodes: &'a [Node<K, V>],
    cursor: usize,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor == TAIL {
            return None;
        }

        let node = &self.nodes[self.cursor];
        self.cursor = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        node.entry.as_ref().map(|entry| (&entry.key, &entry.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<'a, K, V> IntoIterator for &'a LruCache<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Renders `key: value` pairs joined by ` -> `, most recent first.
impl<K: fmt::Display, V: fmt::Display> fmt::Display for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{}: {}", key, value)?;
        }
        Ok(())
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    fn debug_validate_invariants(&self) {
        assert_eq!(self.nodes[HEAD].prev, HEAD);
        assert_eq!(self.nodes[TAIL].next, TAIL);
        assert!(self.nodes[HEAD].entry.is_none());
        assert!(self.nodes[TAIL].entry.is_none());

        let mut seen = 0;
        let mut prev = HEAD;
        let mut cursor = self.nodes[HEAD].next;
        while cursor != TAIL {
            let node = &self.nodes[cursor];
            assert_eq!(node.prev, prev, "broken back link at slot {}", cursor);
            let entry = node.entry.as_ref().expect("linked slot holds an entry");
            assert_eq!(self.map.get(&entry.key), Some(&cursor));
            seen += 1;
            assert!(seen <= self.map.len(), "list longer than index");
            prev = cursor;
            cursor = node.next;
        }
        assert_eq!(self.nodes[TAIL].prev, prev);

        assert_eq!(seen, self.map.len());
        assert!(self.map.len() <= self.capacity);
        for &idx in &self.free_list {
            assert!(idx > TAIL);
            assert!(self.nodes[idx].entry.is_none());
        }
        assert_eq!(self.nodes.len(), 2 + self.map.len() + self.free_list.len());
    }
}
