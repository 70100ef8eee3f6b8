//! Applies script operations to a cache and records the result of each

use std::fmt;

use serde::Serialize;
use tinylru::LruCache;
use tracing::debug;

use crate::script::Op;

/// What an operation did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Outcome {
    /// `get` hit, with the stored value
    Found(String),
    /// `get` on an absent key
    Missing,
    /// `put` completed
    Stored,
    /// `del` removed the key, with its last value
    Removed(String),
    /// `del` on an absent key
    NotPresent,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Found(value) => write!(f, "found {}", value),
            Outcome::Missing => f.write_str("missing"),
            Outcome::Stored => f.write_str("ok"),
            Outcome::Removed(value) => write!(f, "removed {}", value),
            Outcome::NotPresent => f.write_str("not present"),
        }
    }
}

/// One replayed operation and the cache order right after it
#[derive(Debug, Clone, Serialize)]
pub struct Step {
    /// Operation applied
    #[serde(flatten)]
    pub op: Op,
    /// Result of the operation
    pub outcome: Outcome,
    /// Entries from most to least recently used
    pub order: Vec<(String, String)>,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<16} {:<12} ", self.op.to_string(), self.outcome.to_string())?;

        if self.order.is_empty() {
            return f.write_str("(empty)");
        }
        for (i, (key, value)) in self.order.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{}: {}", key, value)?;
        }
        Ok(())
    }
}

/// Final cache state after a replay
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Entries left in the cache
    pub size: usize,
    /// Cache capacity
    pub capacity: usize,
    /// Successful reads
    pub hits: u64,
    /// Reads of absent keys
    pub misses: u64,
    /// Writes that added a new key
    pub inserts: u64,
    /// Writes that overwrote an existing key
    pub updates: u64,
    /// Entries dropped to make room
    pub evictions: u64,
    /// hits / (hits + misses)
    pub hit_ratio: f64,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "size {}/{}, hits {}, misses {}, inserts {}, updates {}, evictions {}, hit ratio {:.2}",
            self.size,
            self.capacity,
            self.hits,
            self.misses,
            self.inserts,
            self.updates,
            self.evictions,
            self.hit_ratio
        )
    }
}

/// Drives a string-keyed cache through script operations
pub struct Replayer {
    cache: LruCache<String, String>,
}

impl Replayer {
    /// Create a replayer over an empty cache of the given capacity
    pub fn new(capacity: usize) -> tinylru::Result<Self> {
        Ok(Self {
            cache: LruCache::new(capacity)?,
        })
    }

    /// Apply one operation
    pub fn apply(&mut self, op: &Op) -> Step {
        let outcome = match op {
            Op::Put { key, value } => {
                self.cache.put(key.clone(), value.clone());
                Outcome::Stored
            }
            Op::Get { key } => match self.cache.get(key) {
                Some(value) => Outcome::Found(value.clone()),
                None => Outcome::Missing,
            },
            Op::Del { key } => match self.cache.remove(key) {
                Some(value) => Outcome::Removed(value),
                None => Outcome::NotPresent,
            },
        };

        debug!(%op, %outcome, len = self.cache.len(), "applied operation");

        let order = self
            .cache
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Step {
            op: op.clone(),
            outcome,
            order,
        }
    }

    /// Apply every operation in order
    pub fn run(&mut self, ops: &[Op]) -> Vec<Step> {
        ops.iter().map(|op| self.apply(op)).collect()
    }

    /// Current cache state and counters
    pub fn summary(&self) -> Summary {
        let stats = self.cache.stats();

        Summary {
            size: self.cache.len(),
            capacity: self.cache.capacity(),
            hits: stats.hits(),
            misses: stats.misses(),
            inserts: stats.inserts(),
            updates: stats.updates(),
            evictions: stats.evictions(),
            hit_ratio: stats.hit_ratio(),
        }
    }
}
