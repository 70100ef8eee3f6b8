//! # tinylru
//!
//! Fixed-capacity key/value cache with least-recently-used eviction.
//!
//! ## Architecture
//! - **HashMap**: AHash index from key to arena slot (O(1))
//! - **Recency list**: doubly-linked list of arena slots with head/tail sentinels
//! - **Eviction**: inserting into a full cache drops the tail entry (O(1))
//!
//! `get` counts as a use and moves the entry to the front. The cache is a
//! single-owner structure; share it across threads only behind one lock.

#![warn(missing_docs)]

mod error;
mod lru;
mod stats;

pub use error::{Error, Result};
pub use lru::{Iter, LruCache};
pub use stats::CacheStats;
