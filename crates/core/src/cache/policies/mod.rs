//! Cache replacement policies.
//!
//! Implements the victim-ordering algorithms for set-associative caches.
//!
//! # Policies
//!
//! - `Lru`: Least Recently Used (priority counters).
//! - `Fifo`: First-In, First-Out.
//! - `Plru`: Pseudo-LRU (usage bits).
//!
//! A policy only orders ways; the cache level itself prefers invalid ways
//! and applies tie-breaking, so the trait exposes a rank rather than a
//! victim index.

/// First-In, First-Out replacement policy.
pub mod fifo;

/// Least Recently Used replacement policy.
pub mod lru;

/// Pseudo-LRU replacement policy.
pub mod plru;

pub use fifo::FifoPolicy;
pub use lru::LruPolicy;
pub use plru::PlruPolicy;

/// Trait for cache replacement policies.
///
/// The cache level reports hits and fills; the policy answers relative
/// eviction preference per way.
pub trait ReplacementPolicy: Send + Sync {
    /// Records a demand hit on `way` within `set`.
    fn touch(&mut self, set: usize, way: usize);

    /// Records a new line installed in `way` within `set` after a miss.
    fn fill(&mut self, set: usize, way: usize);

    /// Eviction preference of `way` within `set`.
    ///
    /// The highest-ranked way is evicted first; the caller breaks ties.
    fn rank(&self, set: usize, way: usize) -> u64;
}
