//! Pseudo-LRU (PLRU) replacement policy.
//!
//! Approximates LRU with a single usage bit per way: an access sets the
//! way's bit, and once every bit in a set is set, the mask collapses to
//! just the most recent way. Ways with a clear bit are eviction candidates;
//! ways with a set bit are protected.
//!
//! # Performance
//!
//! - **Time Complexity:** `touch()`, `fill()`, `rank()`: O(1)
//! - **Space Complexity:** one bit per line
//! - **Best Case:** close to LRU for most access patterns
//! - **Worst Case:** pathological patterns can evict useful lines early

use super::ReplacementPolicy;

/// PLRU policy state: a usage bitmask per set.
pub struct PlruPolicy {
    used: Vec<u64>,
    ways: usize,
}

impl PlruPolicy {
    /// Creates a new PLRU policy instance.
    ///
    /// # Arguments
    ///
    /// * `sets` - The number of sets in the cache.
    /// * `ways` - The associativity of the cache (at most 64).
    pub fn new(sets: usize, ways: usize) -> Self {
        debug_assert!(ways <= 64);
        Self {
            used: vec![0; sets],
            ways,
        }
    }

    fn mark(&mut self, set: usize, way: usize) {
        let mask = 1u64 << way;
        self.used[set] |= mask;

        let all_ones = (1u64 << self.ways) - 1;
        if self.used[set] & all_ones == all_ones {
            self.used[set] = mask;
        }
    }
}

impl ReplacementPolicy for PlruPolicy {
    /// Sets the accessed way's usage bit, collapsing the mask when full.
    fn touch(&mut self, set: usize, way: usize) {
        self.mark(set, way);
    }

    /// Fills protect the new way exactly like hits.
    fn fill(&mut self, set: usize, way: usize) {
        self.mark(set, way);
    }

    /// 1 for eviction candidates (clear bit), 0 for protected ways.
    fn rank(&self, set: usize, way: usize) -> u64 {
        u64::from((self.used[set] >> way) & 1 == 0)
    }
}
