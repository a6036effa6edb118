//! Least Recently Used (LRU) replacement policy.
//!
//! Maintains one small priority counter per line instead of a linked
//! recency list: 0 is most-recently-used, `ways - 1` is least-recently-used,
//! and slots that have never been touched sit at `ways` so they order after
//! every live line. On an access to way `w`, every line whose priority was
//! at or below `w`'s former priority (and still below `ways`) moves one step
//! toward eviction, then `w` becomes 0.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `touch()` / `fill()`: O(W) where W is the associativity
//!   - `rank()`: O(1)
//! - **Space Complexity:** one byte per line
//!
//! The O(W) update is acceptable because associativity is small (≤ 16 in
//! practice).

use super::ReplacementPolicy;

/// LRU policy state: a flat priority counter per line.
pub struct LruPolicy {
    priority: Vec<u8>,
    ways: usize,
}

impl LruPolicy {
    /// Creates a new LRU policy instance.
    ///
    /// # Arguments
    ///
    /// * `sets` - The number of sets in the cache.
    /// * `ways` - The associativity of the cache (at most 255).
    pub fn new(sets: usize, ways: usize) -> Self {
        debug_assert!(ways <= usize::from(u8::MAX));
        Self {
            priority: vec![ways as u8; sets * ways],
            ways,
        }
    }

    fn promote(&mut self, set: usize, way: usize) {
        let base = set * self.ways;
        let touched = self.priority[base + way];
        let cap = self.ways as u8;
        for p in &mut self.priority[base..base + self.ways] {
            if *p <= touched && *p < cap {
                *p += 1;
            }
        }
        self.priority[base + way] = 0;
    }
}

impl ReplacementPolicy for LruPolicy {
    /// Promotes the accessed way to priority 0, aging everything that
    /// ranked at or above it.
    fn touch(&mut self, set: usize, way: usize) {
        self.promote(set, way);
    }

    /// Fills behave exactly like hits: the new line becomes most recent.
    fn fill(&mut self, set: usize, way: usize) {
        self.promote(set, way);
    }

    /// The priority counter itself: the maximum value is the LRU way.
    fn rank(&self, set: usize, way: usize) -> u64 {
        u64::from(self.priority[set * self.ways + way])
    }
}
