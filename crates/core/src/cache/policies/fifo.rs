//! First-In, First-Out (FIFO) replacement policy.
//!
//! Evicts the oldest fill in a set regardless of how recently it was
//! accessed. Each fill stamps the way with a per-set monotone counter;
//! the rank of a way is its age relative to that counter. Hits do not
//! reorder anything.
//!
//! # Performance
//!
//! - **Time Complexity:** `touch()`, `fill()`, `rank()`: O(1)
//! - **Space Complexity:** one stamp per line plus one counter per set
//! - **Best Case:** streaming accesses where all lines have equal importance
//! - **Worst Case:** workloads with strong temporal locality

use super::ReplacementPolicy;

/// FIFO policy state.
pub struct FifoPolicy {
    /// Fill stamp per line, from the owning set's counter.
    stamp: Vec<u64>,
    /// Monotone fill counter per set.
    tick: Vec<u64>,
    ways: usize,
}

impl FifoPolicy {
    /// Creates a new FIFO policy instance.
    ///
    /// # Arguments
    ///
    /// * `sets` - The number of sets in the cache.
    /// * `ways` - The associativity of the cache.
    pub fn new(sets: usize, ways: usize) -> Self {
        Self {
            stamp: vec![0; sets * ways],
            tick: vec![0; sets],
            ways,
        }
    }
}

impl ReplacementPolicy for FifoPolicy {
    /// Hits do not affect FIFO order.
    fn touch(&mut self, _set: usize, _way: usize) {}

    /// Stamps the filled way with the set's next fill tick.
    fn fill(&mut self, set: usize, way: usize) {
        self.tick[set] += 1;
        self.stamp[set * self.ways + way] = self.tick[set];
    }

    /// Age of the way's fill: the oldest fill ranks highest.
    fn rank(&self, set: usize, way: usize) -> u64 {
        self.tick[set] - self.stamp[set * self.ways + way]
    }
}
