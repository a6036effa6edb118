//! Next-line prefetcher.
//!
//! A simple spatial prefetcher that names the next sequential block(s)
//! whenever an access occurs. Exploits the spatial locality of instruction
//! streams and sequential data arrays. Stateless and deterministic: every
//! access produces exactly `degree` candidates.

use super::Prefetcher;

/// Next-line prefetcher state.
pub struct NextLinePrefetcher {
    /// Size of a cache block in bytes.
    block_bytes: u64,
    /// Number of subsequent blocks to prefetch (prefetch degree).
    degree: usize,
}

impl NextLinePrefetcher {
    /// Creates a new next-line prefetcher.
    ///
    /// # Arguments
    ///
    /// * `block_bytes` - The size of a cache block in bytes.
    /// * `degree` - The number of blocks to prefetch ahead (0 treated as 1).
    pub fn new(block_bytes: usize, degree: usize) -> Self {
        Self {
            block_bytes: block_bytes as u64,
            degree: if degree == 0 { 1 } else { degree },
        }
    }
}

impl Prefetcher for NextLinePrefetcher {
    /// Emits the base addresses of the next `degree` blocks after `addr`.
    fn observe(&mut self, _pc: u64, addr: u64, _hit: bool) -> Vec<u64> {
        let mut targets = Vec::with_capacity(self.degree);
        let base = addr & !(self.block_bytes - 1);
        for k in 1..=self.degree {
            targets.push(base + self.block_bytes * k as u64);
        }
        targets
    }
}
