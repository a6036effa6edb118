//! Stream prefetcher.
//!
//! Detects and locks onto contiguous access streams. Unlike the stride
//! prefetcher, which tracks arbitrary per-PC deltas, the stream prefetcher
//! watches for block-sized forward or backward movement of the whole access
//! stream. Once a direction has been confirmed `threshold` times, it runs
//! `degree` blocks ahead of the stream.

use super::Prefetcher;

/// Direction of the memory stream.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Direction {
    /// No stable direction detected.
    None,
    /// Ascending addresses.
    Ascending,
    /// Descending addresses.
    Descending,
}

/// Stream prefetcher state.
pub struct StreamPrefetcher {
    /// Size of a cache block in bytes.
    block_bytes: u64,
    /// Number of blocks to prefetch ahead.
    degree: usize,
    /// Confirmations required before prefetching.
    threshold: u8,
    /// The address of the previous access.
    last_addr: u64,
    /// The currently detected stream direction.
    direction: Direction,
    /// Confidence counter for the current stream.
    confidence: u8,
}

impl StreamPrefetcher {
    /// Creates a new stream prefetcher.
    ///
    /// # Arguments
    ///
    /// * `block_bytes` - The size of a cache block in bytes.
    /// * `degree` - The number of blocks to prefetch ahead (0 treated as 1).
    /// * `threshold` - Consecutive same-direction steps required before the
    ///   first prefetch (0 treated as 1).
    pub fn new(block_bytes: usize, degree: usize, threshold: u8) -> Self {
        Self {
            block_bytes: block_bytes as u64,
            degree: if degree == 0 { 1 } else { degree },
            threshold: if threshold == 0 { 1 } else { threshold },
            last_addr: 0,
            direction: Direction::None,
            confidence: 0,
        }
    }
}

impl Prefetcher for StreamPrefetcher {
    /// Compares the access against the previous one to track stream
    /// direction; once confidence reaches the threshold, emits `degree`
    /// block-aligned targets in the stream direction.
    fn observe(&mut self, _pc: u64, addr: u64, _hit: bool) -> Vec<u64> {
        let diff = (addr as i64).wrapping_sub(self.last_addr as i64);
        let block = self.block_bytes as i64;

        let current_dir = if diff == block {
            Direction::Ascending
        } else if diff == -block {
            Direction::Descending
        } else {
            Direction::None
        };

        if current_dir == Direction::None {
            if self.confidence > 0 {
                self.confidence -= 1;
            } else {
                self.direction = Direction::None;
            }
        } else if current_dir == self.direction {
            if self.confidence < self.threshold {
                self.confidence += 1;
            }
        } else {
            self.direction = current_dir;
            self.confidence = 1;
        }

        let mut targets = Vec::new();
        if self.confidence >= self.threshold && self.direction != Direction::None {
            let base = addr & !(self.block_bytes - 1);
            for k in 1..=self.degree as u64 {
                let step = self.block_bytes * k;
                let target = if self.direction == Direction::Ascending {
                    base.wrapping_add(step)
                } else {
                    base.wrapping_sub(step)
                };
                targets.push(target);
            }
        }

        self.last_addr = addr;
        targets
    }
}
