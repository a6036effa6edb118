//! Stride prefetcher.
//!
//! Detects constant-stride access patterns per instruction: a reference
//! prediction table indexed by program counter tracks the last address and
//! stride of each load/store site. Prefetching starts only once the same
//! stride has been confirmed `threshold` times in a row, and stops again
//! when the pattern breaks.
//!
//! # Performance
//!
//! - **Time Complexity:** `observe()`: O(D) where D is the prefetch degree
//! - **Space Complexity:** O(T) where T is the table size (64-256 entries)
//! - **Best Case:** regular strided patterns (array traversals, matrices)
//! - **Worst Case:** irregular accesses (linked lists, hash tables)

use super::Prefetcher;

/// Entry in the reference prediction table.
#[derive(Default, Clone, Copy)]
struct StrideEntry {
    /// The last address accessed by this instruction.
    last_addr: u64,
    /// The detected stride between consecutive accesses.
    stride: i64,
    /// Saturating confirmation counter.
    confidence: u8,
}

/// Stride prefetcher state.
pub struct StridePrefetcher {
    /// Reference prediction table, indexed by PC.
    table: Vec<StrideEntry>,
    /// Size of a cache block in bytes.
    block_bytes: u64,
    /// Mask used to index the table.
    table_mask: usize,
    /// Number of strides to prefetch ahead.
    degree: usize,
    /// Confirmations required before prefetching.
    threshold: u8,
}

impl StridePrefetcher {
    /// Creates a new stride prefetcher.
    ///
    /// # Arguments
    ///
    /// * `block_bytes` - The size of a cache block in bytes.
    /// * `table_size` - Table entry count (non-power-of-two falls back to 64).
    /// * `degree` - The number of strides to prefetch ahead (0 treated as 1).
    /// * `threshold` - Matching strides required before the first prefetch
    ///   (0 treated as 1).
    pub fn new(block_bytes: usize, table_size: usize, degree: usize, threshold: u8) -> Self {
        let safe_size = if table_size > 0 && table_size.is_power_of_two() {
            table_size
        } else {
            64
        };

        Self {
            table: vec![StrideEntry::default(); safe_size],
            block_bytes: block_bytes as u64,
            table_mask: safe_size - 1,
            degree: if degree == 0 { 1 } else { degree },
            threshold: if threshold == 0 { 1 } else { threshold },
        }
    }
}

impl Prefetcher for StridePrefetcher {
    /// Updates the PC's table entry and, starting with the `threshold`-th
    /// consecutive matching stride, emits block-aligned targets at
    /// `addr + k * stride` for `k` in `1..=degree`.
    fn observe(&mut self, pc: u64, addr: u64, _hit: bool) -> Vec<u64> {
        // Instructions are word-aligned; drop the low bits before hashing.
        let idx = ((pc >> 2) as usize) & self.table_mask;
        let entry = &mut self.table[idx];

        let current_stride = (addr as i64).wrapping_sub(entry.last_addr as i64);
        let mut targets = Vec::new();

        if current_stride == entry.stride && current_stride != 0 {
            if entry.confidence < self.threshold {
                entry.confidence += 1;
            }
            // The threshold-th matching stride is the one that starts
            // prediction, not the one after it.
            if entry.confidence >= self.threshold {
                for k in 1..=self.degree {
                    let lookahead = entry.stride.wrapping_mul(k as i64);
                    let target = (addr as i64).wrapping_add(lookahead) as u64;
                    targets.push(target & !(self.block_bytes - 1));
                }
            }
        } else if entry.confidence > 0 {
            entry.confidence -= 1;
        } else {
            entry.stride = current_stride;
        }

        entry.last_addr = addr;
        targets
    }
}
