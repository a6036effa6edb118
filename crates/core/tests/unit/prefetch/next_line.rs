//! Next-Line Prefetcher Unit Tests.

use cachesim_core::prefetch::{NextLinePrefetcher, Prefetcher};

/// Every access produces the next sequential block, block-aligned even
/// when the access itself is not.
#[test]
fn emits_next_block() {
    let mut p = NextLinePrefetcher::new(64, 1);
    assert_eq!(p.observe(0, 0x1000, false), vec![0x1040]);
    assert_eq!(p.observe(0, 0x1037, true), vec![0x1040]);
}

/// Degree N yields the N following blocks in order.
#[test]
fn degree_scales_candidate_count() {
    let mut p = NextLinePrefetcher::new(64, 3);
    assert_eq!(p.observe(0, 0x1000, false), vec![0x1040, 0x1080, 0x10C0]);
}

/// Degree zero is treated as one rather than disabling the prefetcher.
#[test]
fn zero_degree_falls_back_to_one() {
    let mut p = NextLinePrefetcher::new(64, 0);
    assert_eq!(p.observe(0, 0, false).len(), 1);
}
