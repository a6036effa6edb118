//! Statistics Accounting Unit Tests.
//!
//! Exercises counter folding and the derived metrics. Outcomes are built
//! directly; the hierarchy tests cover how outcomes are produced.

use cachesim_core::hierarchy::AccessOutcome;
use cachesim_core::stats::{LevelStats, SimStats, STATS_SECTIONS};

use crate::common::{read, write};

fn hit() -> AccessOutcome {
    AccessOutcome {
        latency: 1,
        l1_hit: true,
        penalty_cycles: 0,
        writebacks: 0,
    }
}

fn miss(penalty: u64) -> AccessOutcome {
    AccessOutcome {
        latency: 111,
        l1_hit: false,
        penalty_cycles: penalty,
        writebacks: 0,
    }
}

// ──────────────────────────────────────────────────────────
// Folding
// ──────────────────────────────────────────────────────────

#[test]
fn counts_reads_writes_and_misses() {
    let mut stats = SimStats::default();
    stats.record(&read(0), &miss(30));
    stats.record(&read(0), &hit());
    stats.record(&write(64), &miss(30));

    assert_eq!(stats.accesses, 3);
    assert_eq!(stats.reads, 2);
    assert_eq!(stats.writes, 1);
    assert_eq!(stats.misses, 2);
    assert_eq!(stats.hits(), 1);
    assert_eq!(stats.instructions, 3);
}

#[test]
fn accumulates_penalties_writebacks_and_latency() {
    let mut stats = SimStats::default();
    stats.record(&read(0), &miss(30));
    stats.record(
        &write(512),
        &AccessOutcome {
            latency: 116,
            l1_hit: false,
            penalty_cycles: 35,
            writebacks: 1,
        },
    );

    assert_eq!(stats.penalty_cycles, 65);
    assert_eq!(stats.dirty_writebacks, 1);
    assert_eq!(stats.total_latency, 111 + 116);
}

// ──────────────────────────────────────────────────────────
// Derived metrics
// ──────────────────────────────────────────────────────────

/// miss_rate = misses / accesses * 100.
#[test]
fn miss_rate_arithmetic() {
    let mut stats = SimStats::default();
    for _ in 0..3 {
        stats.record(&read(0), &miss(30));
    }
    stats.record(&read(0), &hit());

    assert!((stats.miss_rate() - 75.0).abs() < 1e-9);
}

/// cycles = penalty_cycles + instructions; IPC = instructions / cycles.
#[test]
fn ipc_identity() {
    let mut stats = SimStats::default();
    let mut record = read(0);
    record.instructions = 10;
    stats.record(&record, &miss(30));
    stats.record(&record, &hit());

    assert_eq!(stats.cycles(), 30 + 20);
    assert!((stats.ipc() - 20.0 / 50.0).abs() < 1e-9);
}

/// With no penalties at all, IPC degenerates to exactly 1.0.
#[test]
fn penalty_free_run_has_unit_ipc() {
    let mut stats = SimStats::default();
    for _ in 0..5 {
        stats.record(&read(0), &hit());
    }
    assert_eq!(stats.cycles(), stats.instructions);
    assert!((stats.ipc() - 1.0).abs() < 1e-12);
}

/// Querying a fresh collector divides by nothing.
#[test]
fn zero_denominators_are_guarded() {
    let stats = SimStats::default();
    assert_eq!(stats.miss_rate(), 0.0);
    assert_eq!(stats.ipc(), 0.0);
    assert_eq!(stats.hits(), 0);
}

// ──────────────────────────────────────────────────────────
// Per-level counters
// ──────────────────────────────────────────────────────────

#[test]
fn level_stats_derive_hits_and_rate() {
    let stats = LevelStats {
        refs: 8,
        misses: 2,
        penalties: 60,
        compulsory_misses: 2,
        other_misses: 0,
    };
    assert_eq!(stats.hits(), 6);
    assert!((stats.miss_rate() - 25.0).abs() < 1e-9);

    assert_eq!(LevelStats::default().miss_rate(), 0.0);
}

/// The section list is the stable contract for `--sections`.
#[test]
fn section_names_are_stable() {
    assert_eq!(
        STATS_SECTIONS,
        &["settings", "accesses", "misses", "ipc", "levels"]
    );
}
