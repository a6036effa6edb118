//! Simulation statistics collection and reporting.
//!
//! This module tracks the metrics of a simulation run. It provides:
//! 1. **Per-level counters:** references, misses, accrued penalties, and the
//!    compulsory-vs-other miss split for each cache level.
//! 2. **Hierarchy-wide counters:** accesses, reads/writes, L1 demand misses,
//!    dirty write-backs, retired instructions, and total latency.
//! 3. **Derived metrics:** miss rate, total cycles, and IPC, all guarded
//!    against zero denominators so a report can be requested before any
//!    access has been simulated.

use crate::hierarchy::AccessOutcome;
use crate::trace::{AccessKind, AccessRecord};

/// Counters for one cache level.
///
/// Reset at hierarchy construction, monotonically incremented during
/// simulation, read-only afterwards.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LevelStats {
    /// Demand references at this level.
    pub refs: u64,
    /// Demand misses at this level.
    pub misses: u64,
    /// Accrued cycle-model penalties: `miss_penalty` per demand miss.
    pub penalties: u64,
    /// Misses on a tag never before resident at its index.
    pub compulsory_misses: u64,
    /// Conflict/capacity misses: the tag had been resident before.
    pub other_misses: u64,
}

impl LevelStats {
    /// Demand hits at this level.
    pub fn hits(&self) -> u64 {
        self.refs - self.misses
    }

    /// Miss rate in percent, 0.0 before any reference.
    pub fn miss_rate(&self) -> f64 {
        if self.refs == 0 {
            0.0
        } else {
            self.misses as f64 / self.refs as f64 * 100.0
        }
    }
}

/// Hierarchy-wide simulation statistics.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SimStats {
    /// Trace records simulated.
    pub accesses: u64,
    /// Read and instruction-fetch records.
    pub reads: u64,
    /// Write records.
    pub writes: u64,
    /// Records that missed in their L1.
    pub misses: u64,
    /// Accrued cycle-model penalties (miss penalties plus write-back
    /// penalties).
    pub penalty_cycles: u64,
    /// Dirty lines written back to the next level or memory.
    pub dirty_writebacks: u64,
    /// Instructions retired, from the per-record counts.
    pub instructions: u64,
    /// Summed end-to-end access latency in cycles.
    pub total_latency: u64,
}

impl SimStats {
    /// Ingests the outcome of one simulated access.
    pub fn record(&mut self, record: &AccessRecord, outcome: &AccessOutcome) {
        self.accesses += 1;
        if record.kind == AccessKind::Write {
            self.writes += 1;
        } else {
            self.reads += 1;
        }
        if !outcome.l1_hit {
            self.misses += 1;
        }
        self.penalty_cycles += outcome.penalty_cycles;
        self.dirty_writebacks += outcome.writebacks;
        self.instructions += record.instructions;
        self.total_latency += outcome.latency;
    }

    /// Records that hit in their L1.
    pub fn hits(&self) -> u64 {
        self.accesses - self.misses
    }

    /// L1 miss rate in percent, 0.0 before any access.
    pub fn miss_rate(&self) -> f64 {
        if self.accesses == 0 {
            0.0
        } else {
            self.misses as f64 / self.accesses as f64 * 100.0
        }
    }

    /// Total cycles under the penalty model: accrued penalties (miss and
    /// write-back) plus retired instructions.
    pub fn cycles(&self) -> u64 {
        self.penalty_cycles + self.instructions
    }

    /// Instructions per cycle, 0.0 when no cycles have elapsed.
    pub fn ipc(&self) -> f64 {
        let cycles = self.cycles();
        if cycles == 0 {
            0.0
        } else {
            self.instructions as f64 / cycles as f64
        }
    }
}

/// Section names for selective report output.
///
/// Valid section identifiers: `"settings"`, `"accesses"`, `"misses"`,
/// `"ipc"`, `"levels"`. Pass an empty slice to print all sections.
pub const STATS_SECTIONS: &[&str] = &["settings", "accesses", "misses", "ipc", "levels"];

impl SimStats {
    /// Prints the requested statistics sections to stdout.
    ///
    /// `levels` supplies the per-level counters to show under `"levels"`,
    /// as `(name, stats)` pairs. Pass an empty `sections` slice to print
    /// everything. The `"settings"` section is owned by the caller, which
    /// holds the configuration.
    pub fn print_sections(&self, levels: &[(&str, LevelStats)], sections: &[String]) {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);

        if want("accesses") {
            println!("CACHE ACCESS STATS");
            println!("TOTAL ACCESSES: {}", self.accesses);
            println!("         READS: {}", self.reads);
            println!("        WRITES: {}", self.writes);
            println!();
        }

        if want("misses") {
            println!("CACHE MISS-RATE STATS");
            println!("     MISS-RATE: {:.4}%", self.miss_rate());
            println!("        MISSES: {}", self.misses);
            println!("          HITS: {}", self.hits());
            println!();
        }

        if want("ipc") {
            println!("CACHE IPC STATS");
            println!("           IPC: {:.4}", self.ipc());
            println!("  INSTRUCTIONS: {}", self.instructions);
            println!("        CYCLES: {}", self.cycles());
            println!("      DIRTY WB: {}", self.dirty_writebacks);
            println!("       LATENCY: {}", self.total_latency);
            println!();
        }

        if want("levels") {
            println!("PER-LEVEL STATS");
            for (name, stats) in levels {
                println!(
                    "  {:<5} refs: {:<10} misses: {:<10} miss_rate: {:>7.2}% compulsory: {:<10} other: {}",
                    name,
                    stats.refs,
                    stats.misses,
                    stats.miss_rate(),
                    stats.compulsory_misses,
                    stats.other_misses
                );
            }
        }
    }
}
