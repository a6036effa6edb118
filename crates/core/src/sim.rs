//! Simulation driver.
//!
//! [`Simulation`] ties the pieces together: it owns the configured
//! [`CacheHierarchy`], feeds it trace records, folds each outcome into
//! [`SimStats`], and prints the final report.

use std::io::BufRead;

use tracing::info;

use crate::config::Config;
use crate::error::{ConfigError, TraceError};
use crate::hierarchy::{AccessOutcome, CacheHierarchy};
use crate::stats::SimStats;
use crate::trace::{AccessRecord, TraceReader};

/// A configured simulation run.
pub struct Simulation {
    config: Config,
    hierarchy: CacheHierarchy,
    stats: SimStats,
}

impl Simulation {
    /// Builds a simulation, validating the configuration on the way.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration is inconsistent.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let hierarchy = CacheHierarchy::new(&config)?;
        Ok(Self {
            config,
            hierarchy,
            stats: SimStats::default(),
        })
    }

    /// The configuration this simulation was built from.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The cache hierarchy being simulated.
    pub fn hierarchy(&self) -> &CacheHierarchy {
        &self.hierarchy
    }

    /// Statistics accumulated so far.
    pub fn stats(&self) -> &SimStats {
        &self.stats
    }

    /// Simulates a single trace record and folds it into the statistics.
    pub fn step(&mut self, record: &AccessRecord) -> AccessOutcome {
        let outcome = self.hierarchy.access(record);
        self.stats.record(record, &outcome);
        outcome
    }

    /// Runs every record of a trace to completion.
    ///
    /// # Errors
    ///
    /// Returns the first [`TraceError`] hit while reading; records before
    /// the error remain folded into the statistics.
    pub fn run<R: BufRead>(&mut self, trace: TraceReader<R>) -> Result<(), TraceError> {
        for record in trace {
            self.step(&record?);
        }
        info!(
            accesses = self.stats.accesses,
            misses = self.stats.misses,
            "trace complete"
        );
        Ok(())
    }

    /// Prints the statistics report to stdout.
    ///
    /// `sections` selects which report sections to show (see
    /// [`crate::stats::STATS_SECTIONS`]); an empty slice prints all of
    /// them.
    pub fn print_report(&self, sections: &[String]) {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);

        if want("settings") {
            println!("CACHE SETTINGS");
            for level in [self.hierarchy.l1_i(), self.hierarchy.l1_d(), self.hierarchy.l2()] {
                println!(
                    "  {:<5} capacity: {:<8} block: {:<5} ways: {:<3} sets: {:<6} hit: {:<4} miss penalty: {}",
                    level.kind().to_string(),
                    level.capacity(),
                    level.block_bytes(),
                    level.ways(),
                    level.sets(),
                    level.hit_time(),
                    level.miss_penalty()
                );
            }
            println!("  INCLUSIVE: {}", self.config.hierarchy.inclusive);
            println!("  MEMORY SPEED: {}", self.config.timing.memory_speed);
            println!("  DIRTY WB PENALTY: {}", self.config.timing.dirty_wb_penalty);
            println!();
        }

        let levels = [
            ("L1-I", *self.hierarchy.l1_i().stats()),
            ("L1-D", *self.hierarchy.l1_d().stats()),
            ("L2", *self.hierarchy.l2().stats()),
        ];
        self.stats.print_sections(&levels, sections);
    }
}
