//! Multi-level cache hierarchy.
//!
//! Composes an L1 instruction cache, an L1 data cache, and a shared L2.
//! Every L1 miss is forwarded to L2 (fill-through); an L2 miss installs the
//! block into both levels and charges the main-memory latency. When the
//! hierarchy is configured inclusive, an L2 eviction back-invalidates the
//! matching L1 line so every L1-resident block stays L2-resident.
//!
//! The hierarchy also owns the in-flight prefetch queue: prefetchers name
//! candidate addresses during an access, the candidates are queued, and the
//! queue is drained before the next demand probe, so a demand access to a
//! prefetched address observes the completed fill.

use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::cache::{CacheLevel, Eviction, ProbeKind};
use crate::config::{CacheKind, Config};
use crate::error::ConfigError;
use crate::trace::{AccessKind, AccessRecord};

/// An issued but not yet drained prefetch.
struct PendingPrefetch {
    addr: u64,
    target: CacheKind,
    issued_at: u64,
}

/// Result of simulating one trace record through the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessOutcome {
    /// End-to-end latency in cycles: hit times, memory latency on a full
    /// miss, and dirty write-back penalties on the demand path.
    pub latency: u64,
    /// The record hit in its L1.
    pub l1_hit: bool,
    /// Cycle-model penalties accrued by this access (per-level miss
    /// penalties plus write-back penalties, including those caused by
    /// prefetch fills drained before the probe).
    pub penalty_cycles: u64,
    /// Dirty write-backs caused by this access.
    pub writebacks: u64,
}

/// A three-level cache hierarchy with statistics and prefetching.
///
/// Owns all mutable simulation state; independent instances share nothing,
/// so parameter sweeps can run isolated hierarchies side by side.
pub struct CacheHierarchy {
    l1_i: CacheLevel,
    l1_d: CacheLevel,
    l2: CacheLevel,
    inclusive: bool,
    memory_speed: u64,
    dirty_wb_penalty: u64,
    inflight: VecDeque<PendingPrefetch>,
    access_index: u64,
    dirty_writebacks: u64,
}

impl CacheHierarchy {
    /// Builds the hierarchy from a configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any level's geometry is inconsistent
    /// or an inclusive hierarchy mixes block sizes (see
    /// [`Config::validate`]).
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            l1_i: CacheLevel::new(CacheKind::Instruction, &config.hierarchy.l1_i)?,
            l1_d: CacheLevel::new(CacheKind::Data, &config.hierarchy.l1_d)?,
            l2: CacheLevel::new(CacheKind::Unified, &config.hierarchy.l2)?,
            inclusive: config.hierarchy.inclusive,
            memory_speed: config.timing.memory_speed,
            dirty_wb_penalty: config.timing.dirty_wb_penalty,
            inflight: VecDeque::new(),
            access_index: 0,
            dirty_writebacks: 0,
        })
    }

    /// The L1 instruction cache.
    pub fn l1_i(&self) -> &CacheLevel {
        &self.l1_i
    }

    /// The L1 data cache.
    pub fn l1_d(&self) -> &CacheLevel {
        &self.l1_d
    }

    /// The unified L2 cache.
    pub fn l2(&self) -> &CacheLevel {
        &self.l2
    }

    /// Total dirty write-backs since construction.
    pub fn dirty_writebacks(&self) -> u64 {
        self.dirty_writebacks
    }

    /// Simulates one trace record.
    ///
    /// Drains outstanding prefetches, routes the record to L1-I or L1-D,
    /// forwards a miss to L2 and on to memory, maintains inclusion and
    /// dirty write-backs, and finally lets the probed levels' prefetchers
    /// observe the access.
    pub fn access(&mut self, record: &AccessRecord) -> AccessOutcome {
        let (mut penalty, mut writebacks) = self.drain_prefetches();
        self.access_index += 1;

        let is_write = record.kind.is_write();
        let is_fetch = record.kind == AccessKind::InstructionFetch;
        let target_kind = if is_fetch {
            CacheKind::Instruction
        } else {
            CacheKind::Data
        };

        let l1 = if is_fetch { &mut self.l1_i } else { &mut self.l1_d };
        let l1_miss_penalty = l1.miss_penalty();
        let mut latency = l1.hit_time();

        let r1 = l1.probe(record.addr, is_write, ProbeKind::Demand);

        if !r1.hit {
            penalty += l1_miss_penalty;
            debug!(
                addr = format_args!("{:#x}", record.addr),
                cache = %target_kind,
                "L1 miss, forwarding to L2"
            );

            // A full L1 miss is always an L2 reference. The L2 copy stays
            // clean; the write dirties the L1 line only.
            let r2 = self.l2.probe(record.addr, false, ProbeKind::Demand);
            latency += self.l2.hit_time();
            if !r2.hit {
                latency += self.memory_speed;
                penalty += self.l2.miss_penalty();
            }
            let (p, w) = self.handle_l2_eviction(r2.eviction);
            penalty += p;
            writebacks += w;

            for target in self.l2.prefetch_targets(record.pc, record.addr, r2.hit) {
                self.inflight.push_back(PendingPrefetch {
                    addr: target,
                    target: CacheKind::Unified,
                    issued_at: self.access_index,
                });
            }
        }

        if let Some(eviction) = r1.eviction {
            if eviction.dirty {
                writebacks += 1;
                latency += self.dirty_wb_penalty;
                penalty += self.dirty_wb_penalty;
                let _present = self.l2.mark_dirty(eviction.block_addr);
            }
        }

        let l1 = if is_fetch { &mut self.l1_i } else { &mut self.l1_d };
        let targets = l1.prefetch_targets(record.pc, record.addr, r1.hit);
        for target in targets {
            self.inflight.push_back(PendingPrefetch {
                addr: target,
                target: target_kind,
                issued_at: self.access_index,
            });
        }

        self.dirty_writebacks += writebacks;
        AccessOutcome {
            latency,
            l1_hit: r1.hit,
            penalty_cycles: penalty,
            writebacks,
        }
    }

    /// Resolves every queued prefetch, in issue order, returning the
    /// penalty cycles and write-backs their fills caused.
    ///
    /// Prefetch fills go through the normal probe path (so their evictions
    /// follow the ordinary, inclusion-aware route) but never touch demand
    /// statistics. An L1 fill under inclusion installs into L2 first.
    fn drain_prefetches(&mut self) -> (u64, u64) {
        let mut penalty = 0;
        let mut writebacks = 0;

        while let Some(pending) = self.inflight.pop_front() {
            trace!(
                addr = format_args!("{:#x}", pending.addr),
                target = %pending.target,
                issued_at = pending.issued_at,
                "prefetch fill"
            );

            if pending.target == CacheKind::Unified || self.inclusive {
                if !self.l2.contains(pending.addr) {
                    let out = self.l2.probe(pending.addr, false, ProbeKind::Prefetch);
                    let (p, w) = self.handle_l2_eviction(out.eviction);
                    penalty += p;
                    writebacks += w;
                }
                if pending.target == CacheKind::Unified {
                    continue;
                }
            }

            let eviction = {
                let level = if pending.target == CacheKind::Instruction {
                    &mut self.l1_i
                } else {
                    &mut self.l1_d
                };
                if level.contains(pending.addr) {
                    None
                } else {
                    level.probe(pending.addr, false, ProbeKind::Prefetch).eviction
                }
            };
            if let Some(eviction) = eviction {
                if eviction.dirty {
                    writebacks += 1;
                    penalty += self.dirty_wb_penalty;
                    let _present = self.l2.mark_dirty(eviction.block_addr);
                }
            }
        }

        (penalty, writebacks)
    }

    /// Accounts for an L2 eviction: a dirty victim is written back to
    /// memory, and under inclusion the victim is invalidated out of both
    /// L1s, with a dirty back-invalidated line also counted as written
    /// back.
    fn handle_l2_eviction(&mut self, eviction: Option<Eviction>) -> (u64, u64) {
        let mut penalty = 0;
        let mut writebacks = 0;

        if let Some(eviction) = eviction {
            if eviction.dirty {
                writebacks += 1;
                penalty += self.dirty_wb_penalty;
            }
            if self.inclusive {
                for level in [&mut self.l1_i, &mut self.l1_d] {
                    if let Some(dirty) = level.invalidate(eviction.block_addr) {
                        debug!(
                            addr = format_args!("{:#x}", eviction.block_addr),
                            cache = %level.kind(),
                            dirty,
                            "back-invalidated on L2 eviction"
                        );
                        if dirty {
                            writebacks += 1;
                            penalty += self.dirty_wb_penalty;
                        }
                    }
                }
            }
        }

        (penalty, writebacks)
    }
}
