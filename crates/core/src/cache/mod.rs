//! Set-associative cache level.
//!
//! This module implements one configurable set-associative cache (L1-I,
//! L1-D, or the unified L2). It owns its lines, decomposes addresses with
//! [`AddressDecoder`], orders victims through a [`ReplacementPolicy`],
//! tracks dirty state, and classifies demand misses as compulsory or
//! conflict/capacity.

/// Address decomposition into tag, set index, and block offset.
pub mod decode;

/// Cache replacement policy implementations (LRU, FIFO, PLRU).
pub mod policies;

use tracing::trace;

use self::decode::AddressDecoder;
use self::policies::{FifoPolicy, LruPolicy, PlruPolicy, ReplacementPolicy};
use crate::config::{CacheKind, LevelConfig, PrefetchPolicy, ReplacePolicy};
use crate::error::ConfigError;
use crate::prefetch::{NextLinePrefetcher, Prefetcher, StreamPrefetcher, StridePrefetcher};
use crate::stats::LevelStats;

/// Cache line entry: tag plus validity, dirty, and prefetch-origin bits.
#[derive(Clone, Default)]
struct CacheLine {
    tag: u64,
    valid: bool,
    dirty: bool,
    /// Line was installed by a prefetch and has not been demanded since.
    prefetched: bool,
}

/// How a probe reached the cache: on the demand path of a trace record, or
/// as a speculative prefetch fill.
///
/// Prefetch probes update no demand counters, never affect compulsory
/// classification, and break victim ties toward other prefetched lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeKind {
    /// Demand access from a trace record.
    Demand,
    /// Speculative fill issued by a prefetcher.
    Prefetch,
}

/// An evicted valid line, reported to the caller for write-back accounting
/// and inclusion maintenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eviction {
    /// Base address of the evicted block.
    pub block_addr: u64,
    /// The victim held unflushed writes.
    pub dirty: bool,
}

/// Result of probing one cache level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeOutcome {
    /// The address was resident.
    pub hit: bool,
    /// Valid line displaced by the fill, if any.
    pub eviction: Option<Eviction>,
}

/// One set-associative cache level.
///
/// Geometry is validated at construction; probes are pure shift/mask plus
/// an O(associativity) scan of the target set.
pub struct CacheLevel {
    kind: CacheKind,
    decoder: AddressDecoder,
    lines: Vec<CacheLine>,
    sets: usize,
    ways: usize,
    block_bytes: usize,
    hit_time: u64,
    miss_penalty: u64,
    policy: Box<dyn ReplacementPolicy>,
    prefetcher: Option<Box<dyn Prefetcher>>,
    /// Tags ever resident per set, for compulsory-vs-other classification.
    seen: Vec<ahash::AHashSet<u64>>,
    stats: LevelStats,
}

impl CacheLevel {
    /// Builds a cache level from its configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the geometry cannot be decomposed
    /// with shift/mask arithmetic (see [`LevelConfig::validate`]).
    pub fn new(kind: CacheKind, config: &LevelConfig) -> Result<Self, ConfigError> {
        let sets = config.validate()?;
        let decoder = AddressDecoder::new(config.block_bytes, sets)?;

        let policy: Box<dyn ReplacementPolicy> = match config.policy {
            ReplacePolicy::Lru => Box::new(LruPolicy::new(sets, config.ways)),
            ReplacePolicy::Fifo => Box::new(FifoPolicy::new(sets, config.ways)),
            ReplacePolicy::Plru => Box::new(PlruPolicy::new(sets, config.ways)),
        };

        let prefetcher: Option<Box<dyn Prefetcher>> = match config.prefetcher {
            PrefetchPolicy::None => None,
            PrefetchPolicy::NextLine => Some(Box::new(NextLinePrefetcher::new(
                config.block_bytes,
                config.prefetch_degree,
            ))),
            PrefetchPolicy::Stride => Some(Box::new(StridePrefetcher::new(
                config.block_bytes,
                config.prefetch_table_size,
                config.prefetch_degree,
                config.prefetch_threshold,
            ))),
            PrefetchPolicy::Stream => Some(Box::new(StreamPrefetcher::new(
                config.block_bytes,
                config.prefetch_degree,
                config.prefetch_threshold,
            ))),
        };

        Ok(Self {
            kind,
            decoder,
            lines: vec![CacheLine::default(); sets * config.ways],
            sets,
            ways: config.ways,
            block_bytes: config.block_bytes,
            hit_time: config.hit_time,
            miss_penalty: config.miss_penalty,
            policy,
            prefetcher,
            seen: vec![ahash::AHashSet::default(); sets],
            stats: LevelStats::default(),
        })
    }

    /// Role of this level in the hierarchy.
    pub fn kind(&self) -> CacheKind {
        self.kind
    }

    /// Number of sets.
    pub fn sets(&self) -> usize {
        self.sets
    }

    /// Associativity.
    pub fn ways(&self) -> usize {
        self.ways
    }

    /// Block size in bytes.
    pub fn block_bytes(&self) -> usize {
        self.block_bytes
    }

    /// Total capacity in bytes: `sets * ways * block_bytes`.
    pub fn capacity(&self) -> usize {
        self.sets * self.ways * self.block_bytes
    }

    /// Hit latency in cycles.
    pub fn hit_time(&self) -> u64 {
        self.hit_time
    }

    /// Cycle-model penalty per demand miss at this level.
    pub fn miss_penalty(&self) -> u64 {
        self.miss_penalty
    }

    /// Accumulated per-level statistics.
    pub fn stats(&self) -> &LevelStats {
        &self.stats
    }

    /// The address decoder for this level's geometry.
    pub fn decoder(&self) -> &AddressDecoder {
        &self.decoder
    }

    /// Whether the block containing `addr` is resident.
    pub fn contains(&self, addr: u64) -> bool {
        let set = self.decoder.set_index(addr);
        let tag = self.decoder.tag(addr);
        let base = set * self.ways;
        self.lines[base..base + self.ways]
            .iter()
            .any(|line| line.valid && line.tag == tag)
    }

    /// Probes the cache for `addr`, installing the block on a miss.
    ///
    /// On a hit the line's dirty bit absorbs `is_write`, its prefetch mark
    /// is cleared by demand, and the replacement state is updated. On a
    /// miss a victim is chosen (invalid ways always preferred over evicting
    /// a valid line), the displaced line is reported, and the new line is
    /// installed dirty iff the missing access is itself a write.
    ///
    /// Demand probes bump the reference/miss counters and classify misses;
    /// prefetch probes leave every demand statistic untouched.
    pub fn probe(&mut self, addr: u64, is_write: bool, kind: ProbeKind) -> ProbeOutcome {
        let set = self.decoder.set_index(addr);
        let tag = self.decoder.tag(addr);
        let base = set * self.ways;

        if kind == ProbeKind::Demand {
            self.stats.refs += 1;
        }

        let mut hit_way: Option<usize> = None;
        for w in 0..self.ways {
            let line = &self.lines[base + w];
            if line.valid && line.tag == tag {
                debug_assert!(
                    hit_way.is_none(),
                    "two valid lines share tag {tag:#x} in set {set}"
                );
                hit_way = Some(w);
            }
        }

        if let Some(way) = hit_way {
            let line = &mut self.lines[base + way];
            line.dirty |= is_write;
            if kind == ProbeKind::Demand {
                line.prefetched = false;
            }
            self.policy.touch(set, way);
            return ProbeOutcome {
                hit: true,
                eviction: None,
            };
        }

        if kind == ProbeKind::Demand {
            self.stats.misses += 1;
            self.stats.penalties += self.miss_penalty;
            if self.seen[set].insert(tag) {
                self.stats.compulsory_misses += 1;
            } else {
                self.stats.other_misses += 1;
            }
        }

        let way = self.victim_way(set, kind);
        let idx = base + way;
        let eviction = if self.lines[idx].valid {
            let victim = &self.lines[idx];
            trace!(
                cache = %self.kind,
                set,
                way,
                victim = format_args!("{:#x}", self.decoder.block_addr(set, victim.tag)),
                dirty = victim.dirty,
                "evict"
            );
            Some(Eviction {
                block_addr: self.decoder.block_addr(set, victim.tag),
                dirty: victim.dirty,
            })
        } else {
            None
        };

        self.lines[idx] = CacheLine {
            tag,
            valid: true,
            dirty: is_write,
            prefetched: kind == ProbeKind::Prefetch,
        };
        self.policy.fill(set, way);

        ProbeOutcome {
            hit: false,
            eviction,
        }
    }

    /// Selects the victim way for a fill into `set`.
    ///
    /// An invalid way is always preferred. Otherwise the highest-ranked way
    /// wins; ranks tie toward the lowest way index, except that a prefetch
    /// fill ties toward lines that were themselves prefetched, so
    /// speculation never displaces demand data ahead of its turn.
    fn victim_way(&self, set: usize, kind: ProbeKind) -> usize {
        let base = set * self.ways;
        if let Some(way) = (0..self.ways).find(|&w| !self.lines[base + w].valid) {
            return way;
        }

        let mut best = 0;
        let mut best_rank = self.policy.rank(set, 0);
        let mut best_prefetched = self.lines[base].prefetched;
        for w in 1..self.ways {
            let rank = self.policy.rank(set, w);
            let prefetched = self.lines[base + w].prefetched;
            let better = rank > best_rank
                || (kind == ProbeKind::Prefetch
                    && rank == best_rank
                    && prefetched
                    && !best_prefetched);
            if better {
                best = w;
                best_rank = rank;
                best_prefetched = prefetched;
            }
        }
        best
    }

    /// Invalidates the block containing `addr` if resident.
    ///
    /// Returns `Some(dirty)` when a line was dropped, for write-back
    /// accounting by the caller. Used for inclusion back-invalidation.
    pub fn invalidate(&mut self, addr: u64) -> Option<bool> {
        let set = self.decoder.set_index(addr);
        let tag = self.decoder.tag(addr);
        let base = set * self.ways;
        for line in &mut self.lines[base..base + self.ways] {
            if line.valid && line.tag == tag {
                let dirty = line.dirty;
                line.valid = false;
                line.dirty = false;
                line.prefetched = false;
                return Some(dirty);
            }
        }
        None
    }

    /// Marks the block containing `addr` dirty if resident, without
    /// promoting its recency: a write-back landing from the inner level is
    /// not a demand reuse.
    pub fn mark_dirty(&mut self, addr: u64) -> bool {
        let set = self.decoder.set_index(addr);
        let tag = self.decoder.tag(addr);
        let base = set * self.ways;
        for line in &mut self.lines[base..base + self.ways] {
            if line.valid && line.tag == tag {
                line.dirty = true;
                return true;
            }
        }
        false
    }

    /// Lets this level's prefetcher observe a demand access, returning the
    /// candidate addresses it wants filled. Empty without a prefetcher.
    pub fn prefetch_targets(&mut self, pc: u64, addr: u64, hit: bool) -> Vec<u64> {
        match &mut self.prefetcher {
            Some(prefetcher) => prefetcher.observe(pc, addr, hit),
            None => Vec::new(),
        }
    }
}
