//! Configuration system for the cache hierarchy simulator.
//!
//! This module defines all configuration structures and enums used to
//! parameterize a simulation run. It provides:
//! 1. **Defaults:** baseline geometry and timing constants.
//! 2. **Structures:** hierarchical config for the three cache levels and the
//!    shared timing parameters.
//! 3. **Enums:** replacement policy, prefetch policy, and cache kind.
//!
//! Configuration is supplied as JSON (deserialized with serde) or via
//! `Config::default()`. Geometry is validated once, at hierarchy
//! construction, never per access.

use std::fmt;

use serde::Deserialize;

use crate::error::ConfigError;

/// Default configuration constants for the simulator.
///
/// These values define the baseline geometry and timing when not explicitly
/// overridden in a JSON configuration.
mod defaults {
    /// Default L1 capacity in bytes (32 KiB).
    pub const L1_CAPACITY: usize = 32 * 1024;

    /// Default L2 capacity in bytes (256 KiB).
    pub const L2_CAPACITY: usize = 256 * 1024;

    /// Default cache block size in bytes.
    ///
    /// Matches typical modern processor cache line sizes.
    pub const BLOCK_BYTES: usize = 64;

    /// Default L1 associativity.
    pub const L1_WAYS: usize = 4;

    /// Default L2 associativity.
    pub const L2_WAYS: usize = 8;

    /// Default L1 hit time in cycles.
    pub const L1_HIT_TIME: u64 = 1;

    /// Default L2 hit time in cycles.
    pub const L2_HIT_TIME: u64 = 10;

    /// Default L1 miss penalty in cycles.
    pub const L1_MISS_PENALTY: u64 = 30;

    /// Default L2 miss penalty in cycles.
    pub const L2_MISS_PENALTY: u64 = 100;

    /// Default main memory access time in cycles.
    pub const MEMORY_SPEED: u64 = 100;

    /// Default penalty for writing a dirty victim to the next level.
    pub const DIRTY_WB_PENALTY: u64 = 5;

    /// Default stride prefetcher prediction table size (entries).
    pub const PREFETCH_TABLE_SIZE: usize = 64;

    /// Default prefetch degree (lines issued per trigger).
    pub const PREFETCH_DEGREE: usize = 1;

    /// Default confirmation threshold before a detected pattern prefetches.
    pub const PREFETCH_THRESHOLD: u8 = 3;
}

/// Cache replacement policy algorithms.
///
/// Selects which line to evict when a new line must be installed in a full
/// set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReplacePolicy {
    /// Least Recently Used, realized with per-line priority counters.
    #[default]
    #[serde(alias = "Lru")]
    Lru,
    /// First In First Out: evicts the oldest fill in the set.
    #[serde(alias = "Fifo")]
    Fifo,
    /// Pseudo-LRU: approximates LRU with one usage bit per way.
    #[serde(alias = "Plru")]
    Plru,
}

/// Hardware prefetch policy for a cache level.
///
/// Prefetchers predict future accesses and issue fills ahead of demand to
/// convert future misses into hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrefetchPolicy {
    /// No prefetching.
    #[default]
    #[serde(alias = "None")]
    None,
    /// Prefetch the next sequential block(s) on every access.
    #[serde(alias = "NextLine")]
    NextLine,
    /// Detect constant per-PC strides and prefetch along them.
    #[serde(alias = "Stride")]
    Stride,
    /// Detect an ascending/descending block stream and run ahead of it.
    #[serde(alias = "Stream")]
    Stream,
}

/// Role of a cache level within the hierarchy.
///
/// A closed set: instruction L1, data L1, or the unified L2. Behavior
/// differences are selected by this tag, not by subtyping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKind {
    /// L1 instruction cache.
    Instruction,
    /// L1 data cache.
    Data,
    /// Unified second-level cache.
    Unified,
}

impl fmt::Display for CacheKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKind::Instruction => write!(f, "L1-I"),
            CacheKind::Data => write!(f, "L1-D"),
            CacheKind::Unified => write!(f, "L2"),
        }
    }
}

/// Root configuration for one simulation run.
///
/// # Examples
///
/// Deserializing from JSON:
///
/// ```
/// use cachesim_core::config::{Config, PrefetchPolicy, ReplacePolicy};
///
/// let json = r#"{
///     "hierarchy": {
///         "l1_d": {
///             "capacity_bytes": 32768,
///             "block_bytes": 128,
///             "ways": 4,
///             "policy": "LRU",
///             "prefetcher": "STRIDE"
///         },
///         "inclusive": true
///     },
///     "timing": {
///         "memory_speed": 80,
///         "dirty_wb_penalty": 5
///     }
/// }"#;
///
/// let config: Config = serde_json::from_str(json).unwrap();
/// assert_eq!(config.hierarchy.l1_d.block_bytes, 128);
/// assert_eq!(config.hierarchy.l1_d.policy, ReplacePolicy::Lru);
/// assert_eq!(config.hierarchy.l1_d.prefetcher, PrefetchPolicy::Stride);
/// assert!(config.hierarchy.inclusive);
/// assert_eq!(config.timing.memory_speed, 80);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Geometry and policy for the three cache levels.
    #[serde(default)]
    pub hierarchy: HierarchyConfig,

    /// Timing shared across the hierarchy.
    #[serde(default)]
    pub timing: TimingConfig,
}

impl Config {
    /// Validates the geometry of every level and the cross-level
    /// constraints of the hierarchy.
    ///
    /// An inclusive hierarchy requires every L1 to use the L2's block
    /// size: back-invalidation identifies L1 victims by the evicted L2
    /// block's address, so a larger L2 block would leave its other L1
    /// lines resident after the L2 copy is gone.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found, checking L1-I, L1-D, L2,
    /// then inclusion.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.hierarchy.l1_i.validate()?;
        self.hierarchy.l1_d.validate()?;
        self.hierarchy.l2.validate()?;
        if self.hierarchy.inclusive {
            for l1 in [&self.hierarchy.l1_i, &self.hierarchy.l1_d] {
                if l1.block_bytes != self.hierarchy.l2.block_bytes {
                    return Err(ConfigError::InclusionBlockMismatch {
                        l1: l1.block_bytes,
                        l2: self.hierarchy.l2.block_bytes,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Cache hierarchy configuration: an instruction L1, a data L1, and a
/// shared L2, each with independent geometry and policies.
#[derive(Debug, Clone, Deserialize)]
pub struct HierarchyConfig {
    /// L1 instruction cache.
    #[serde(default)]
    pub l1_i: LevelConfig,

    /// L1 data cache.
    #[serde(default)]
    pub l1_d: LevelConfig,

    /// Unified L2 cache.
    #[serde(default = "LevelConfig::l2_default")]
    pub l2: LevelConfig,

    /// When true, every block resident in an L1 must also be resident in L2;
    /// an L2 eviction back-invalidates the matching L1 line.
    #[serde(default)]
    pub inclusive: bool,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            l1_i: LevelConfig::default(),
            l1_d: LevelConfig::default(),
            l2: LevelConfig::l2_default(),
            inclusive: false,
        }
    }
}

/// Hierarchy-wide timing parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct TimingConfig {
    /// Main memory access time in cycles, charged on an L2 miss.
    #[serde(default = "TimingConfig::default_memory_speed")]
    pub memory_speed: u64,

    /// Penalty in cycles for writing a dirty victim to the next level.
    #[serde(default = "TimingConfig::default_dirty_wb_penalty")]
    pub dirty_wb_penalty: u64,
}

impl TimingConfig {
    fn default_memory_speed() -> u64 {
        defaults::MEMORY_SPEED
    }

    fn default_dirty_wb_penalty() -> u64 {
        defaults::DIRTY_WB_PENALTY
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            memory_speed: defaults::MEMORY_SPEED,
            dirty_wb_penalty: defaults::DIRTY_WB_PENALTY,
        }
    }
}

/// Individual cache level configuration.
///
/// The set count is derived as `capacity_bytes / (block_bytes * ways)` and
/// must come out a power of two, as must `block_bytes`, so address
/// decomposition is pure shift/mask.
#[derive(Debug, Clone, Deserialize)]
pub struct LevelConfig {
    /// Total capacity in bytes.
    #[serde(default = "LevelConfig::default_capacity")]
    pub capacity_bytes: usize,

    /// Block (line) size in bytes. Power of two.
    #[serde(default = "LevelConfig::default_block")]
    pub block_bytes: usize,

    /// Associativity (number of ways per set).
    #[serde(default = "LevelConfig::default_ways")]
    pub ways: usize,

    /// Access latency in cycles on a hit.
    #[serde(default = "LevelConfig::default_hit_time")]
    pub hit_time: u64,

    /// Cycle-model penalty accrued per demand miss at this level.
    #[serde(default = "LevelConfig::default_miss_penalty")]
    pub miss_penalty: u64,

    /// Replacement policy.
    #[serde(default)]
    pub policy: ReplacePolicy,

    /// Hardware prefetch policy.
    #[serde(default)]
    pub prefetcher: PrefetchPolicy,

    /// Stride prefetcher prediction table size (entries, power of two).
    #[serde(default = "LevelConfig::default_prefetch_table")]
    pub prefetch_table_size: usize,

    /// Prefetch degree: blocks issued per trigger.
    #[serde(default = "LevelConfig::default_prefetch_degree")]
    pub prefetch_degree: usize,

    /// Confirmations required before a detected pattern starts prefetching.
    #[serde(default = "LevelConfig::default_prefetch_threshold")]
    pub prefetch_threshold: u8,
}

impl LevelConfig {
    fn default_capacity() -> usize {
        defaults::L1_CAPACITY
    }

    fn default_block() -> usize {
        defaults::BLOCK_BYTES
    }

    fn default_ways() -> usize {
        defaults::L1_WAYS
    }

    fn default_hit_time() -> u64 {
        defaults::L1_HIT_TIME
    }

    fn default_miss_penalty() -> u64 {
        defaults::L1_MISS_PENALTY
    }

    fn default_prefetch_table() -> usize {
        defaults::PREFETCH_TABLE_SIZE
    }

    fn default_prefetch_degree() -> usize {
        defaults::PREFETCH_DEGREE
    }

    fn default_prefetch_threshold() -> u8 {
        defaults::PREFETCH_THRESHOLD
    }

    /// Default geometry for the unified L2: larger, more associative,
    /// slower than the L1 defaults.
    pub fn l2_default() -> Self {
        Self {
            capacity_bytes: defaults::L2_CAPACITY,
            ways: defaults::L2_WAYS,
            hit_time: defaults::L2_HIT_TIME,
            miss_penalty: defaults::L2_MISS_PENALTY,
            ..Self::default()
        }
    }

    /// Validates the geometry and returns the derived set count.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the associativity is zero, above 255,
    /// or above 64 under PLRU (one usage bit per way in a 64-bit mask),
    /// `block_bytes` is not a power of two, the capacity is not an exact
    /// multiple of `block_bytes * ways`, or the derived set count is not a
    /// power of two.
    pub fn validate(&self) -> Result<usize, ConfigError> {
        if self.ways == 0 {
            return Err(ConfigError::ZeroAssociativity);
        }
        if self.ways > usize::from(u8::MAX) {
            return Err(ConfigError::AssociativityTooLarge(self.ways));
        }
        if self.policy == ReplacePolicy::Plru && self.ways > 64 {
            return Err(ConfigError::PlruAssociativityTooLarge(self.ways));
        }
        if !self.block_bytes.is_power_of_two() {
            return Err(ConfigError::BlockSizeNotPowerOfTwo(self.block_bytes));
        }
        let unit = self.block_bytes * self.ways;
        if self.capacity_bytes == 0 || self.capacity_bytes % unit != 0 {
            return Err(ConfigError::CapacityNotMultiple {
                capacity: self.capacity_bytes,
                unit,
            });
        }
        let sets = self.capacity_bytes / unit;
        if !sets.is_power_of_two() {
            return Err(ConfigError::SetCountNotPowerOfTwo(sets));
        }
        Ok(sets)
    }
}

impl Default for LevelConfig {
    /// Creates a default L1-style level: 32 KiB, 4-way, 64-byte blocks,
    /// LRU replacement, no prefetching.
    fn default() -> Self {
        Self {
            capacity_bytes: defaults::L1_CAPACITY,
            block_bytes: defaults::BLOCK_BYTES,
            ways: defaults::L1_WAYS,
            hit_time: defaults::L1_HIT_TIME,
            miss_penalty: defaults::L1_MISS_PENALTY,
            policy: ReplacePolicy::default(),
            prefetcher: PrefetchPolicy::default(),
            prefetch_table_size: defaults::PREFETCH_TABLE_SIZE,
            prefetch_degree: defaults::PREFETCH_DEGREE,
            prefetch_threshold: defaults::PREFETCH_THRESHOLD,
        }
    }
}
