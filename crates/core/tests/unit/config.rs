//! Configuration Parsing and Validation Unit Tests.

use cachesim_core::config::{Config, LevelConfig, PrefetchPolicy, ReplacePolicy};
use cachesim_core::error::ConfigError;
use pretty_assertions::assert_eq;

// ──────────────────────────────────────────────────────────
// Defaults and deserialization
// ──────────────────────────────────────────────────────────

/// The built-in defaults validate and describe the documented hierarchy:
/// 32 KiB 4-way L1s, a 256 KiB 8-way L2, 64-byte blocks everywhere.
#[test]
fn defaults_validate() {
    let config = Config::default();
    assert!(config.validate().is_ok());

    assert_eq!(config.hierarchy.l1_d.capacity_bytes, 32 * 1024);
    assert_eq!(config.hierarchy.l1_d.ways, 4);
    assert_eq!(config.hierarchy.l2.capacity_bytes, 256 * 1024);
    assert_eq!(config.hierarchy.l2.ways, 8);
    assert!(!config.hierarchy.inclusive);
}

/// An empty JSON object yields the full default configuration.
#[test]
fn empty_json_is_all_defaults() {
    let config: Config = serde_json::from_str("{}").unwrap();
    assert_eq!(config.hierarchy.l1_i.block_bytes, 64);
    assert_eq!(config.timing.memory_speed, 100);
}

/// Partial overrides keep every unmentioned field at its default.
#[test]
fn partial_override_keeps_defaults() {
    let config: Config = serde_json::from_str(
        r#"{"hierarchy": {"l1_d": {"ways": 8}, "inclusive": true}}"#,
    )
    .unwrap();

    assert_eq!(config.hierarchy.l1_d.ways, 8);
    assert_eq!(config.hierarchy.l1_d.capacity_bytes, 32 * 1024);
    assert_eq!(config.hierarchy.l1_i.ways, 4);
    assert!(config.hierarchy.inclusive);
}

/// Policy and prefetcher names parse in both UPPERCASE and PascalCase.
#[test]
fn enum_spellings() {
    let a: LevelConfig =
        serde_json::from_str(r#"{"policy": "PLRU", "prefetcher": "NEXT_LINE"}"#).unwrap();
    let b: LevelConfig =
        serde_json::from_str(r#"{"policy": "Plru", "prefetcher": "NextLine"}"#).unwrap();

    assert_eq!(a.policy, ReplacePolicy::Plru);
    assert_eq!(a.prefetcher, PrefetchPolicy::NextLine);
    assert_eq!(b.policy, a.policy);
    assert_eq!(b.prefetcher, a.prefetcher);
}

#[test]
fn unknown_policy_is_rejected() {
    assert!(serde_json::from_str::<LevelConfig>(r#"{"policy": "MRU"}"#).is_err());
}

// ──────────────────────────────────────────────────────────
// Geometry validation
// ──────────────────────────────────────────────────────────

#[test]
fn zero_ways_rejected() {
    let config = LevelConfig {
        ways: 0,
        ..LevelConfig::default()
    };
    assert_eq!(config.validate(), Err(ConfigError::ZeroAssociativity));
}

#[test]
fn oversized_associativity_rejected() {
    let config = LevelConfig {
        capacity_bytes: 512 * 64,
        ways: 512,
        ..LevelConfig::default()
    };
    assert_eq!(
        config.validate(),
        Err(ConfigError::AssociativityTooLarge(512))
    );
}

#[test]
fn non_power_of_two_block_rejected() {
    let config = LevelConfig {
        block_bytes: 96,
        ..LevelConfig::default()
    };
    assert_eq!(
        config.validate(),
        Err(ConfigError::BlockSizeNotPowerOfTwo(96))
    );
}

/// Capacity must decompose exactly into sets of `block_bytes * ways`.
#[test]
fn ragged_capacity_rejected() {
    let config = LevelConfig {
        capacity_bytes: 1000,
        block_bytes: 64,
        ways: 4,
        ..LevelConfig::default()
    };
    assert_eq!(
        config.validate(),
        Err(ConfigError::CapacityNotMultiple {
            capacity: 1000,
            unit: 256,
        })
    );
}

/// A capacity that divides evenly but yields a non-power-of-two set
/// count is still rejected: the index must be a shift+mask.
#[test]
fn non_power_of_two_sets_rejected() {
    let config = LevelConfig {
        capacity_bytes: 3 * 256,
        block_bytes: 64,
        ways: 4,
        ..LevelConfig::default()
    };
    assert_eq!(config.validate(), Err(ConfigError::SetCountNotPowerOfTwo(3)));
}

/// The derived set count is `capacity / (block * ways)`.
#[test]
fn derived_set_count() {
    let config = LevelConfig {
        capacity_bytes: 32768,
        block_bytes: 128,
        ways: 4,
        ..LevelConfig::default()
    };
    assert_eq!(config.validate(), Ok(64));
}

/// `Config::validate` checks every level, not just the first.
#[test]
fn validate_covers_all_levels() {
    let mut config = Config::default();
    config.hierarchy.l2.block_bytes = 100;
    assert!(config.validate().is_err());
}

/// PLRU has one usage bit per way in a 64-bit mask, so its associativity
/// cap is tighter than the general 255-way limit; the same geometry is
/// fine under LRU.
#[test]
fn plru_caps_associativity_at_64() {
    let config = LevelConfig {
        capacity_bytes: 65 * 64,
        block_bytes: 64,
        ways: 65,
        policy: ReplacePolicy::Plru,
        ..LevelConfig::default()
    };
    assert_eq!(
        config.validate(),
        Err(ConfigError::PlruAssociativityTooLarge(65))
    );

    let lru = LevelConfig {
        policy: ReplacePolicy::Lru,
        ..config
    };
    assert_eq!(lru.validate(), Ok(1));
}

/// Inclusion identifies L1 victims by the evicted L2 block's address, so
/// an inclusive hierarchy must use one block size throughout. The same
/// mix is fine without inclusion.
#[test]
fn inclusive_requires_matching_block_sizes() {
    let mut config = Config::default();
    config.hierarchy.l1_d.block_bytes = 64;
    config.hierarchy.l2.block_bytes = 128;
    assert!(config.validate().is_ok());

    config.hierarchy.inclusive = true;
    assert_eq!(
        config.validate(),
        Err(ConfigError::InclusionBlockMismatch { l1: 64, l2: 128 })
    );

    config.hierarchy.l1_i.block_bytes = 128;
    config.hierarchy.l1_d.block_bytes = 128;
    assert!(config.validate().is_ok());
}
