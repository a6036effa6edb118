//! Error types for configuration validation and trace parsing.
//!
//! Two failure domains exist:
//! 1. **Configuration:** inconsistent cache geometry is fatal at construction;
//!    a hierarchy is never built from values that cannot be decomposed with
//!    shift/mask arithmetic.
//! 2. **Trace input:** a record the reader cannot parse is reported with its
//!    line number. The engine itself only ever receives valid records.

use thiserror::Error;

/// Cache geometry validation failure.
///
/// Raised once, at hierarchy construction. Geometry is never silently
/// coerced to the nearest valid value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Associativity of zero leaves no way to install a line.
    #[error("associativity must be non-zero")]
    ZeroAssociativity,

    /// Associativity beyond what the per-line recency counters can order.
    #[error("associativity {0} exceeds the supported maximum of 255")]
    AssociativityTooLarge(usize),

    /// PLRU tracks usage in a 64-bit mask, one bit per way.
    #[error("PLRU supports at most 64 ways, got {0}")]
    PlruAssociativityTooLarge(usize),

    /// Block size must be a power of two so the offset is a mask.
    #[error("block size {0} is not a power of two")]
    BlockSizeNotPowerOfTwo(usize),

    /// Capacity must decompose exactly into sets of `block_bytes * ways`.
    #[error("capacity {capacity} is not a multiple of block_bytes * ways ({unit})")]
    CapacityNotMultiple {
        /// Configured capacity in bytes.
        capacity: usize,
        /// Bytes per set: `block_bytes * ways`.
        unit: usize,
    },

    /// Set count must be a power of two so the index is a shift+mask.
    #[error("set count {0} is not a power of two")]
    SetCountNotPowerOfTwo(usize),

    /// Inclusion back-invalidates L1 lines by the L2 victim's block
    /// address, which only identifies them when block sizes match.
    #[error("inclusive hierarchy requires equal block sizes, got L1 {l1} and L2 {l2}")]
    InclusionBlockMismatch {
        /// Block size of the mismatching L1 in bytes.
        l1: usize,
        /// Block size of the L2 in bytes.
        l2: usize,
    },
}

/// Trace reading failure: I/O or a record that does not match the
/// `# <type> <hex-address> <inst-count>` format.
#[derive(Debug, Error)]
pub enum TraceError {
    /// A line that is neither blank nor a well-formed record.
    #[error("trace line {line}: malformed record: {text:?}")]
    Malformed {
        /// 1-based line number in the trace file.
        line: usize,
        /// The offending line, trimmed.
        text: String,
    },

    /// Underlying I/O failure while reading the trace.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
