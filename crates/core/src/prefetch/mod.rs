//! Hardware prefetcher implementations.
//!
//! This module contains the interface and implementations for the
//! prefetchers used to hide memory latency: next-line, per-PC stride, and
//! stream detection. Prediction is separated from issue: a prefetcher only
//! names candidate addresses; the hierarchy queues and fills them.

/// Next-line prefetcher (prefetches sequential blocks).
pub mod next_line;

/// Stream prefetcher (detects ascending/descending block streams).
pub mod stream;

/// Stride prefetcher (detects constant per-PC strides).
pub mod stride;

pub use self::next_line::NextLinePrefetcher;
pub use self::stream::StreamPrefetcher;
pub use self::stride::StridePrefetcher;

/// Trait for cache prefetcher implementations.
///
/// Prefetchers observe the demand access stream and generate candidate
/// fill addresses.
pub trait Prefetcher: Send + Sync {
    /// Observes a demand access and generates prefetch addresses.
    ///
    /// # Arguments
    ///
    /// * `pc` - Program counter of the access (0 when the trace has none)
    /// * `addr` - The address that was accessed
    /// * `hit` - Whether the access was a cache hit
    ///
    /// # Returns
    ///
    /// Candidate addresses to prefetch. Empty when no stable pattern exists.
    fn observe(&mut self, pc: u64, addr: u64, hit: bool) -> Vec<u64>;
}
