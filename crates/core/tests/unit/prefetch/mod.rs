//! Unit tests for the hardware prefetchers.

/// Next-line prefetcher tests.
pub mod next_line;
