//! Unit tests for one cache level and its supporting machinery.



/// Replacement policy ordering tests.
pub mod policies;
