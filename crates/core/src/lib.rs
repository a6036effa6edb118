//! Trace-driven cache hierarchy simulator.
//!
//! Models a two-level hierarchy of set-associative caches: split L1
//! instruction and data caches in front of a shared, optionally inclusive
//! L2. Memory references are replayed from a text trace; the simulator
//! tracks hits, misses (split compulsory vs. other), dirty write-backs, and
//! cycle counts, and can drive hardware prefetchers at either level.
//!
//! The usual entry point is [`Simulation`]:
//!
//! ```no_run
//! use cachesim_core::{Config, Simulation, TraceReader};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut sim = Simulation::new(Config::default())?;
//! sim.run(TraceReader::open("app.trace")?)?;
//! sim.print_report(&[]);
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod hierarchy;
pub mod prefetch;
pub mod sim;
pub mod stats;
pub mod trace;

pub use config::Config;
pub use hierarchy::CacheHierarchy;
pub use sim::Simulation;
pub use trace::{AccessRecord, TraceReader};
