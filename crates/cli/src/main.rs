//! Cache hierarchy simulator CLI.
//!
//! Replays a memory-reference trace through a configurable two-level cache
//! hierarchy and prints a statistics report. Configuration comes from a
//! JSON file; every field has a built-in default, so a minimal run needs
//! only the trace:
//!
//! ```text
//! cachesim -f app.trace
//! cachesim -f app.trace -c cache.json --sections misses,ipc
//! ```

use std::{fs, process};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cachesim_core::config::Config;
use cachesim_core::stats::STATS_SECTIONS;
use cachesim_core::{Simulation, TraceReader};

#[derive(Parser, Debug)]
#[command(
    name = "cachesim",
    author,
    version,
    about = "Trace-driven cache hierarchy simulator",
    long_about = "Replay a memory-reference trace through split L1 caches and a shared L2.\n\nTrace format, one reference per line:\n  # <type> <hex-addr> <inst-count> [hex-pc]\nwhere <type> is 0 (read), 1 (write), or 2 (instruction fetch).\n\nExamples:\n  cachesim -f traces/gcc.trace\n  cachesim -f traces/gcc.trace -c configs/inclusive.json\n  cachesim -f traces/gcc.trace --sections misses,ipc"
)]
struct Cli {
    /// Trace file to replay.
    #[arg(short = 'f', long = "trace")]
    trace: String,

    /// JSON configuration file (built-in defaults when omitted).
    #[arg(short, long)]
    config: Option<String>,

    /// Comma-separated report sections to print (default: all).
    #[arg(long, value_delimiter = ',')]
    sections: Vec<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    for section in &cli.sections {
        if !STATS_SECTIONS.contains(&section.as_str()) {
            eprintln!(
                "Error: unknown section '{}' (valid: {})",
                section,
                STATS_SECTIONS.join(", ")
            );
            process::exit(1);
        }
    }

    let config = match cli.config {
        Some(path) => load_config(&path),
        None => Config::default(),
    };

    let mut sim = Simulation::new(config).unwrap_or_else(|e| {
        eprintln!("Error: invalid configuration: {}", e);
        process::exit(1);
    });

    let trace = TraceReader::open(&cli.trace).unwrap_or_else(|e| {
        eprintln!("Error opening trace {}: {}", cli.trace, e);
        process::exit(1);
    });

    if let Err(e) = sim.run(trace) {
        eprintln!("Error replaying trace {}: {}", cli.trace, e);
        process::exit(1);
    }

    sim.print_report(&cli.sections);
}

/// Reads and parses a JSON configuration file, exiting on any error.
fn load_config(path: &str) -> Config {
    let text = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading config {}: {}", path, e);
        process::exit(1);
    });
    serde_json::from_str(&text).unwrap_or_else(|e| {
        eprintln!("Error parsing config {}: {}", path, e);
        process::exit(1);
    })
}
