//! Music Auditor - a one-shot audio library audit tool.
//!
//! Scans a directory tree in parallel, classifies every file, and reports
//! library statistics, a deduplicated album index (flagging redundant
//! copies), and byte-identical duplicate tracks. Optional passes normalize
//! tag capitalization, remove OS-generated junk files, and interactively
//! fill missing metadata by folder.

pub mod audit;
pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod fixup;
pub mod metadata;
pub mod normalize;
pub mod probe;
pub mod report;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Verbose scans trace every file; everything else stays at info.
    let cli::Commands::Scan { verbose, .. } = &args.command;
    let default_level = if *verbose {
        "music_auditor=debug"
    } else {
        "music_auditor=info"
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(EnvFilter::from_default_env().add_directive(default_level.parse()?))
        .init();

    cli::run_command(&args)
}
