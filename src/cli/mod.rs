//! Command-line interface for music-auditor.
//!
//! This module provides the scan command and its dispatch; all actual work
//! lives in the `audit` pipeline and its collaborators.

mod commands;

pub use commands::{Cli, Commands, run_command};
