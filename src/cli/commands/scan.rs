//! The library scan command.

use std::path::Path;
use tokio::runtime::Runtime;
use tracing::error;

use crate::audit::{self, ScanOptions};
use crate::fixup;
use crate::metadata::TagField;
use crate::report;

/// Scan a directory tree, render the report, then run any requested
/// interactive fix phases.
///
/// The only error that aborts the run is an invalid root directory; per-file
/// failures surface in the report instead.
pub fn cmd_scan(rt: &Runtime, directory: &Path, options: ScanOptions) -> anyhow::Result<()> {
    println!("Scanning directory: {}", directory.display());

    let outcome = match rt.block_on(audit::scan_directory(directory, options.clone())) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(target: "audit::scan", error = %e, "scan aborted");
            return Err(e.into());
        }
    };

    report::render(&outcome, &options, directory);

    for field in [TagField::Artist, TagField::AlbumArtist, TagField::Album] {
        if !options.fix_missing(field) {
            continue;
        }
        let folders = outcome.totals.folders_missing(field);
        if !folders.is_empty() {
            fixup::prompt_fix_missing(folders, field, &options.exceptions);
        }
    }

    Ok(())
}
