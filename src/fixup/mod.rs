//! Interactive fix-by-folder for missing tag fields.
//!
//! Runs after the report, once per folder the scan flagged as missing a
//! field. The entered value is normalized, confirmed, and written to every
//! affected media file in the folder. Purely sequential and prompt-driven;
//! nothing here touches the pipeline.

use std::collections::{BTreeSet, HashSet};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::classify;
use crate::metadata::{self, TagField};
use crate::normalize::normalize_capitalization;

/// Walk the flagged folders and prompt for a value per folder.
pub fn prompt_fix_missing(
    folders: &BTreeSet<PathBuf>,
    field: TagField,
    exceptions: &HashSet<String>,
) {
    let stdin = std::io::stdin();

    for folder in folders {
        println!("{}", "=".repeat(80));
        println!(
            "Metadata '{}' missing for tracks in {}.",
            field.label(),
            folder.display()
        );

        let affected = collect_affected(folder, field);
        if affected.is_empty() {
            println!("No affected files found.");
            continue;
        }
        println!("Affected files:");
        for file in &affected {
            println!("- {}", file.display());
        }

        print!(
            "Enter {} to fix (return blank to cancel): ",
            field.label()
        );
        let _ = std::io::stdout().flush();
        let mut input = String::new();
        if stdin.lock().read_line(&mut input).is_err() {
            return;
        }
        let input = input.trim();
        if input.is_empty() {
            println!("No changes made.");
            continue;
        }

        let normalized = normalize_capitalization(input, exceptions);
        println!(
            "{} will be set to '{}'. Is that OK? (Y/n)",
            field.label(),
            normalized
        );
        let mut confirmation = String::new();
        if stdin.lock().read_line(&mut confirmation).is_err() {
            return;
        }
        if confirmation.trim().eq_ignore_ascii_case("n") {
            println!("Changes canceled.");
            continue;
        }

        for file in &affected {
            match metadata::write_field(file, field, &normalized) {
                Ok(()) => println!(
                    "Set {} for {} to '{}'",
                    field.label(),
                    file.display(),
                    normalized
                ),
                Err(e) => {
                    warn!(target: "audit::fixup", file = %file.display(), error = %e, "write failed");
                    eprintln!("Error setting {} for {}: {e}", field.label(), file.display());
                }
            }
        }
    }
}

/// Media files in `folder` (non-recursive, hidden files skipped) that are
/// readable but missing `field`. Corrupt files are reported and skipped.
fn collect_affected(folder: &Path, field: TagField) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(folder) else {
        return Vec::new();
    };

    let mut affected = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('.'))
        {
            continue;
        }
        if !classify::is_media_file(&path) {
            continue;
        }

        let tags = metadata::read(&path);
        if tags.corrupt {
            eprintln!("Error: file '{}' is corrupt!", path.display());
            continue;
        }
        if tags.field(field).is_none() {
            affected.push(path);
        }
    }
    affected.sort();
    affected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::build_tree;
    use tempfile::tempdir;

    #[test]
    fn test_collect_affected_skips_non_media_and_corrupt() {
        let dir = tempdir().unwrap();
        build_tree(
            dir.path(),
            &[
                // Garbage media reads as corrupt and is skipped.
                ("broken.mp3", b"not mpeg" as &[u8]),
                ("notes.txt", b"text"),
                (".hidden.mp3", b"hidden"),
            ],
        );

        let affected = collect_affected(dir.path(), TagField::Artist);
        assert!(affected.is_empty());
    }

    #[test]
    fn test_collect_affected_missing_folder_is_empty() {
        let affected = collect_affected(Path::new("/no/such/folder"), TagField::Album);
        assert!(affected.is_empty());
    }
}
