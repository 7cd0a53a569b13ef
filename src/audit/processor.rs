//! Per-file processing.
//!
//! Orchestrates the classifier, tag reader, probes, fingerprinter, and
//! normalizer for one file, mutating exactly one worker-local
//! [`Accumulator`]. No shared state is touched here, and no error escapes:
//! every per-file failure degrades to recorded accumulator state.

use std::path::Path;

use tracing::{debug, warn};

use crate::audit::ScanOptions;
use crate::audit::accumulator::{Accumulator, NormalizedChange, Track};
use crate::classify;
use crate::error::Error;
use crate::metadata::{self, TagField};
use crate::normalize::normalize_capitalization;
use crate::{fingerprint, probe};

const TAG_FIELDS: [TagField; 3] = [TagField::Artist, TagField::AlbumArtist, TagField::Album];

/// Process one discovered file.
pub fn process_file(path: &Path, options: &ScanOptions, acc: &mut Accumulator) {
    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();

    if options.verbose {
        debug!(target: "audit::worker", file = %path.display(), "processing");
    }

    acc.total_files += 1;

    // Cleanup candidates are never treated as media.
    if options.remove_junk_files
        && let Some(kind) = classify::junk_kind(file_name)
    {
        match std::fs::remove_file(path) {
            Ok(()) => {
                debug!(target: "audit::cleanup", file = %path.display(), "removed");
                acc.junk_removed.bump(kind);
            }
            Err(e) => {
                warn!(target: "audit::cleanup", file = %path.display(), error = %e, "remove failed");
            }
        }
        return;
    }

    let Some(ext) = classify::media_extension(path) else {
        acc.non_media_files += 1;
        *acc
            .other_extensions
            .entry(classify::extension(path))
            .or_default() += 1;
        return;
    };

    acc.media_files += 1;
    *acc.media_extensions.entry(ext).or_default() += 1;

    let tags = metadata::read(path);
    if tags.corrupt {
        record_corrupt(acc, Error::MetadataCorrupt(path.to_path_buf()), path);
        return;
    }
    if options.verbose {
        debug!(
            target: "audit::worker",
            file = %path.display(),
            artist = ?tags.artist,
            album = ?tags.album,
            disc = ?tags.disc,
            total_discs = ?tags.total_discs,
            "tags read"
        );
    }

    // Opt-in: parsing stream properties is slow at library scale. A file
    // whose duration cannot be read is treated as corrupt.
    if options.count_duration {
        match probe::duration_secs(path) {
            Some(duration) => acc.total_duration += duration,
            None => {
                record_corrupt(acc, Error::ProbeFailure(path.to_path_buf()), path);
                return;
            }
        }
    }

    let file_size = match probe::file_size(path) {
        Ok(size) => size,
        Err(e) => {
            record_corrupt(acc, e, path);
            return;
        }
    };
    acc.total_size += file_size;

    // Opt-in: checksum streaming reads the whole file. A failure leaves the
    // track without a fingerprint but keeps it in every other structure.
    let checksum = if options.list_duplicate_tracks {
        match fingerprint::checksum_file(path) {
            Ok(crc) => Some(crc),
            Err(e) => {
                let err = Error::checksum(path, e);
                warn!(target: "audit::worker", error = %err, "fingerprint absent");
                None
            }
        }
    } else {
        None
    };

    let folder = path.parent().unwrap_or_else(|| Path::new("")).to_path_buf();

    for field in TAG_FIELDS {
        if tags.field(field).is_some() {
            continue;
        }
        if options.list_missing(field) {
            acc.missing_paths_mut(field).push(path.to_path_buf());
            acc.folders_missing_mut(field).insert(folder.clone());
        }
        if options.fix_missing(field) {
            acc.folders_missing_mut(field).insert(folder.clone());
        }
    }

    if options.normalize_capitalization {
        normalize_and_write(path, &tags, options, acc);
    }

    // Album indexing needs both a title and a primary artist. The disc
    // marker keeps multi-disc albums from reading as redundant copies of
    // one single-disc album.
    if let (Some(album), Some(artist)) = (tags.album.as_deref(), tags.artist.as_deref()) {
        let key_name = match tags.disc {
            Some(disc) => format!("{album} (Disc {disc})"),
            None => album.to_string(),
        };
        let outcome = acc
            .albums
            .insert(&key_name, artist, &folder, tags.album_artist.as_deref(), 1);
        if outcome.is_new {
            acc.new_albums += 1;
        }
        if outcome.is_redundant {
            acc.redundant_albums += 1;
        }
    }

    acc.tracks.push(Track {
        path: path.to_path_buf(),
        artist: tags.artist,
        album_artist: tags.album_artist,
        album: tags.album,
        file_size,
        checksum,
    });
}

/// Log a per-file failure and move the file to the corrupt list. This is the
/// whole error-propagation story inside a worker: state, never Err.
fn record_corrupt(acc: &mut Accumulator, err: Error, path: &Path) {
    warn!(target: "audit::worker", error = %err, "file excluded");
    acc.corrupt_files.push(path.to_path_buf());
}

/// Normalize each present tag field and persist fields that changed.
fn normalize_and_write(
    path: &Path,
    tags: &metadata::TagData,
    options: &ScanOptions,
    acc: &mut Accumulator,
) {
    for field in TAG_FIELDS {
        let Some(original) = tags.field(field) else {
            continue;
        };
        let updated = normalize_capitalization(original, &options.exceptions);
        if updated == original {
            continue;
        }
        match metadata::write_field(path, field, &updated) {
            Ok(()) => {
                debug!(
                    target: "audit::normalize",
                    file = %path.display(),
                    field = field.label(),
                    from = original,
                    to = %updated,
                    "normalized"
                );
                acc.normalized.push(NormalizedChange {
                    path: path.to_path_buf(),
                    field,
                    original: original.to_string(),
                    updated,
                });
            }
            Err(e) => {
                warn!(target: "audit::normalize", file = %path.display(), error = %e, "write failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn options() -> ScanOptions {
        ScanOptions::default()
    }

    #[test]
    fn test_non_media_file_is_counted_by_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cover.png");
        std::fs::write(&path, b"not an image either").unwrap();

        let mut acc = Accumulator::default();
        process_file(&path, &options(), &mut acc);

        assert_eq!(acc.total_files, 1);
        assert_eq!(acc.media_files, 0);
        assert_eq!(acc.non_media_files, 1);
        assert_eq!(acc.other_extensions.get("png"), Some(&1));
        assert!(acc.tracks.is_empty());
    }

    #[test]
    fn test_corrupt_media_file_is_isolated() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.mp3");
        std::fs::write(&path, b"garbage, not an mpeg stream").unwrap();

        let mut opts = options();
        opts.list_duplicate_tracks = true;
        opts.list_unknown_artist = true;

        let mut acc = Accumulator::default();
        process_file(&path, &opts, &mut acc);

        // Counted as a media file, listed as corrupt, present nowhere else.
        assert_eq!(acc.total_files, 1);
        assert_eq!(acc.media_files, 1);
        assert_eq!(acc.corrupt_files, vec![path]);
        assert!(acc.tracks.is_empty());
        assert_eq!(acc.albums.album_count(), 0);
        assert!(acc.missing_artist.is_empty());
        assert_eq!(acc.total_size, 0);
    }

    #[test]
    fn test_junk_file_removed_when_enabled() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Thumbs.db");
        std::fs::write(&path, b"junk").unwrap();

        let mut opts = options();
        opts.remove_junk_files = true;

        let mut acc = Accumulator::default();
        process_file(&path, &opts, &mut acc);

        assert!(!path.exists());
        assert_eq!(acc.junk_removed.thumbs_db, 1);
        assert_eq!(acc.total_files, 1);
        assert_eq!(acc.non_media_files, 0);
    }

    #[test]
    fn test_junk_file_kept_when_disabled() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("desktop.ini");
        std::fs::write(&path, b"[shell]").unwrap();

        let mut acc = Accumulator::default();
        process_file(&path, &options(), &mut acc);

        assert!(path.exists());
        assert_eq!(acc.junk_removed.total(), 0);
        // Falls through to plain non-media counting.
        assert_eq!(acc.non_media_files, 1);
        assert_eq!(acc.other_extensions.get("ini"), Some(&1));
    }

    #[test]
    fn test_corrupt_file_with_duration_requested_stays_isolated() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.flac");
        std::fs::write(&path, b"not flac").unwrap();

        let mut opts = options();
        opts.count_duration = true;

        let mut acc = Accumulator::default();
        process_file(&path, &opts, &mut acc);

        assert_eq!(acc.corrupt_files, vec![path]);
        assert_eq!(acc.total_duration, 0.0);
        assert!(acc.tracks.is_empty());
    }
}
