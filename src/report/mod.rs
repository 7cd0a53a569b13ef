//! Human-readable report rendering.
//!
//! Every section reads from the merged accumulator; nothing here feeds back
//! into the pipeline. Section order and shape follow the scan flags: the
//! statistics block always prints, each listing prints only when its flag
//! requested the underlying data.

use std::collections::BTreeMap;
use std::path::Path;

use crate::audit::{AlbumEntry, DuplicatePair, ScanOptions, ScanOutcome};
use crate::classify::{IMAGE_EXTENSIONS, JunkKind, VIDEO_EXTENSIONS};
use crate::metadata::TagField;

const SECTION_WIDTH: usize = 80;

/// Render the full report for one finished scan.
pub fn render(outcome: &ScanOutcome, options: &ScanOptions, root: &Path) {
    print_statistics(outcome, options);

    if options.list_all_albums {
        print_all_albums(&outcome.totals.albums.flatten(), root);
    }
    if options.normalize_capitalization {
        print_normalized(outcome);
    }
    for field in [TagField::Artist, TagField::AlbumArtist, TagField::Album] {
        if options.list_missing(field) {
            print_missing_metadata(outcome, field);
        }
    }
    if options.list_redundant_albums {
        print_redundant_albums(outcome);
    }
    if options.list_duplicate_tracks {
        print_duplicate_tracks(outcome);
    }
}

/// A centered section header padded with '=' to a fixed width.
fn section_header(title: &str) -> String {
    let title = format!(" {title} ");
    let padding = SECTION_WIDTH.saturating_sub(title.len()) / 2;
    let mut header = format!("{}{}{}", "=".repeat(padding), title, "=".repeat(padding));
    if header.len() < SECTION_WIDTH {
        header.push('=');
    }
    header
}

/// Seconds as "hh:mm:ss".
fn format_hms(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Bytes as decimal GB and binary GiB, both to two places.
fn format_size(bytes: u64) -> String {
    let gb = bytes as f64 / 1000f64.powi(3);
    let gib = bytes as f64 / 1024f64.powi(3);
    format!("{gb:.2} GB / {gib:.2} GiB")
}

/// Truncate to `max_length` characters, ellipsis included.
fn truncate(s: &str, max_length: usize) -> String {
    if s.chars().count() > max_length {
        let kept: String = s.chars().take(max_length.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        s.to_string()
    }
}

/// Split a " (Disc N)" marker back out of an album name.
///
/// Returns the cleaned name and the disc number as text ("0" when absent).
/// The marker match is ASCII case-insensitive; a matched region is pure
/// ASCII, so the byte-index slicing below stays on char boundaries.
fn extract_disc_info(name: &str) -> (String, String) {
    let bytes = name.as_bytes();
    let marker = b"(disc ";

    'scan: for open in 0..bytes.len().saturating_sub(marker.len()) {
        for (i, m) in marker.iter().enumerate() {
            if !bytes[open + i].eq_ignore_ascii_case(m) {
                continue 'scan;
            }
        }
        let digits_start = open + marker.len();
        let digits_len = bytes[digits_start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        let close = digits_start + digits_len;
        if digits_len == 0 || bytes.get(close) != Some(&b')') {
            continue;
        }
        let cleaned = format!("{}{}", &name[..open], &name[close + 1..]);
        return (
            cleaned.trim().to_string(),
            name[digits_start..close].to_string(),
        );
    }

    (name.trim().to_string(), "0".to_string())
}

/// Path with the scan root stripped, for compact table cells.
fn relative_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

fn print_statistics(outcome: &ScanOutcome, options: &ScanOptions) {
    let totals = &outcome.totals;

    println!("{}", section_header("LIBRARY STATISTICS"));
    println!(
        "{} files parsed in: {} (h:m:s)",
        totals.total_files,
        format_hms(outcome.elapsed.as_secs())
    );

    if totals.media_files > 0 {
        println!("\nTotal audio file count:");
        for (ext, count) in &totals.media_extensions {
            println!("{ext}: {count}");
        }
    }

    // Non-media extensions bucketed for readability.
    let mut images = BTreeMap::new();
    let mut videos = BTreeMap::new();
    let mut various = BTreeMap::new();
    for (ext, count) in &totals.other_extensions {
        let bucket = if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            &mut images
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            &mut videos
        } else {
            &mut various
        };
        bucket.insert(ext.clone(), *count);
    }
    print_extension_category("Total image file count", &images);
    print_extension_category("Total video file count", &videos);
    print_extension_category("Total various file count", &various);

    if !totals.corrupt_files.is_empty() {
        println!("\nCorrupt files: {}", totals.corrupt_files.len());
        for path in &totals.corrupt_files {
            println!("    -{}", path.display());
        }
    }

    if options.remove_junk_files {
        println!();
        if totals.junk_removed.total() > 0 {
            for kind in [
                JunkKind::DesktopIni,
                JunkKind::ThumbsDb,
                JunkKind::AlbumArtSmall,
                JunkKind::FolderJpg,
            ] {
                let count = totals.junk_removed.count(kind);
                if count > 0 {
                    println!("{} files removed: {}", kind.file_name(), count);
                }
            }
        } else {
            println!("No OS-generated junk files found");
        }
    }

    println!("\nTotal number of files: {}", totals.total_files);
    println!("Total number of music files: {}", totals.media_files);
    println!(
        "Total size of supported audio files: {}",
        format_size(totals.total_size)
    );
    if options.count_duration {
        println!(
            "Total duration of supported audio files: {}",
            format_hms(totals.total_duration as u64)
        );
    }

    println!("Total number of albums: {}", totals.albums.album_count());
    if options.list_redundant_albums {
        let mut redundant_albums = 0usize;
        let mut redundant_tracks = 0u64;
        for node in totals.albums.nodes() {
            redundant_albums += node.redundant.len();
            redundant_tracks += node.redundant.iter().map(|r| r.track_count).sum::<u64>();
        }
        println!("Total number of possible redundant albums: {redundant_albums}");
        println!("Redundant album track count: {redundant_tracks}");
    }
}

fn print_extension_category(title: &str, counts: &BTreeMap<String, u64>) {
    if counts.is_empty() {
        return;
    }
    println!("\n{title}:");
    // Busiest extensions first.
    let mut sorted: Vec<_> = counts.iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    for (ext, count) in sorted {
        println!("{ext}: {count}");
    }
}

fn print_missing_metadata(outcome: &ScanOutcome, field: TagField) {
    println!(
        "{}",
        section_header(&format!("FILES MISSING METADATA: {}", field.label()))
    );
    let paths = outcome.totals.missing_paths(field);
    if paths.is_empty() {
        println!("No files missing metadata.");
        return;
    }
    for path in paths {
        println!("{}", path.display());
    }
}

fn print_normalized(outcome: &ScanOutcome) {
    println!("{}", section_header("NORMALIZED METADATA"));
    if outcome.totals.normalized.is_empty() {
        println!("No tracks changed.");
        return;
    }
    for change in &outcome.totals.normalized {
        println!(
            "{} | '{}' -> '{}' | {}",
            change.field.label(),
            change.original,
            change.updated,
            change.path.display()
        );
    }
}

fn print_redundant_albums(outcome: &ScanOutcome) {
    println!("{}", section_header("REDUNDANT/MISTAGGED ALBUMS"));

    let tree = &outcome.totals.albums;
    if tree.nodes().all(|node| node.redundant.is_empty()) {
        println!("No redundant or mistagged albums detected");
        return;
    }

    println!("Note: Albums listed here are either redundant or missing disc tags");
    for node in tree.nodes() {
        if node.redundant.is_empty() {
            continue;
        }
        println!("{}", "-".repeat(SECTION_WIDTH));
        print_album_block(&node.canonical);
        for redundant in &node.redundant {
            println!();
            print_album_block(redundant);
        }
    }
    println!("{}", "-".repeat(SECTION_WIDTH));
}

fn print_album_block(entry: &AlbumEntry) {
    println!("Album Name : {}", entry.album_name);
    println!("Artist     : {}", entry.artist);
    println!("Path       : {}", entry.path.display());
    println!("Track Count: {}", entry.track_count);
}

fn print_duplicate_tracks(outcome: &ScanOutcome) {
    println!("{}", section_header("REDUNDANT TRACKS"));
    if outcome.duplicates.is_empty() {
        println!("No redundant tracks found.");
        return;
    }

    println!("Note: Tracks listed here are found to have matching contents and metadata");
    println!("{}", "-".repeat(SECTION_WIDTH));
    for DuplicatePair { first, second } in &outcome.duplicates {
        println!("Duplicate pair:");
        print_track_block(1, first);
        println!();
        print_track_block(2, second);
        println!("{}", "-".repeat(SECTION_WIDTH));
    }
    println!(
        "Total redundant track pairs found: {}",
        outcome.duplicates.len()
    );
    if outcome.checksum_collisions > 0 {
        println!(
            "Total checksum collisions detected: {}",
            outcome.checksum_collisions
        );
    }
}

fn print_track_block(index: usize, track: &crate::audit::Track) {
    let missing = || "<missing>".to_string();
    println!("{index}. {}", track.path.display());
    println!(
        "   Artist: {}",
        track.artist.clone().unwrap_or_else(missing)
    );
    println!(
        "   Album Artist: {}",
        track.album_artist.clone().unwrap_or_else(missing)
    );
    println!("   Album: {}", track.album.clone().unwrap_or_else(missing));
    println!("   File Size: {} bytes", track.file_size);
}

const COL_ALBUM_ARTIST: usize = 25;
const COL_ARTIST: usize = 25;
const COL_ALBUM: usize = 40;
const COL_TRACKS: usize = 11;
const COL_DISC: usize = 9;
const COL_PATH: usize = 95;

fn print_all_albums(entries: &[AlbumEntry], root: &Path) {
    let mut sorted: Vec<&AlbumEntry> = entries.iter().collect();
    sorted.sort_by_key(|e| {
        (
            e.album_artist.to_lowercase(),
            e.artist.to_lowercase(),
            e.album_name.to_lowercase(),
        )
    });

    println!(
        "\n{} | {} | {} | {} | {} | {}",
        pad("ALBUM ARTIST", COL_ALBUM_ARTIST),
        pad("ALBUM", COL_ALBUM),
        pad("ARTIST", COL_ARTIST),
        pad("TRACK COUNT", COL_TRACKS),
        pad("DISC NUMBER", COL_DISC),
        pad("PATH", COL_PATH),
    );
    let width = COL_ALBUM_ARTIST + COL_ARTIST + COL_ALBUM + COL_TRACKS + COL_DISC + COL_PATH;
    println!("{}", "=".repeat(width + 9)); // separators and spaces

    for entry in sorted {
        let (album_name, disc) = extract_disc_info(&entry.album_name);
        println!(
            "{} | {} | {} | Tracks: {} | Disc: {} | {}",
            pad(&truncate(&entry.album_artist, COL_ALBUM_ARTIST), COL_ALBUM_ARTIST),
            pad(&truncate(&album_name, COL_ALBUM), COL_ALBUM),
            pad(&truncate(&entry.artist, COL_ARTIST), COL_ARTIST),
            pad(&entry.track_count.to_string(), COL_TRACKS - 8),
            pad(&disc, COL_DISC - 6),
            truncate(&relative_path(root, &entry.path), COL_PATH),
        );
    }
}

fn pad(s: &str, width: usize) -> String {
    format!("{s:<width$}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_section_header_is_fixed_width() {
        let header = section_header("LIBRARY STATISTICS");
        assert_eq!(header.len(), SECTION_WIDTH);
        assert!(header.contains(" LIBRARY STATISTICS "));

        // Odd-length titles still come out at the full width.
        let header = section_header("ODD");
        assert_eq!(header.len(), SECTION_WIDTH);
    }

    #[test]
    fn test_format_hms() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(61), "00:01:01");
        assert_eq!(format_hms(3600 * 3 + 62), "03:01:02");
    }

    #[test]
    fn test_format_size_dual_units() {
        let formatted = format_size(2_000_000_000);
        assert_eq!(formatted, "2.00 GB / 1.86 GiB");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 25), "short");
        assert_eq!(truncate("abcdefghij", 8), "abcde...");
        assert_eq!(truncate("abcdefgh", 8), "abcdefgh");
    }

    #[test]
    fn test_extract_disc_info() {
        assert_eq!(
            extract_disc_info("Epicloud (Disc 1)"),
            ("Epicloud".to_string(), "1".to_string())
        );
        assert_eq!(
            extract_disc_info("Epicloud (disc 12)"),
            ("Epicloud".to_string(), "12".to_string())
        );
        assert_eq!(
            extract_disc_info("Epicloud"),
            ("Epicloud".to_string(), "0".to_string())
        );
        // A non-numeric marker is not a disc marker.
        assert_eq!(
            extract_disc_info("Live (Disc One)"),
            ("Live (Disc One)".to_string(), "0".to_string())
        );
    }

    #[test]
    fn test_relative_path_strips_root() {
        let root = Path::new("/music");
        assert_eq!(
            relative_path(root, Path::new("/music/a/b.mp3")),
            "a/b.mp3".to_string()
        );
        // Paths outside the root pass through unchanged.
        assert_eq!(
            relative_path(root, Path::new("/elsewhere/c.mp3")),
            "/elsewhere/c.mp3".to_string()
        );
    }

    #[test]
    fn test_album_sort_order_is_case_insensitive() {
        let mk = |album_artist: &str, album: &str| AlbumEntry {
            album_name: album.to_string(),
            artist: album_artist.to_string(),
            album_artist: album_artist.to_string(),
            path: PathBuf::from("/m"),
            track_count: 1,
        };
        let entries = vec![mk("beta", "A"), mk("Alpha", "Z"), mk("alpha", "a")];

        let mut sorted: Vec<&AlbumEntry> = entries.iter().collect();
        sorted.sort_by_key(|e| {
            (
                e.album_artist.to_lowercase(),
                e.artist.to_lowercase(),
                e.album_name.to_lowercase(),
            )
        });

        assert_eq!(sorted[0].album_name, "a");
        assert_eq!(sorted[1].album_name, "Z");
        assert_eq!(sorted[2].album_name, "A");
    }
}
