//! Per-worker scan state and the sequential reduction.
//!
//! Every worker owns exactly one [`Accumulator`] for the lifetime of its
//! chunk; nothing here is shared. After the join barrier, [`reduce`] folds
//! all worker accumulators into one: numbers are summed, lists concatenated,
//! sets unioned, and the album trees are merged by replaying their entries
//! through the live insertion algorithm.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use crate::audit::albums::AlbumTree;
use crate::classify::JunkKind;
use crate::metadata::TagField;

/// One processed media file. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    /// Absolute file path (unique key).
    pub path: PathBuf,
    pub artist: Option<String>,
    pub album_artist: Option<String>,
    pub album: Option<String>,
    /// File size in bytes.
    pub file_size: u64,
    /// Content fingerprint. Absent when duplicate detection was not
    /// requested, or when checksum streaming failed.
    pub checksum: Option<u32>,
}

/// A tag value rewritten by capitalization normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedChange {
    pub path: PathBuf,
    pub field: TagField,
    pub original: String,
    pub updated: String,
}

/// Deleted-junk counters, one per cleanup pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JunkCounts {
    pub desktop_ini: u64,
    pub thumbs_db: u64,
    pub album_art_small: u64,
    pub folder_jpg: u64,
}

impl JunkCounts {
    pub fn bump(&mut self, kind: JunkKind) {
        match kind {
            JunkKind::DesktopIni => self.desktop_ini += 1,
            JunkKind::ThumbsDb => self.thumbs_db += 1,
            JunkKind::AlbumArtSmall => self.album_art_small += 1,
            JunkKind::FolderJpg => self.folder_jpg += 1,
        }
    }

    pub fn count(&self, kind: JunkKind) -> u64 {
        match kind {
            JunkKind::DesktopIni => self.desktop_ini,
            JunkKind::ThumbsDb => self.thumbs_db,
            JunkKind::AlbumArtSmall => self.album_art_small,
            JunkKind::FolderJpg => self.folder_jpg,
        }
    }

    pub fn total(&self) -> u64 {
        self.desktop_ini + self.thumbs_db + self.album_art_small + self.folder_jpg
    }
}

/// The bag of counts, lists, sets, and one album tree a scan produces.
///
/// Exists in two roles: exclusively owned by one worker during the parallel
/// phase, then (a single merged instance) owned by the reporting code.
#[derive(Debug, Clone, Default)]
pub struct Accumulator {
    /// Every file visited, media or not.
    pub total_files: u64,
    /// Files with a recognized audio extension, including corrupt ones.
    pub media_files: u64,
    /// Files with any other extension.
    pub non_media_files: u64,
    /// Summed size of processable media files, bytes.
    pub total_size: u64,
    /// Summed duration of processable media files, seconds. Only populated
    /// when duration totalling was requested.
    pub total_duration: f64,

    pub junk_removed: JunkCounts,

    /// Media file count per (lowercased) extension.
    pub media_extensions: BTreeMap<String, u64>,
    /// Non-media file count per (lowercased) extension.
    pub other_extensions: BTreeMap<String, u64>,

    pub missing_artist: Vec<PathBuf>,
    pub missing_album_artist: Vec<PathBuf>,
    pub missing_album: Vec<PathBuf>,
    pub folders_missing_artist: BTreeSet<PathBuf>,
    pub folders_missing_album_artist: BTreeSet<PathBuf>,
    pub folders_missing_album: BTreeSet<PathBuf>,

    pub normalized: Vec<NormalizedChange>,
    /// Files excluded from every downstream structure: unreadable tags,
    /// failed duration probes, unreadable size.
    pub corrupt_files: Vec<PathBuf>,

    pub tracks: Vec<Track>,
    pub albums: AlbumTree,
    /// Keys created by this accumulator's insertions.
    pub new_albums: u64,
    /// Redundant entries created by this accumulator's insertions.
    pub redundant_albums: u64,
}

impl Accumulator {
    /// Folder set for one tag field, used by missing-metadata tracking and
    /// the interactive fix phase.
    pub fn folders_missing_mut(&mut self, field: TagField) -> &mut BTreeSet<PathBuf> {
        match field {
            TagField::Artist => &mut self.folders_missing_artist,
            TagField::AlbumArtist => &mut self.folders_missing_album_artist,
            TagField::Album => &mut self.folders_missing_album,
        }
    }

    /// Missing-path list for one tag field.
    pub fn missing_paths_mut(&mut self, field: TagField) -> &mut Vec<PathBuf> {
        match field {
            TagField::Artist => &mut self.missing_artist,
            TagField::AlbumArtist => &mut self.missing_album_artist,
            TagField::Album => &mut self.missing_album,
        }
    }

    pub fn folders_missing(&self, field: TagField) -> &BTreeSet<PathBuf> {
        match field {
            TagField::Artist => &self.folders_missing_artist,
            TagField::AlbumArtist => &self.folders_missing_album_artist,
            TagField::Album => &self.folders_missing_album,
        }
    }

    pub fn missing_paths(&self, field: TagField) -> &Vec<PathBuf> {
        match field {
            TagField::Artist => &self.missing_artist,
            TagField::AlbumArtist => &self.missing_album_artist,
            TagField::Album => &self.missing_album,
        }
    }
}

/// Merge worker accumulators, in the order given, into one.
///
/// List concatenation order follows the input order (the pipeline passes
/// workers in chunk order, so the result is reproducible for a fixed
/// configuration). Album trees are not merged structurally; their entries
/// are replayed through [`AlbumTree::insert`] so the merged tree satisfies
/// the same canonical-majority invariant as any live tree.
pub fn reduce(parts: Vec<Accumulator>) -> Accumulator {
    let mut total = Accumulator::default();
    let mut trees = Vec::with_capacity(parts.len());

    for part in parts {
        total.total_files += part.total_files;
        total.media_files += part.media_files;
        total.non_media_files += part.non_media_files;
        total.total_size += part.total_size;
        total.total_duration += part.total_duration;

        total.junk_removed.desktop_ini += part.junk_removed.desktop_ini;
        total.junk_removed.thumbs_db += part.junk_removed.thumbs_db;
        total.junk_removed.album_art_small += part.junk_removed.album_art_small;
        total.junk_removed.folder_jpg += part.junk_removed.folder_jpg;

        for (ext, count) in part.media_extensions {
            *total.media_extensions.entry(ext).or_default() += count;
        }
        for (ext, count) in part.other_extensions {
            *total.other_extensions.entry(ext).or_default() += count;
        }

        total.missing_artist.extend(part.missing_artist);
        total.missing_album_artist.extend(part.missing_album_artist);
        total.missing_album.extend(part.missing_album);
        total.folders_missing_artist.extend(part.folders_missing_artist);
        total
            .folders_missing_album_artist
            .extend(part.folders_missing_album_artist);
        total.folders_missing_album.extend(part.folders_missing_album);

        total.normalized.extend(part.normalized);
        total.corrupt_files.extend(part.corrupt_files);
        total.tracks.extend(part.tracks);

        total.new_albums += part.new_albums;
        total.redundant_albums += part.redundant_albums;

        trees.push(part.albums);
    }

    total.albums = AlbumTree::replay(trees);
    total
}
