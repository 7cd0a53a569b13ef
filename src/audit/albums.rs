//! The album index.
//!
//! Maps a normalized album key to one canonical entry plus the redundant
//! entries observed at other folders. The structure is exactly two levels
//! deep: redundant entries never carry their own redundant list.
//!
//! Invariant: after every insertion, the canonical entry's track count is >=
//! every redundant entry's count for that key. Whenever a redundant entry
//! outgrows the canonical one, the two entries are exchanged wholesale, so
//! the canonical slot always holds the physical copy where most tracks were
//! observed. Ties keep the incumbent.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One physical instance of an album: a (name, artist, folder) cluster and
/// the number of tracks observed there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumEntry {
    /// Album title, possibly disc-suffixed ("Epicloud (Disc 2)").
    pub album_name: String,
    pub artist: String,
    pub album_artist: String,
    pub path: PathBuf,
    pub track_count: u64,
}

/// Canonical entry plus alternates found at other paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumNode {
    pub canonical: AlbumEntry,
    pub redundant: Vec<AlbumEntry>,
}

/// Result of one insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InsertOutcome {
    /// A key was seen for the first time.
    pub is_new: bool,
    /// A new redundant entry was appended to an existing key.
    pub is_redundant: bool,
}

/// Keyed album index. BTreeMap so iteration (reporting, flattening for the
/// merge replay) is deterministic for a given key set.
#[derive(Debug, Clone, Default)]
pub struct AlbumTree {
    nodes: BTreeMap<String, AlbumNode>,
}

impl AlbumTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one observation of `track_count` tracks of an album at a folder.
    ///
    /// Returns what happened: a brand-new key, a new redundant entry, or an
    /// in-place increment. Observations without an album artist cannot be
    /// keyed and are rejected with a no-op outcome.
    pub fn insert(
        &mut self,
        album_name: &str,
        artist: &str,
        folder_path: &Path,
        album_artist: Option<&str>,
        track_count: u64,
    ) -> InsertOutcome {
        let Some(album_artist) = album_artist.filter(|a| !a.is_empty()) else {
            return InsertOutcome::default();
        };
        if album_name.is_empty() {
            return InsertOutcome::default();
        }

        let key = album_name.to_lowercase();
        let artist_key = album_artist.to_lowercase();

        let Some(node) = self.nodes.get_mut(&key) else {
            self.nodes.insert(
                key,
                AlbumNode {
                    canonical: AlbumEntry {
                        album_name: album_name.to_string(),
                        artist: artist.to_string(),
                        album_artist: album_artist.to_string(),
                        path: folder_path.to_path_buf(),
                        track_count,
                    },
                    redundant: Vec::new(),
                },
            );
            return InsertOutcome {
                is_new: true,
                is_redundant: false,
            };
        };

        if node.canonical.album_artist.to_lowercase() != artist_key {
            // Same literal title, different album artist: a distinct logical
            // album. It lives under a compound key and never nests under the
            // original one.
            let compound = format!("{key}_{artist_key}");
            return match self.nodes.get_mut(&compound) {
                Some(other) => {
                    other.canonical.track_count += track_count;
                    InsertOutcome::default()
                }
                None => {
                    self.nodes.insert(
                        compound,
                        AlbumNode {
                            canonical: AlbumEntry {
                                album_name: album_name.to_string(),
                                artist: artist.to_string(),
                                album_artist: album_artist.to_string(),
                                path: folder_path.to_path_buf(),
                                track_count,
                            },
                            redundant: Vec::new(),
                        },
                    );
                    InsertOutcome {
                        is_new: true,
                        is_redundant: false,
                    }
                }
            };
        }

        if node.canonical.path == folder_path {
            // Same physical album observed again.
            node.canonical.track_count += track_count;
            return InsertOutcome::default();
        }

        // Same album artist, different folder: an alternate physical copy.
        if let Some(idx) = node.redundant.iter().position(|r| r.path == folder_path) {
            node.redundant[idx].track_count += track_count;
            node.promote_if_larger(idx);
            InsertOutcome::default()
        } else {
            node.redundant.push(AlbumEntry {
                album_name: album_name.to_string(),
                artist: artist.to_string(),
                album_artist: album_artist.to_string(),
                path: folder_path.to_path_buf(),
                track_count,
            });
            node.promote_if_larger(node.redundant.len() - 1);
            InsertOutcome {
                is_new: false,
                is_redundant: true,
            }
        }
    }

    /// Number of keys (canonical entries).
    pub fn album_count(&self) -> usize {
        self.nodes.len()
    }

    /// Iterate nodes in key order.
    pub fn nodes(&self) -> impl Iterator<Item = &AlbumNode> {
        self.nodes.values()
    }

    /// Every entry in the tree, canonical first within each key, key order
    /// across keys.
    pub fn flatten(&self) -> Vec<AlbumEntry> {
        let mut entries = Vec::new();
        for node in self.nodes.values() {
            entries.push(node.canonical.clone());
            entries.extend(node.redundant.iter().cloned());
        }
        entries
    }

    /// Merge worker trees by replaying every entry through the insertion
    /// algorithm, carrying accumulated track counts. The merged tree obeys
    /// the same invariant as live insertion by construction.
    pub fn replay(trees: impl IntoIterator<Item = AlbumTree>) -> AlbumTree {
        let mut merged = AlbumTree::new();
        for tree in trees {
            for entry in tree.flatten() {
                merged.insert(
                    &entry.album_name,
                    &entry.artist,
                    &entry.path,
                    Some(&entry.album_artist),
                    entry.track_count,
                );
            }
        }
        merged
    }
}

impl AlbumNode {
    /// Exchange the canonical entry with `redundant[idx]` when the redundant
    /// entry's count is strictly greater. A whole-struct swap keeps every
    /// field paired with its own entry.
    fn promote_if_larger(&mut self, idx: usize) {
        if self.redundant[idx].track_count > self.canonical.track_count {
            std::mem::swap(&mut self.canonical, &mut self.redundant[idx]);
        }
    }
}
