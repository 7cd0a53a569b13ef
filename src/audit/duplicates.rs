//! Duplicate-track detection over the merged track list.
//!
//! The 32-bit fingerprint is only a pre-filter: tracks sharing a checksum
//! form a collision bucket, and a pair is confirmed as a true duplicate only
//! when file size and all three album metadata fields also match. Pairwise
//! comparison is quadratic per bucket, which is fine because real duplicate
//! buckets hold 2-3 entries.

use std::collections::HashMap;

use crate::audit::accumulator::Track;

/// A confirmed pair: byte-identical content (as far as the checksum can
/// tell), same size, same (artist, album artist, album).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicatePair {
    pub first: Track,
    pub second: Track,
}

/// Find duplicate pairs among `tracks`.
///
/// Returns the confirmed pairs and the collision count: the number of tracks
/// that landed in an already-occupied checksum bucket, confirmed or not.
/// Tracks without a fingerprint never participate.
pub fn detect(tracks: &[Track]) -> (Vec<DuplicatePair>, u64) {
    let mut buckets: HashMap<u32, Vec<&Track>> = HashMap::new();
    let mut collisions = 0u64;

    for track in tracks {
        let Some(checksum) = track.checksum else {
            continue;
        };
        let bucket = buckets.entry(checksum).or_default();
        if !bucket.is_empty() {
            collisions += 1;
        }
        bucket.push(track);
    }

    let mut pairs = Vec::new();
    for bucket in buckets.values() {
        if bucket.len() < 2 {
            continue;
        }
        for i in 0..bucket.len() {
            for j in (i + 1)..bucket.len() {
                let (a, b) = (bucket[i], bucket[j]);
                if a.file_size == b.file_size
                    && a.artist == b.artist
                    && a.album_artist == b.album_artist
                    && a.album == b.album
                {
                    pairs.push(DuplicatePair {
                        first: (*a).clone(),
                        second: (*b).clone(),
                    });
                }
            }
        }
    }

    (pairs, collisions)
}
