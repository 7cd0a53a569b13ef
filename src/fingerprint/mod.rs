//! Content fingerprinting for duplicate detection.
//!
//! Streams a file in fixed-size blocks and folds them into a 32-bit CRC.
//! The checksum is a cheap pre-filter, not a uniqueness proof; duplicate
//! detection re-verifies candidates by size and metadata.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crc32fast::Hasher;

/// Read block size. Large enough to amortize syscalls, small enough to keep
/// per-worker memory flat.
const BLOCK_SIZE: usize = 64 * 1024;

/// Compute the CRC32 of a file's contents.
///
/// # Errors
///
/// Returns an IO error if the file cannot be opened or read.
pub fn checksum_file(path: &Path) -> std::io::Result<u32> {
    let mut file = File::open(path)?;
    let mut hasher = Hasher::new();
    let mut buf = vec![0u8; BLOCK_SIZE];

    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(hasher.finalize())
}
