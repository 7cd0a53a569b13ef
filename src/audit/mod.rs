//! The concurrent scan-and-aggregate pipeline.
//!
//! One sequential directory walk produces a flat file list; the list is
//! split into contiguous chunks and each chunk is processed on a blocking
//! task that exclusively owns one [`Accumulator`]. Workers only ever talk to
//! the outside world through a bounded progress channel drained by a single
//! reporter task, and that channel carries nothing correctness-relevant.
//!
//! After all workers are joined (in spawn order, so the merge is
//! reproducible for a fixed chunking), the accumulators are reduced
//! sequentially and duplicate detection runs once over the merged track
//! list.

pub mod accumulator;
pub mod albums;
pub mod duplicates;
pub mod processor;

pub use accumulator::{Accumulator, NormalizedChange, Track};
pub use albums::{AlbumEntry, AlbumTree};
pub use duplicates::DuplicatePair;

use std::collections::HashSet;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tracing::info;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::metadata::TagField;
use crate::normalize;

/// Hard ceiling on worker count, whatever the machine reports.
pub const WORKER_CAP: usize = 32;

/// Workers report progress every this many files.
const PROGRESS_STRIDE: u64 = 5;

/// Everything the pipeline needs to know about one run. Expensive probes
/// (duration, checksums) are opt-in and consulted once at the top of
/// per-file processing.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Per-file tracing; mutually exclusive with the progress display.
    pub verbose: bool,
    pub list_unknown_artist: bool,
    pub list_unknown_album_artist: bool,
    pub list_unknown_album: bool,
    /// Normalize tag capitalization and write changes back to files.
    pub normalize_capitalization: bool,
    /// Detect duplicate tracks; enables content fingerprinting.
    pub list_duplicate_tracks: bool,
    pub list_redundant_albums: bool,
    pub list_all_albums: bool,
    pub fix_missing_artist: bool,
    pub fix_missing_album_artist: bool,
    pub fix_missing_album: bool,
    /// Delete OS-generated junk files on sight.
    pub remove_junk_files: bool,
    /// Total durations; probes every media file's stream properties.
    pub count_duration: bool,
    /// Worker count override: 0 or negative means the automatic cap.
    pub workers: i64,
    /// Minor words the normalizer keeps lowercase.
    pub exceptions: HashSet<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            list_unknown_artist: false,
            list_unknown_album_artist: false,
            list_unknown_album: false,
            normalize_capitalization: false,
            list_duplicate_tracks: false,
            list_redundant_albums: false,
            list_all_albums: false,
            fix_missing_artist: false,
            fix_missing_album_artist: false,
            fix_missing_album: false,
            remove_junk_files: false,
            count_duration: false,
            workers: 0,
            exceptions: normalize::default_exceptions(),
        }
    }
}

impl ScanOptions {
    /// Whether missing values of `field` should be listed.
    pub fn list_missing(&self, field: TagField) -> bool {
        match field {
            TagField::Artist => self.list_unknown_artist,
            TagField::AlbumArtist => self.list_unknown_album_artist,
            TagField::Album => self.list_unknown_album,
        }
    }

    /// Whether missing values of `field` should be fixed interactively.
    pub fn fix_missing(&self, field: TagField) -> bool {
        match field {
            TagField::Artist => self.fix_missing_artist,
            TagField::AlbumArtist => self.fix_missing_album_artist,
            TagField::Album => self.fix_missing_album,
        }
    }
}

/// Result of one run.
#[derive(Debug)]
pub struct ScanOutcome {
    /// The merged accumulator.
    pub totals: Accumulator,
    /// Confirmed duplicate pairs; empty unless duplicate detection ran.
    pub duplicates: Vec<DuplicatePair>,
    /// Tracks that landed in an already-occupied checksum bucket.
    pub checksum_collisions: u64,
    pub elapsed: Duration,
}

/// Resolve the effective worker count from the configured override.
///
/// Zero or negative selects the automatic limit; anything above the limit is
/// clamped down to it.
pub fn resolve_workers(requested: i64) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    let cap = WORKER_CAP.min(cores * 2);
    if requested <= 0 {
        cap
    } else {
        (requested as usize).min(cap)
    }
}

/// Walk the root and collect every non-hidden file, in directory order.
///
/// The only fatal error in the pipeline: a root that is not a directory.
pub fn discover_files(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(Error::InvalidDirectory(root.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        if entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
        {
            continue;
        }
        files.push(entry.into_path());
    }
    Ok(files)
}

/// Split the file list into contiguous chunks of `len / workers` files.
fn chunk_files(files: Vec<PathBuf>, workers: usize) -> Vec<Vec<PathBuf>> {
    if files.is_empty() {
        return Vec::new();
    }
    let chunk_size = (files.len() / workers).max(1);
    files.chunks(chunk_size).map(|c| c.to_vec()).collect()
}

/// Run the full pipeline over `root`.
pub async fn scan_directory(root: &Path, options: ScanOptions) -> Result<ScanOutcome> {
    let started = Instant::now();

    let files = discover_files(root)?;
    let total = files.len() as u64;
    let workers = resolve_workers(options.workers);
    info!(target: "audit::scan", files = total, workers, root = %root.display(), "scan starting");

    let options = Arc::new(options);
    let (tx, rx) = mpsc::channel::<u64>(100);
    let render_progress = !options.verbose;
    let reporter = tokio::spawn(drain_progress(rx, total, render_progress));

    let mut handles = Vec::new();
    for chunk in chunk_files(files, workers) {
        let options = Arc::clone(&options);
        let tx = tx.clone();
        handles.push(tokio::task::spawn_blocking(move || {
            let mut acc = Accumulator::default();
            let mut pending = 0u64;
            for path in &chunk {
                processor::process_file(path, &options, &mut acc);
                pending += 1;
                if pending == PROGRESS_STRIDE {
                    // Display only; a closed channel is not an error.
                    let _ = tx.blocking_send(pending);
                    pending = 0;
                }
            }
            if pending > 0 {
                let _ = tx.blocking_send(pending);
            }
            acc
        }));
    }
    drop(tx);

    // Join barrier. join_all yields results in spawn order, so the reduction
    // (and album replay) order is a function of the chunking, not of task
    // completion timing.
    let mut parts = Vec::with_capacity(handles.len());
    for joined in futures::future::join_all(handles).await {
        parts.push(joined.map_err(|e| Error::Worker(e.to_string()))?);
    }
    let _ = reporter.await;

    let totals = accumulator::reduce(parts);

    let (duplicates, checksum_collisions) = if options.list_duplicate_tracks {
        duplicates::detect(&totals.tracks)
    } else {
        (Vec::new(), 0)
    };

    info!(
        target: "audit::scan",
        files = totals.total_files,
        media = totals.media_files,
        corrupt = totals.corrupt_files.len(),
        new_albums = totals.new_albums,
        redundant_albums = totals.redundant_albums,
        "scan complete"
    );

    Ok(ScanOutcome {
        totals,
        duplicates,
        checksum_collisions,
        elapsed: started.elapsed(),
    })
}

/// Drain the progress channel; render a counter unless verbose tracing owns
/// the terminal.
async fn drain_progress(mut rx: mpsc::Receiver<u64>, total: u64, render: bool) {
    let mut done = 0u64;
    while let Some(n) = rx.recv().await {
        done = (done + n).min(total);
        if render {
            print!("\rProcessed {done}/{total} files...");
            let _ = std::io::stdout().flush();
        }
    }
    if render && total > 0 {
        println!();
    }
}
