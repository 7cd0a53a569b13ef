//! CLI command definitions and dispatch.

mod scan;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::Runtime;

use crate::audit::ScanOptions;
use crate::config;

pub use scan::cmd_scan;

/// Music Auditor CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Scan a music library: statistics, album index, duplicates
    Scan {
        /// Root directory to scan
        directory: PathBuf,
        /// Trace each file as it is processed (disables the progress display)
        #[arg(short, long)]
        verbose: bool,
        /// List files with missing artist metadata
        #[arg(long)]
        list_unknown_artist: bool,
        /// List files with missing album artist metadata
        #[arg(long)]
        list_unknown_album_artist: bool,
        /// List files with missing album metadata
        #[arg(long)]
        list_unknown_album: bool,
        /// Normalize tag capitalization to title case and write changes back.
        /// Keeps minor words lowercase, preserves all-caps tags and Roman
        /// numerals (your gold teeth II -> Your Gold Teeth II, MFDOOM -> MFDOOM)
        #[arg(long)]
        normalize_capitalization: bool,
        /// List byte-identical duplicate tracks, based on file contents (slow)
        #[arg(long)]
        list_duplicate_tracks: bool,
        /// List potential redundant albums and multi-disc albums missing
        /// disc tags, based on file paths
        #[arg(long)]
        list_redundant_albums: bool,
        /// List every album found, sorted by album artist
        #[arg(long)]
        list_all_albums: bool,
        /// Remove files automatically generated by Windows (desktop.ini,
        /// Thumbs.db, AlbumArtSmall.jpg, Folder.jpg)
        #[arg(long)]
        remove_junk_files: bool,
        /// Interactively fix missing artist metadata by folder
        #[arg(long)]
        fix_missing_artist_by_folder: bool,
        /// Interactively fix missing album artist metadata by folder
        #[arg(long)]
        fix_missing_album_artist_by_folder: bool,
        /// Interactively fix missing album metadata by folder
        #[arg(long)]
        fix_missing_album_by_folder: bool,
        /// Tally the duration of every audio file (slow)
        #[arg(long)]
        count_duration: bool,
        /// Worker count (default: twice the core count, capped at 32)
        #[arg(long, env = "MUSIC_AUDITOR_WORKERS")]
        workers: Option<i64>,
    },
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let rt = Runtime::new()?;

    match &cli.command {
        Commands::Scan {
            directory,
            verbose,
            list_unknown_artist,
            list_unknown_album_artist,
            list_unknown_album,
            normalize_capitalization,
            list_duplicate_tracks,
            list_redundant_albums,
            list_all_albums,
            remove_junk_files,
            fix_missing_artist_by_folder,
            fix_missing_album_artist_by_folder,
            fix_missing_album_by_folder,
            count_duration,
            workers,
        } => {
            let defaults = config::load();
            // First run: materialize the defaults so they are discoverable
            // and editable.
            if config::config_path().is_some_and(|p| !p.exists())
                && let Err(e) = config::save(&defaults)
            {
                tracing::warn!("Could not write default config: {e}");
            }
            let options = ScanOptions {
                verbose: *verbose,
                list_unknown_artist: *list_unknown_artist,
                list_unknown_album_artist: *list_unknown_album_artist,
                list_unknown_album: *list_unknown_album,
                normalize_capitalization: *normalize_capitalization,
                list_duplicate_tracks: *list_duplicate_tracks,
                list_redundant_albums: *list_redundant_albums,
                list_all_albums: *list_all_albums,
                fix_missing_artist: *fix_missing_artist_by_folder,
                fix_missing_album_artist: *fix_missing_album_artist_by_folder,
                fix_missing_album: *fix_missing_album_by_folder,
                remove_junk_files: *remove_junk_files || defaults.scan.remove_junk_files,
                count_duration: *count_duration,
                workers: workers.unwrap_or(defaults.scan.workers),
                exceptions: defaults.scan.exception_words.into_iter().collect(),
            };
            cmd_scan(&rt, directory, options)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_scan_flags() {
        let cli = Cli::try_parse_from([
            "music-auditor",
            "scan",
            "/music",
            "--list-duplicate-tracks",
            "--count-duration",
            "--workers",
            "4",
        ])
        .unwrap();

        let Commands::Scan {
            directory,
            list_duplicate_tracks,
            count_duration,
            workers,
            verbose,
            ..
        } = cli.command;
        assert_eq!(directory, PathBuf::from("/music"));
        assert!(list_duplicate_tracks);
        assert!(count_duration);
        assert_eq!(workers, Some(4));
        assert!(!verbose);
    }

    #[test]
    fn test_cli_requires_directory() {
        assert!(Cli::try_parse_from(["music-auditor", "scan"]).is_err());
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["music-auditor"]).is_err());
    }
}
