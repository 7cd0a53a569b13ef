//! Duration and size probes.
//!
//! Separate from tag reading because the duration probe parses stream
//! properties and is slow at library scale; the pipeline only calls it when
//! duration totalling was requested.

use lofty::file::AudioFile;
use lofty::probe::Probe;
use std::path::Path;

use crate::error::{Error, Result};

/// Duration of an audio file in seconds, or `None` when the stream cannot be
/// parsed. An unreadable duration usually indicates a damaged stream, so
/// callers treat `None` as corruption.
pub fn duration_secs(path: &Path) -> Option<f64> {
    let tagged_file = Probe::open(path).and_then(|p| p.read()).ok()?;
    Some(tagged_file.properties().duration().as_secs_f64())
}

/// File size in bytes.
pub fn file_size(path: &Path) -> Result<u64> {
    std::fs::metadata(path)
        .map(|m| m.len())
        .map_err(|e| Error::file_access(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_duration_of_garbage_is_none() {
        let mut file = NamedTempFile::with_suffix(".mp3").expect("temp file");
        writeln!(file, "not a stream").expect("write");

        assert_eq!(duration_secs(file.path()), None);
    }

    #[test]
    fn test_duration_of_missing_file_is_none() {
        assert_eq!(duration_secs(Path::new("/no/such/track.flac")), None);
    }

    #[test]
    fn test_file_size() {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(b"123456789").expect("write");

        assert_eq!(file_size(file.path()).unwrap(), 9);
    }

    #[test]
    fn test_file_size_of_missing_file_is_error() {
        assert!(matches!(
            file_size(Path::new("/no/such/file")),
            Err(Error::FileAccess { .. })
        ));
    }
}
