//! Audio file tag reading and writing.
//!
//! Uses the lofty crate for format-independent tag access across MP3, FLAC,
//! OGG, M4A, WAV and friends.
//!
//! Reading never fails across this boundary: any probe or parse error is
//! reported as `corrupt = true` on the returned [`TagData`], and the caller
//! decides what a corrupt file means. Writing (used by capitalization
//! normalization and the interactive fix phase) does return errors, which
//! callers log and skip.

use lofty::config::WriteOptions;
use lofty::file::TaggedFileExt;
use lofty::probe::Probe;
use lofty::tag::{Accessor, ItemKey, Tag, TagExt};
use std::path::Path;

use crate::error::{Error, Result};

/// Tag fields the auditor reads, tracks, and can write back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagField {
    Artist,
    AlbumArtist,
    Album,
}

impl TagField {
    /// Human-readable name, used in report lines and prompts.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Artist => "Artist",
            Self::AlbumArtist => "Album Artist",
            Self::Album => "Album",
        }
    }
}

/// Result of reading one file's tags. Short-lived; consumed by the per-file
/// processor and discarded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagData {
    pub artist: Option<String>,
    pub album_artist: Option<String>,
    pub album: Option<String>,
    pub disc: Option<u32>,
    pub total_discs: Option<u32>,
    pub corrupt: bool,
}

impl TagData {
    fn corrupt() -> Self {
        Self {
            corrupt: true,
            ..Self::default()
        }
    }

    /// Value of one field, if present.
    pub fn field(&self, field: TagField) -> Option<&str> {
        match field {
            TagField::Artist => self.artist.as_deref(),
            TagField::AlbumArtist => self.album_artist.as_deref(),
            TagField::Album => self.album.as_deref(),
        }
    }
}

/// Read artist, album artist, album, and disc numbering from a file.
///
/// A file lofty cannot probe or parse yields `TagData { corrupt: true, .. }`.
/// A parseable file with no tag block at all yields all-`None` fields with
/// `corrupt: false`.
pub fn read(path: &Path) -> TagData {
    let tagged_file = match Probe::open(path).and_then(|p| p.read()) {
        Ok(f) => f,
        Err(_) => return TagData::corrupt(),
    };

    // Prefer the format's primary tag, fall back to any tag present.
    let Some(tag) = tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) else {
        return TagData::default();
    };

    let artist = tag.artist().map(|s| s.to_string());
    let album_artist = tag
        .get_string(&ItemKey::AlbumArtist)
        .map(|s| s.to_string());
    let album = tag.album().map(|s| s.to_string());

    // Structured disc numbering when the format carries it; otherwise parse
    // free-form text like "1/2" out of the raw item.
    let (mut disc, mut total_discs) = (tag.disk(), tag.disk_total());
    if disc.is_none()
        && let Some(raw) = tag.get_string(&ItemKey::DiscNumber)
    {
        (disc, total_discs) = extract_disc_number(raw);
    }

    TagData {
        artist,
        album_artist,
        album,
        disc,
        total_discs,
        corrupt: false,
    }
}

/// Parse a disc number out of free-form tag text.
///
/// Accepts "3", "1/2", "1-2", and "1 of 2" style values and returns
/// `(disc_number, total_discs)`.
pub fn extract_disc_number(raw: &str) -> (Option<u32>, Option<u32>) {
    let text = raw.trim();

    let digits: String = text.chars().take_while(|c| c.is_ascii_digit()).collect();
    let Ok(disc) = digits.parse::<u32>() else {
        return (None, None);
    };

    let rest = text[digits.len()..].trim_start();
    let rest = if let Some(sep) = rest.strip_prefix(['/', '-']) {
        sep
    } else if let Some(word) = rest
        .strip_prefix("of")
        .or_else(|| rest.strip_prefix("OF"))
        .or_else(|| rest.strip_prefix("Of"))
    {
        word
    } else {
        return (Some(disc), None);
    };

    let total_digits: String = rest
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    (Some(disc), total_digits.parse::<u32>().ok())
}

/// Write a single tag field back to a file.
///
/// Creates the format's primary tag block if the file has none.
pub fn write_field(path: &Path, field: TagField, value: &str) -> Result<()> {
    let mut tagged_file = Probe::open(path)
        .and_then(|p| p.read())
        .map_err(|e| Error::tag_write(path, e.to_string()))?;

    let tag_type = tagged_file.primary_tag_type();
    if tagged_file.tag_mut(tag_type).is_none() {
        tagged_file.insert_tag(Tag::new(tag_type));
    }
    let tag = tagged_file
        .tag_mut(tag_type)
        .ok_or_else(|| Error::tag_write(path, "no writable tag block"))?;

    match field {
        TagField::Artist => tag.set_artist(value.to_string()),
        TagField::AlbumArtist => {
            tag.insert_text(ItemKey::AlbumArtist, value.to_string());
        }
        TagField::Album => tag.set_album(value.to_string()),
    }

    tag.save_to_path(path, WriteOptions::default())
        .map_err(|e| Error::tag_write(path, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_non_audio_file_is_corrupt() {
        let mut file = NamedTempFile::with_suffix(".mp3").expect("temp file");
        writeln!(file, "This is just some text, not music.").expect("write");

        let data = read(file.path());
        assert!(data.corrupt);
        assert_eq!(data.artist, None);
        assert_eq!(data.album, None);
    }

    #[test]
    fn test_read_non_existent_file_is_corrupt() {
        let data = read(Path::new("non_existent_file.mp3"));
        assert!(data.corrupt);
    }

    #[test]
    fn test_write_to_non_audio_file_is_error() {
        let mut file = NamedTempFile::with_suffix(".flac").expect("temp file");
        writeln!(file, "Not an audio file").expect("write");

        let result = write_field(file.path(), TagField::Artist, "Somebody");
        assert!(matches!(result, Err(Error::TagWrite { .. })));
    }

    #[test]
    fn test_extract_disc_number_formats() {
        assert_eq!(extract_disc_number("1/2"), (Some(1), Some(2)));
        assert_eq!(extract_disc_number("1-2"), (Some(1), Some(2)));
        assert_eq!(extract_disc_number("1 of 2"), (Some(1), Some(2)));
        assert_eq!(extract_disc_number("3"), (Some(3), None));
        assert_eq!(extract_disc_number(" 2 / 3 "), (Some(2), Some(3)));
        assert_eq!(extract_disc_number("12/20"), (Some(12), Some(20)));
    }

    #[test]
    fn test_extract_disc_number_rejects_garbage() {
        assert_eq!(extract_disc_number(""), (None, None));
        assert_eq!(extract_disc_number("A"), (None, None));
        assert_eq!(extract_disc_number("disc two"), (None, None));
    }

    #[test]
    fn test_extract_disc_number_ignores_trailing_junk() {
        assert_eq!(extract_disc_number("1/x"), (Some(1), None));
        assert_eq!(extract_disc_number("4 (vinyl)"), (Some(4), None));
    }

    #[test]
    fn test_tag_field_labels() {
        assert_eq!(TagField::Artist.label(), "Artist");
        assert_eq!(TagField::AlbumArtist.label(), "Album Artist");
        assert_eq!(TagField::Album.label(), "Album");
    }

    #[test]
    fn test_tag_data_field_accessor() {
        let data = TagData {
            artist: Some("X".into()),
            album: Some("Y".into()),
            ..TagData::default()
        };
        assert_eq!(data.field(TagField::Artist), Some("X"));
        assert_eq!(data.field(TagField::AlbumArtist), None);
        assert_eq!(data.field(TagField::Album), Some("Y"));
    }
}
