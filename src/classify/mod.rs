//! File classification by extension and filename.
//!
//! Decides, from the path alone, whether a file is audio we should process,
//! OS-generated junk eligible for cleanup, or something else that is merely
//! counted. No I/O happens here.

use std::path::Path;

/// Audio extensions recognized as media (case-insensitive).
pub const MEDIA_EXTENSIONS: &[&str] = &[
    "mp3", "flac", "wav", "aac", "ogg", "m4a", "wma", "aiff", "opus", "alac",
];

/// Image extensions, used to bucket the non-media histogram in the report.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "tiff", "tif", "ico", "thm", "webp", "svg", "raw", "heif",
    "heic",
];

/// Video extensions, used to bucket the non-media histogram in the report.
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "mkv", "avi", "mov", "wmv", "flv", "webm", "m4v", "mpg", "mpeg", "ogv", "3gp", "3g2",
    "rm", "rmvb",
];

/// OS-generated files that the cleanup pass may delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JunkKind {
    DesktopIni,
    ThumbsDb,
    AlbumArtSmall,
    FolderJpg,
}

impl JunkKind {
    /// Canonical filename, for report lines.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::DesktopIni => "desktop.ini",
            Self::ThumbsDb => "Thumbs.db",
            Self::AlbumArtSmall => "AlbumArtSmall.jpg",
            Self::FolderJpg => "Folder.jpg",
        }
    }
}

/// Match a filename against the known junk patterns.
///
/// `desktop.ini` matches case-insensitively (Windows writes it with varying
/// case); the art files and `Thumbs.db` match exactly.
pub fn junk_kind(file_name: &str) -> Option<JunkKind> {
    if file_name.eq_ignore_ascii_case("desktop.ini") {
        return Some(JunkKind::DesktopIni);
    }
    match file_name {
        "Thumbs.db" => Some(JunkKind::ThumbsDb),
        "AlbumArtSmall.jpg" => Some(JunkKind::AlbumArtSmall),
        "Folder.jpg" => Some(JunkKind::FolderJpg),
        _ => None,
    }
}

/// Lowercased extension of a path; empty string when there is none.
pub fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default()
}

/// Lowercased extension if it names a recognized media format.
pub fn media_extension(path: &Path) -> Option<String> {
    let ext = extension(path);
    MEDIA_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Check if a path has an audio file extension.
pub fn is_media_file(path: &Path) -> bool {
    media_extension(path).is_some()
}
