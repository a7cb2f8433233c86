//! Media kind detection and file-type filtering.
//!
//! This module maps file extensions to a broad media kind (photo or video)
//! and turns the user's file-type choice into the set of extensions the
//! scanner should consider.
//!
//! # Examples
//!
//! ```
//! use momentkeeper::media_kind::{FileTypeFilter, MediaKind};
//!
//! assert_eq!(MediaKind::from_extension("JPG"), MediaKind::Photo);
//! assert_eq!(MediaKind::from_extension("mov"), MediaKind::Video);
//! assert!(FileTypeFilter::PhotosOnly.active_extensions().contains("heic"));
//! ```
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Photo extensions, lowercase and without the leading dot.
pub const PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "heic", "webp"];

/// Video extensions, lowercase and without the leading dot.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv", "m4v", "3gp", "wmv"];

const NO_EXTENSIONS: &[&str] = &[];

/// Broad media kind of a file, derived from its extension only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    /// Still images (JPG, PNG, HEIC, ...)
    Photo,
    /// Video clips (MP4, MOV, ...)
    Video,
    /// Anything outside both tables
    Unknown,
}

impl MediaKind {
    /// Classifies an extension (case-insensitive, with or without leading dot).
    pub fn from_extension(ext: &str) -> Self {
        let ext = normalize_extension(ext);
        if PHOTO_EXTENSIONS.contains(&ext.as_str()) {
            MediaKind::Photo
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            MediaKind::Video
        } else {
            MediaKind::Unknown
        }
    }

    /// Classifies a path by its extension.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .map(|ext| Self::from_extension(&ext.to_string_lossy()))
            .unwrap_or(MediaKind::Unknown)
    }

    /// Short lowercase label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            MediaKind::Photo => "photo",
            MediaKind::Video => "video",
            MediaKind::Unknown => "unknown",
        }
    }
}

/// Which kinds of media an organizer instance works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileTypeFilter {
    PhotosOnly,
    VideosOnly,
    #[default]
    Both,
}

struct FilterEntry {
    kinds: &'static [MediaKind],
    noun: &'static str,
    emoji: &'static str,
}

const FILTER_TABLE: &[FilterEntry] = &[
    FilterEntry {
        kinds: &[MediaKind::Photo],
        noun: "photos",
        emoji: "📸",
    },
    FilterEntry {
        kinds: &[MediaKind::Video],
        noun: "videos",
        emoji: "🎬",
    },
    FilterEntry {
        kinds: &[MediaKind::Photo, MediaKind::Video],
        noun: "files",
        emoji: "📸🎬",
    },
];

impl FileTypeFilter {
    fn entry(&self) -> &'static FilterEntry {
        let index = match self {
            FileTypeFilter::PhotosOnly => 0,
            FileTypeFilter::VideosOnly => 1,
            FileTypeFilter::Both => 2,
        };
        &FILTER_TABLE[index]
    }

    /// Media kinds admitted by this filter.
    pub fn kinds(&self) -> &'static [MediaKind] {
        self.entry().kinds
    }

    /// Returns true if files of `kind` pass this filter.
    pub fn includes(&self, kind: MediaKind) -> bool {
        self.kinds().contains(&kind)
    }

    /// Lowercase extensions (no dot) admitted by this filter.
    pub fn active_extensions(&self) -> HashSet<String> {
        self.kinds()
            .iter()
            .flat_map(|kind| match kind {
                MediaKind::Photo => PHOTO_EXTENSIONS,
                MediaKind::Video => VIDEO_EXTENSIONS,
                MediaKind::Unknown => NO_EXTENSIONS,
            })
            .map(|ext| ext.to_string())
            .collect()
    }

    /// Plural noun for report messages ("photos", "videos", "files").
    pub fn noun(&self) -> &'static str {
        self.entry().noun
    }

    /// Emoji prefix for report messages.
    pub fn emoji(&self) -> &'static str {
        self.entry().emoji
    }
}

/// Lowercases an extension and strips a leading dot.
pub fn normalize_extension(ext: &str) -> String {
    ext.trim_start_matches('.').to_lowercase()
}

/// Returns the normalized extension of `path`, if it has one.
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| normalize_extension(&ext.to_string_lossy()))
}
