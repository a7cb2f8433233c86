//! Classification of a source folder into month-of-age buckets.
//!
//! Every regular file directly inside the source folder whose extension is
//! active is either placed in a bucket or recorded in the skip log. Files
//! with inactive extensions are left out of both.

use crate::age::{MonthBucket, age_in_months};
use crate::error::ScanError;
use crate::filename_date::parse_filename_date;
use crate::media_kind::{MediaKind, extension_of};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A scanned media file and what could be derived from its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    pub path: PathBuf,
    pub file_name: String,
    /// Lowercase, without the leading dot.
    pub extension: String,
    pub kind: MediaKind,
    pub parsed_date: Option<NaiveDate>,
    /// Present iff `parsed_date` is present and not before the birth date.
    pub age_months: Option<u32>,
}

impl FileRecord {
    /// Builds a record for `path`, deriving date and age from its name.
    pub fn from_path(path: &Path, birth_date: NaiveDate) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let extension = extension_of(path).unwrap_or_default();
        let parsed_date = parse_filename_date(&file_name);
        let age_months = parsed_date.and_then(|date| age_in_months(birth_date, date));

        Self {
            path: path.to_path_buf(),
            kind: MediaKind::from_extension(&extension),
            file_name,
            extension,
            parsed_date,
            age_months,
        }
    }
}

/// Why a file was left out of every bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    UnparseableFilename,
    PredatesBirthDate,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnparseableFilename => write!(f, "unparseable filename"),
            SkipReason::PredatesBirthDate => write!(f, "predates birth date"),
        }
    }
}

/// One skip-log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub file_name: String,
    pub reason: SkipReason,
}

/// Buckets and skip log produced by one scan.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Classification {
    pub buckets: BTreeMap<MonthBucket, Vec<FileRecord>>,
    pub skipped: Vec<SkippedFile>,
}

impl Classification {
    /// Number of files placed in buckets.
    pub fn total_files(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    /// True when no file landed in any bucket.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Number of bucketed files of the given kind.
    pub fn count_kind(&self, kind: MediaKind) -> usize {
        self.buckets
            .values()
            .flatten()
            .filter(|record| record.kind == kind)
            .count()
    }
}

/// Scans `source_dir` and buckets its media files by age in months.
///
/// Only regular files directly inside `source_dir` are considered, and only
/// those whose lowercase extension is in `active_extensions`. Files inside a
/// bucket are sorted by name.
///
/// # Errors
///
/// Returns [`ScanError`] if `source_dir` is missing or cannot be read.
pub fn classify(
    source_dir: &Path,
    birth_date: NaiveDate,
    active_extensions: &HashSet<String>,
) -> Result<Classification, ScanError> {
    let mut classification = Classification::default();

    for path in list_files(source_dir)? {
        let Some(extension) = extension_of(&path) else {
            continue;
        };
        if !active_extensions.contains(&extension) {
            continue;
        }

        let record = FileRecord::from_path(&path, birth_date);

        match (record.parsed_date, record.age_months) {
            (None, _) => {
                debug!(file = %record.file_name, "skipped: unparseable filename");
                classification.skipped.push(SkippedFile {
                    file_name: record.file_name,
                    reason: SkipReason::UnparseableFilename,
                });
            }
            (Some(_), None) => {
                debug!(file = %record.file_name, "skipped: predates birth date");
                classification.skipped.push(SkippedFile {
                    file_name: record.file_name,
                    reason: SkipReason::PredatesBirthDate,
                });
            }
            (Some(_), Some(age)) => {
                classification
                    .buckets
                    .entry(MonthBucket(age))
                    .or_default()
                    .push(record);
            }
        }
    }

    info!(
        source = %source_dir.display(),
        bucketed = classification.total_files(),
        buckets = classification.buckets.len(),
        skipped = classification.skipped.len(),
        "classified source folder"
    );

    Ok(classification)
}

/// Regular files directly inside `dir`, sorted by path.
pub(crate) fn list_files(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    list_entries(dir, |file_type| file_type.is_file())
}

/// Subdirectories directly inside `dir`, sorted by path.
pub(crate) fn list_dirs(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    list_entries(dir, |file_type| file_type.is_dir())
}

fn list_entries(
    dir: &Path,
    keep: impl Fn(&fs::FileType) -> bool,
) -> Result<Vec<PathBuf>, ScanError> {
    if !dir.is_dir() {
        return Err(ScanError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = fs::read_dir(dir).map_err(|e| ScanError::ReadDirectory {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .flatten()
        .filter(|entry| entry.file_type().map(|t| keep(&t)).unwrap_or(false))
        .map(|entry| entry.path())
        .collect();
    paths.sort();
    Ok(paths)
}
