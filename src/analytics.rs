//! Analytics extraction.
//!
//! Walks every immediate subdirectory of the root (the source folder and any
//! month folders alike) and re-derives one row per dated, in-range media
//! file. The table is a read projection: files on disk stay the source of
//! truth, and it does not matter whether an organization pass ever ran.

use crate::classifier::{FileRecord, list_dirs, list_files};
use crate::error::ScanError;
use crate::media_kind::{MediaKind, extension_of};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;
use tracing::debug;

/// One analysed media file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyticsRow {
    pub file_name: String,
    pub kind: MediaKind,
    pub date: NaiveDate,
    pub age_months: u32,
    /// Name of the folder the file currently lives in.
    pub folder: String,
    pub weekday: Weekday,
    pub iso_week: u32,
    pub year: i32,
}

impl AnalyticsRow {
    /// Builds a row for a capture date already known to be on or after the
    /// birth date.
    pub fn new(
        file_name: impl Into<String>,
        kind: MediaKind,
        date: NaiveDate,
        age_months: u32,
        folder: impl Into<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            kind,
            date,
            age_months,
            folder: folder.into(),
            weekday: date.weekday(),
            iso_week: date.iso_week().week(),
            year: date.year(),
        }
    }

    /// Full English weekday name ("Monday").
    pub fn weekday_name(&self) -> &'static str {
        weekday_name(self.weekday)
    }

    /// True for Saturday and Sunday captures.
    pub fn is_weekend(&self) -> bool {
        matches!(self.weekday, Weekday::Sat | Weekday::Sun)
    }
}

/// Full English name of a weekday.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Table of analysed files with the grouping helpers the metrics need.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AnalyticsTable {
    rows: Vec<AnalyticsRow>,
}

impl AnalyticsTable {
    pub fn new(rows: Vec<AnalyticsRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[AnalyticsRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows of the given kind.
    pub fn count_kind(&self, kind: MediaKind) -> usize {
        self.rows.iter().filter(|row| row.kind == kind).count()
    }

    /// Files per calendar day, in date order.
    pub fn daily_counts(&self) -> BTreeMap<NaiveDate, usize> {
        let mut counts = BTreeMap::new();
        for row in &self.rows {
            *counts.entry(row.date).or_insert(0) += 1;
        }
        counts
    }

    /// Files per age in months, in age order.
    pub fn monthly_counts(&self) -> BTreeMap<u32, usize> {
        let mut counts = BTreeMap::new();
        for row in &self.rows {
            *counts.entry(row.age_months).or_insert(0) += 1;
        }
        counts
    }

    /// Files per weekday, Monday first.
    pub fn weekday_counts(&self) -> [(Weekday, usize); 7] {
        let mut counts = [
            (Weekday::Mon, 0),
            (Weekday::Tue, 0),
            (Weekday::Wed, 0),
            (Weekday::Thu, 0),
            (Weekday::Fri, 0),
            (Weekday::Sat, 0),
            (Weekday::Sun, 0),
        ];
        for row in &self.rows {
            counts[row.weekday.num_days_from_monday() as usize].1 += 1;
        }
        counts
    }

    /// Distinct capture dates, ascending.
    pub fn distinct_dates(&self) -> BTreeSet<NaiveDate> {
        self.rows.iter().map(|row| row.date).collect()
    }

    /// Latest capture date, if any.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.rows.iter().map(|row| row.date).max()
    }
}

impl FromIterator<AnalyticsRow> for AnalyticsTable {
    fn from_iter<I: IntoIterator<Item = AnalyticsRow>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Builds the analytics table for everything under `root_dir`.
///
/// # Errors
///
/// Returns [`ScanError`] if the root or one of its subdirectories cannot be
/// listed.
pub fn extract(
    root_dir: &Path,
    birth_date: NaiveDate,
    active_extensions: &HashSet<String>,
) -> Result<AnalyticsTable, ScanError> {
    let mut rows = Vec::new();

    for dir in list_dirs(root_dir)? {
        let folder = dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        for path in list_files(&dir)? {
            let active = extension_of(&path)
                .map(|ext| active_extensions.contains(&ext))
                .unwrap_or(false);
            if !active {
                continue;
            }

            let record = FileRecord::from_path(&path, birth_date);
            if let (Some(date), Some(age)) = (record.parsed_date, record.age_months) {
                rows.push(AnalyticsRow::new(
                    record.file_name,
                    record.kind,
                    date,
                    age,
                    folder.as_str(),
                ));
            }
        }
    }

    debug!(root = %root_dir.display(), rows = rows.len(), "extracted analytics");
    Ok(AnalyticsTable::new(rows))
}
