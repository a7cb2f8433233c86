//! Aggregate metrics and the gap finder.
//!
//! Everything here is a pure function of an [`AnalyticsTable`] and is safe on
//! an empty table.

use crate::analytics::AnalyticsTable;
use crate::media_kind::{FileTypeFilter, MediaKind};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Default minimum gap, in days, reported by [`find_gaps`].
pub const DEFAULT_MIN_GAP_DAYS: i64 = 5;

/// Summary numbers for an analytics table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub total_photos: usize,
    pub total_videos: usize,
    pub total_files: usize,
    /// `max(age_months) + 1`, or 0 for an empty table.
    pub coverage_months: u32,
    pub avg_per_month: f64,
    pub last_capture_date: Option<NaiveDate>,
    pub busiest_day_count: usize,
    /// Largest distance between two consecutive distinct capture dates.
    pub max_gap_days: i64,
}

/// A stretch with no captures between two consecutive capture dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gap {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: i64,
}

/// Computes the summary metrics.
///
/// With [`FileTypeFilter::Both`] photos and videos are counted by kind. With
/// a single-type filter every row counts toward that type.
pub fn compute_metrics(table: &AnalyticsTable, filter: FileTypeFilter) -> Metrics {
    if table.is_empty() {
        return Metrics::default();
    }

    let total_files = table.len();
    let (total_photos, total_videos) = match filter {
        FileTypeFilter::Both => (
            table.count_kind(MediaKind::Photo),
            table.count_kind(MediaKind::Video),
        ),
        FileTypeFilter::PhotosOnly => (total_files, 0),
        FileTypeFilter::VideosOnly => (0, total_files),
    };

    let coverage_months = table
        .rows()
        .iter()
        .map(|row| row.age_months + 1)
        .max()
        .unwrap_or(0);
    let avg_per_month = if coverage_months > 0 {
        total_files as f64 / f64::from(coverage_months)
    } else {
        0.0
    };

    let busiest_day_count = table.daily_counts().into_values().max().unwrap_or(0);
    let max_gap_days = consecutive_gaps(table)
        .map(|gap| gap.days)
        .max()
        .unwrap_or(0);

    Metrics {
        total_photos,
        total_videos,
        total_files,
        coverage_months,
        avg_per_month,
        last_capture_date: table.last_date(),
        busiest_day_count,
        max_gap_days,
    }
}

/// Gaps of at least `min_days` between consecutive distinct capture dates,
/// in chronological order.
pub fn find_gaps(table: &AnalyticsTable, min_days: i64) -> Vec<Gap> {
    consecutive_gaps(table)
        .filter(|gap| gap.days >= min_days)
        .collect()
}

fn consecutive_gaps(table: &AnalyticsTable) -> impl Iterator<Item = Gap> {
    let dates: Vec<NaiveDate> = table.distinct_dates().into_iter().collect();
    (1..dates.len()).map(move |i| Gap {
        start: dates[i - 1],
        end: dates[i],
        days: (dates[i] - dates[i - 1]).num_days(),
    })
}
