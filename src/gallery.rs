//! Photo gallery selections.
//!
//! A gallery holds the dated photos found under the root, grouped by the
//! folder they live in. Videos are never part of a gallery.

use crate::age::MonthBucket;
use crate::analytics::AnalyticsTable;
use crate::media_kind::MediaKind;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Group label used for photos still sitting in the source folder.
pub const UNSORTED_LABEL: &str = "unsorted";

/// Default number of photos per selection.
pub const DEFAULT_GALLERY_COUNT: usize = 6;

/// How photos are picked for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GalleryMode {
    /// Newest first.
    #[default]
    Chronological,
    /// One photo from each of the busiest days.
    Highlights,
    /// The first photo of each month folder, in age order.
    Timeline,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryPhoto {
    pub path: PathBuf,
    pub file_name: String,
    pub date: NaiveDate,
    pub age_months: u32,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Gallery {
    /// Photos per group label, each group sorted by file name.
    pub groups: BTreeMap<String, Vec<GalleryPhoto>>,
}

impl Gallery {
    /// Builds a gallery from an analytics table extracted under `root_dir`.
    pub fn from_table(table: &AnalyticsTable, root_dir: &Path, source_subdir: &str) -> Self {
        let mut groups: BTreeMap<String, Vec<GalleryPhoto>> = BTreeMap::new();

        for row in table.rows().iter().filter(|row| row.kind == MediaKind::Photo) {
            let label = if row.folder == source_subdir {
                UNSORTED_LABEL.to_string()
            } else {
                row.folder.clone()
            };
            groups.entry(label).or_default().push(GalleryPhoto {
                path: root_dir.join(&row.folder).join(&row.file_name),
                file_name: row.file_name.clone(),
                date: row.date,
                age_months: row.age_months,
            });
        }

        for photos in groups.values_mut() {
            photos.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        }

        Self { groups }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total photos across every group.
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Picks at most `count` photos according to `mode`.
    pub fn select(&self, mode: GalleryMode, count: usize) -> Vec<&GalleryPhoto> {
        match mode {
            GalleryMode::Chronological => self.chronological(count),
            GalleryMode::Highlights => self.highlights(count),
            GalleryMode::Timeline => self.timeline(count),
        }
    }

    fn all(&self) -> impl Iterator<Item = &GalleryPhoto> {
        self.groups.values().flatten()
    }

    fn chronological(&self, count: usize) -> Vec<&GalleryPhoto> {
        let mut photos: Vec<&GalleryPhoto> = self.all().collect();
        photos.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.file_name.cmp(&b.file_name)));
        photos.truncate(count);
        photos
    }

    fn highlights(&self, count: usize) -> Vec<&GalleryPhoto> {
        let mut by_day: BTreeMap<NaiveDate, Vec<&GalleryPhoto>> = BTreeMap::new();
        for photo in self.all() {
            by_day.entry(photo.date).or_default().push(photo);
        }

        let mut days: Vec<Vec<&GalleryPhoto>> = by_day.into_values().collect();
        // Stable: equally busy days keep date order.
        days.sort_by(|a, b| b.len().cmp(&a.len()));

        days.into_iter()
            .filter_map(|mut day| {
                day.sort_by(|a, b| a.file_name.cmp(&b.file_name));
                day.into_iter().next()
            })
            .take(count)
            .collect()
    }

    fn timeline(&self, count: usize) -> Vec<&GalleryPhoto> {
        let mut months: Vec<(MonthBucket, &Vec<GalleryPhoto>)> = self
            .groups
            .iter()
            .filter_map(|(label, photos)| MonthBucket::parse(label).map(|bucket| (bucket, photos)))
            .collect();
        months.sort_by_key(|(bucket, _)| *bucket);

        months
            .into_iter()
            .take(count)
            .filter_map(|(_, photos)| photos.first())
            .collect()
    }
}

/// Age badge for a photo: days under one month, months otherwise.
pub fn age_caption(photo: &GalleryPhoto, birth_date: NaiveDate) -> String {
    if photo.age_months < 1 {
        format!("{} days", (photo.date - birth_date).num_days())
    } else {
        format!("{} months", photo.age_months)
    }
}
