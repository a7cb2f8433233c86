//! Chart-ready series derived from an analytics table.

use crate::analytics::{AnalyticsTable, weekday_name};
use serde::Serialize;
use std::collections::BTreeMap;

/// Key format for weekly buckets: year plus Sunday-based week number.
pub const WEEK_KEY_FORMAT: &str = "%Y-W%U";

/// One labelled point of a series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    pub label: String,
    pub count: usize,
}

impl SeriesPoint {
    fn new(label: impl Into<String>, count: usize) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

/// Files per month of age, in age order. Only months with files appear.
pub fn per_age_month(table: &AnalyticsTable) -> Vec<SeriesPoint> {
    table
        .monthly_counts()
        .into_iter()
        .map(|(age, count)| SeriesPoint::new(age.to_string(), count))
        .collect()
}

/// Files per week, keyed with [`WEEK_KEY_FORMAT`], in chronological order.
pub fn per_week(table: &AnalyticsTable) -> Vec<SeriesPoint> {
    let mut weeks: BTreeMap<String, usize> = BTreeMap::new();
    for row in table.rows() {
        *weeks
            .entry(row.date.format(WEEK_KEY_FORMAT).to_string())
            .or_insert(0) += 1;
    }
    weeks
        .into_iter()
        .map(|(week, count)| SeriesPoint::new(week, count))
        .collect()
}

/// Files per weekday, always seven points from Monday to Sunday.
pub fn per_weekday(table: &AnalyticsTable) -> Vec<SeriesPoint> {
    table
        .weekday_counts()
        .into_iter()
        .map(|(weekday, count)| SeriesPoint::new(weekday_name(weekday), count))
        .collect()
}

/// All three series together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChartSeries {
    pub by_age_month: Vec<SeriesPoint>,
    pub by_week: Vec<SeriesPoint>,
    pub by_weekday: Vec<SeriesPoint>,
}

impl ChartSeries {
    pub fn from_table(table: &AnalyticsTable) -> Self {
        Self {
            by_age_month: per_age_month(table),
            by_week: per_week(table),
            by_weekday: per_weekday(table),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::AnalyticsRow;
    use crate::media_kind::MediaKind;
    use chrono::NaiveDate;

    fn row(y: i32, m: u32, d: u32, age: u32) -> AnalyticsRow {
        let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        AnalyticsRow::new("f.jpg", MediaKind::Photo, date, age, "photos")
    }

    fn table() -> AnalyticsTable {
        AnalyticsTable::new(vec![
            row(2024, 7, 6, 1),
            row(2024, 7, 7, 1),
            row(2024, 7, 8, 1),
            row(2024, 9, 2, 3),
        ])
    }

    #[test]
    fn test_per_age_month_skips_empty_months() {
        let series = per_age_month(&table());
        assert_eq!(
            series,
            vec![SeriesPoint::new("1", 3), SeriesPoint::new("3", 1)]
        );
    }

    #[test]
    fn test_per_week_starts_on_sunday() {
        // Saturday 6 July closes week 26; Sunday 7 July opens week 27.
        let series = per_week(&table());
        assert_eq!(
            series,
            vec![
                SeriesPoint::new("2024-W26", 1),
                SeriesPoint::new("2024-W27", 2),
                SeriesPoint::new("2024-W35", 1),
            ]
        );
    }

    #[test]
    fn test_per_weekday_has_seven_points() {
        let series = per_weekday(&table());
        assert_eq!(series.len(), 7);
        assert_eq!(series[0], SeriesPoint::new("Monday", 2));
        assert_eq!(series[5], SeriesPoint::new("Saturday", 1));
        assert_eq!(series[6], SeriesPoint::new("Sunday", 1));
    }

    #[test]
    fn test_empty_table() {
        let series = ChartSeries::from_table(&AnalyticsTable::default());
        assert!(series.by_age_month.is_empty());
        assert!(series.by_week.is_empty());
        assert!(series.by_weekday.iter().all(|p| p.count == 0));
    }
}
