//! Heuristic insights about capture habits.
//!
//! Each heuristic is an [`InsightRule`]. The [`InsightEngine`] runs its rules
//! in a fixed order and concatenates whatever they return; a rule whose
//! precondition does not hold simply returns nothing.

use crate::age::month_name_for_age;
use crate::analytics::{AnalyticsTable, weekday_name};
use crate::media_kind::FileTypeFilter;
use crate::metrics::{DEFAULT_MIN_GAP_DAYS, Gap, Metrics, find_gaps};
use chrono::{Duration, Local, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Message returned instead of insights when there is nothing to analyse.
pub const NO_DATA_MESSAGE: &str = "No media analysed yet 📸";

const PHOTO_PREFERENCE_RATIO: f64 = 5.0;
const VIDEO_PREFERENCE_RATIO: f64 = 0.2;
const BALANCE_RANGE: (f64, f64) = (0.8, 1.2);

/// Trigger thresholds for every rule. All of them can be overridden from the
/// `[insights]` table of the configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightThresholds {
    /// Shortest gap worth reporting. Also the default for the `gaps` listing.
    pub min_gap_days: i64,
    pub burst_day: usize,
    pub productive_day: usize,
    pub large_collection: usize,
    pub medium_collection: usize,
    pub very_long_gap: i64,
    pub recent_days: i64,
    pub recent_active: usize,
    pub special_event_multiplier: f64,
    pub special_event_min: f64,
    pub major_event: usize,
    pub nice_event: usize,
    pub intensive_period_gap: i64,
    /// Weekend-to-weekday per-day rate at or above which weekends stand out.
    pub weekend_high: f64,
    /// Rate at or below which weekdays stand out.
    pub weekend_low: f64,
    pub trend_increase: f64,
    pub trend_decrease: f64,
    /// Percentages.
    pub evolution_increase: f64,
    pub evolution_decrease: f64,
    pub contrast_ratio_min: f64,
}

impl Default for InsightThresholds {
    fn default() -> Self {
        Self {
            min_gap_days: DEFAULT_MIN_GAP_DAYS,
            burst_day: 10,
            productive_day: 5,
            large_collection: 100,
            medium_collection: 50,
            very_long_gap: 10,
            recent_days: 30,
            recent_active: 20,
            special_event_multiplier: 2.0,
            special_event_min: 8.0,
            major_event: 25,
            nice_event: 15,
            intensive_period_gap: 3,
            weekend_high: 3.0,
            weekend_low: 1.0 / 3.0,
            trend_increase: 8.0,
            trend_decrease: -8.0,
            evolution_increase: 50.0,
            evolution_decrease: -40.0,
            contrast_ratio_min: 2.0,
        }
    }
}

/// Everything a rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct InsightContext<'a> {
    pub table: &'a AnalyticsTable,
    pub metrics: &'a Metrics,
    pub birth_date: NaiveDate,
    pub filter: FileTypeFilter,
    /// Reference date for the "recent" window.
    pub today: NaiveDate,
    pub thresholds: &'a InsightThresholds,
}

/// One independent heuristic.
pub trait InsightRule: Send + Sync {
    /// Returns zero or more messages for the given context.
    fn evaluate(&self, ctx: &InsightContext<'_>) -> Vec<String>;
}

/// Ordered list of rules.
pub struct InsightEngine {
    rules: Vec<Box<dyn InsightRule>>,
}

impl InsightEngine {
    /// An engine with no rules.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// An engine running exactly `rules`, in order.
    pub fn with_rules(rules: Vec<Box<dyn InsightRule>>) -> Self {
        Self { rules }
    }

    /// Appends a rule after the existing ones.
    pub fn push(&mut self, rule: Box<dyn InsightRule>) {
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Runs every rule. An empty table yields [`NO_DATA_MESSAGE`] alone.
    pub fn run(&self, ctx: &InsightContext<'_>) -> Vec<String> {
        if ctx.table.is_empty() {
            return vec![NO_DATA_MESSAGE.to_string()];
        }
        self.rules.iter().flat_map(|rule| rule.evaluate(ctx)).collect()
    }
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::with_rules(vec![
            Box::new(CollectionSize),
            Box::new(MediaBalance),
            Box::new(ChampionMonth),
            Box::new(WeekdayBias),
            Box::new(DailyRecord),
            Box::new(LongestSilence),
            Box::new(RecentActivity),
            Box::new(YearlyProjection),
            Box::new(SpecialEvents),
            Box::new(MonthEvolution),
            Box::new(MonthContrast),
            Box::new(WeekendRate),
            Box::new(TrailingTrend),
        ])
    }
}

/// Runs the default rules with default thresholds, using the local date as
/// the reference for recent activity.
pub fn generate_insights(
    table: &AnalyticsTable,
    metrics: &Metrics,
    birth_date: NaiveDate,
    filter: FileTypeFilter,
) -> Vec<String> {
    generate_insights_with(
        table,
        metrics,
        birth_date,
        filter,
        &InsightThresholds::default(),
        Local::now().date_naive(),
    )
}

/// Like [`generate_insights`] with explicit thresholds and reference date.
pub fn generate_insights_with(
    table: &AnalyticsTable,
    metrics: &Metrics,
    birth_date: NaiveDate,
    filter: FileTypeFilter,
    thresholds: &InsightThresholds,
    today: NaiveDate,
) -> Vec<String> {
    let ctx = InsightContext {
        table,
        metrics,
        birth_date,
        filter,
        today,
        thresholds,
    };
    InsightEngine::default().run(&ctx)
}

fn day_month(date: NaiveDate) -> String {
    date.format("%d/%m").to_string()
}

fn full_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// First key holding the largest value.
fn first_max<K: Copy>(counts: impl IntoIterator<Item = (K, usize)>) -> Option<(K, usize)> {
    counts.into_iter().fold(None, |best, (key, count)| match best {
        Some((_, best_count)) if best_count >= count => best,
        _ => Some((key, count)),
    })
}

/// First key holding the smallest value.
fn first_min<K: Copy>(counts: impl IntoIterator<Item = (K, usize)>) -> Option<(K, usize)> {
    counts.into_iter().fold(None, |best, (key, count)| match best {
        Some((_, best_count)) if best_count <= count => best,
        _ => Some((key, count)),
    })
}

/// Praise for a large collection.
pub struct CollectionSize;

impl InsightRule for CollectionSize {
    fn evaluate(&self, ctx: &InsightContext<'_>) -> Vec<String> {
        let total = ctx.metrics.total_files;
        let t = ctx.thresholds;

        let message = match ctx.filter {
            FileTypeFilter::Both if total > t.large_collection => Some(format!(
                "🎉 Magnificent collection: {} photos and {} videos!",
                ctx.metrics.total_photos, ctx.metrics.total_videos
            )),
            FileTypeFilter::Both => None,
            filter if total > t.large_collection => Some(format!(
                "{} Magnificent collection of {} {}!",
                filter.emoji(),
                total,
                filter.noun()
            )),
            filter if total > t.medium_collection => Some(format!(
                "{} Nice collection of {} {}!",
                filter.emoji(),
                total,
                filter.noun()
            )),
            _ => None,
        };
        message.into_iter().collect()
    }
}

/// Photo-to-video ratio, only when both kinds are tracked.
pub struct MediaBalance;

impl InsightRule for MediaBalance {
    fn evaluate(&self, ctx: &InsightContext<'_>) -> Vec<String> {
        if ctx.filter != FileTypeFilter::Both || ctx.metrics.total_videos == 0 {
            return Vec::new();
        }

        let ratio = ctx.metrics.total_photos as f64 / ctx.metrics.total_videos as f64;
        let message = if ratio > PHOTO_PREFERENCE_RATIO {
            "📸 You clearly prefer photos to videos"
        } else if ratio < VIDEO_PREFERENCE_RATIO {
            "🎬 A true videographer: videos dominate your collection"
        } else if ratio > BALANCE_RANGE.0 && ratio < BALANCE_RANGE.1 {
            "⚖️ Perfect balance between photos and videos"
        } else {
            return Vec::new();
        };
        vec![message.to_string()]
    }
}

/// The month of age with the most captures.
pub struct ChampionMonth;

impl InsightRule for ChampionMonth {
    fn evaluate(&self, ctx: &InsightContext<'_>) -> Vec<String> {
        let Some((age, count)) = first_max(ctx.table.monthly_counts()) else {
            return Vec::new();
        };
        vec![format!(
            "🏆 Record period: {}-{} months ({}) with {} {}",
            age,
            age + 1,
            month_name_for_age(ctx.birth_date, age),
            count,
            ctx.filter.noun()
        )]
    }
}

/// Weekend note when the favorite day of the week is a Saturday or Sunday.
///
/// Days tie-break by English name in alphabetical order, so a Sunday ties
/// ahead of a Tuesday.
pub struct WeekdayBias;

impl InsightRule for WeekdayBias {
    fn evaluate(&self, ctx: &InsightContext<'_>) -> Vec<String> {
        let mut counts: Vec<(Weekday, usize)> = ctx
            .table
            .weekday_counts()
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .collect();
        counts.sort_by_key(|(weekday, _)| weekday_name(*weekday));

        match first_max(counts) {
            Some((Weekday::Sat | Weekday::Sun, _)) => {
                vec!["🌞 You capture the most moments on weekends".to_string()]
            }
            _ => Vec::new(),
        }
    }
}

/// Busiest single day.
pub struct DailyRecord;

impl InsightRule for DailyRecord {
    fn evaluate(&self, ctx: &InsightContext<'_>) -> Vec<String> {
        let t = ctx.thresholds;
        let count = ctx.metrics.busiest_day_count;
        if count < t.productive_day {
            return Vec::new();
        }
        let Some((date, _)) = first_max(ctx.table.daily_counts()) else {
            return Vec::new();
        };

        let message = if count >= t.burst_day {
            format!("⚡ Burst mode activated: {} {} on {}!", count, ctx.filter.noun(), full_date(date))
        } else {
            format!("✨ Productive day: {} {} on {}", count, ctx.filter.noun(), full_date(date))
        };
        vec![message]
    }
}

/// The longest stretch without captures, when it is long enough to notice.
pub struct LongestSilence;

impl InsightRule for LongestSilence {
    fn evaluate(&self, ctx: &InsightContext<'_>) -> Vec<String> {
        let t = ctx.thresholds;
        let longest = find_gaps(ctx.table, t.min_gap_days)
            .into_iter()
            .fold(None, |best: Option<Gap>, gap| match best {
                Some(b) if b.days >= gap.days => Some(b),
                _ => Some(gap),
            });

        match longest {
            Some(gap) if gap.days >= t.very_long_gap => vec![format!(
                "⏱️ Longest silence: {} days between {} and {}",
                gap.days,
                day_month(gap.start),
                day_month(gap.end)
            )],
            _ => Vec::new(),
        }
    }
}

/// Activity in the trailing window ending today.
pub struct RecentActivity;

impl InsightRule for RecentActivity {
    fn evaluate(&self, ctx: &InsightContext<'_>) -> Vec<String> {
        let t = ctx.thresholds;
        let window_start = ctx.today - Duration::days(t.recent_days);
        let recent = ctx
            .table
            .rows()
            .iter()
            .filter(|row| row.date > window_start)
            .count();

        if recent == 0 {
            vec![format!(
                "📷 Nothing captured in the last {} days, time for new memories!",
                t.recent_days
            )]
        } else if recent >= t.recent_active {
            vec![format!(
                "🔥 Very active lately: {} {} in the last {} days",
                recent,
                ctx.filter.noun(),
                t.recent_days
            )]
        } else {
            Vec::new()
        }
    }
}

/// Linear projection of the monthly average over a year.
pub struct YearlyProjection;

impl InsightRule for YearlyProjection {
    fn evaluate(&self, ctx: &InsightContext<'_>) -> Vec<String> {
        if ctx.metrics.avg_per_month <= 0.0 {
            return Vec::new();
        }
        let projection = (ctx.metrics.avg_per_month * 12.0) as u64;
        vec![format!(
            "🔮 At this pace: about {} {} per year",
            projection,
            ctx.filter.noun()
        )]
    }
}

/// Days far above the daily average, and clusters of them.
pub struct SpecialEvents;

impl SpecialEvents {
    fn special_days(ctx: &InsightContext<'_>) -> BTreeMap<NaiveDate, usize> {
        let daily = ctx.table.daily_counts();
        if daily.is_empty() {
            return daily;
        }
        let t = ctx.thresholds;
        let mean = ctx.table.len() as f64 / daily.len() as f64;
        let threshold = (mean * t.special_event_multiplier).max(t.special_event_min);
        daily
            .into_iter()
            .filter(|(_, count)| *count as f64 >= threshold)
            .collect()
    }
}

impl InsightRule for SpecialEvents {
    fn evaluate(&self, ctx: &InsightContext<'_>) -> Vec<String> {
        let t = ctx.thresholds;
        let special = Self::special_days(ctx);
        let mut messages = Vec::new();

        if special.len() > 1 {
            let mut dates = special
                .keys()
                .take(3)
                .map(|date| day_month(*date))
                .collect::<Vec<_>>()
                .join(", ");
            if special.len() > 3 {
                dates.push_str("...");
            }
            messages.push(format!(
                "🎉 {} special events detected ({})",
                special.len(),
                dates
            ));

            if let Some((date, count)) = first_max(special.iter().map(|(d, c)| (*d, *c))) {
                if count >= t.major_event {
                    messages.push(format!(
                        "🎊 Major event on {} - First vacation? Family visit?",
                        full_date(date)
                    ));
                } else if count >= t.nice_event {
                    messages.push(format!(
                        "🎈 Great day on {} - Family outing? First birthday?",
                        full_date(date)
                    ));
                }
            }
        }

        let dates: Vec<NaiveDate> = special.into_keys().collect();
        if let Some(pair) = dates
            .windows(2)
            .find(|pair| (pair[1] - pair[0]).num_days() <= t.intensive_period_gap)
        {
            messages.push(format!(
                "🏖️ Intensive period {} - {} - Vacation or event?",
                day_month(pair[0]),
                day_month(pair[1])
            ));
        }

        messages
    }
}

/// Change between the first and the last tracked month of age.
pub struct MonthEvolution;

impl InsightRule for MonthEvolution {
    fn evaluate(&self, ctx: &InsightContext<'_>) -> Vec<String> {
        let monthly = ctx.table.monthly_counts();
        let (Some((&first_age, &first)), Some((&last_age, &last))) =
            (monthly.first_key_value(), monthly.last_key_value())
        else {
            return Vec::new();
        };
        if monthly.len() < 2 || last_age - first_age < 2 || first == 0 {
            return Vec::new();
        }

        let t = ctx.thresholds;
        let evolution = (last as f64 - first as f64) / first as f64 * 100.0;
        let first_name = month_name_for_age(ctx.birth_date, first_age);
        let last_name = month_name_for_age(ctx.birth_date, last_age);

        if evolution > t.evolution_increase {
            vec![format!(
                "📈 Growing evolution: +{:.0}% between {} and {}",
                evolution, first_name, last_name
            )]
        } else if evolution < t.evolution_decrease {
            vec![format!(
                "📉 Evolution: {:.0}% between {} and {}",
                evolution, first_name, last_name
            )]
        } else {
            Vec::new()
        }
    }
}

/// Busiest versus quietest month of age.
pub struct MonthContrast;

impl InsightRule for MonthContrast {
    fn evaluate(&self, ctx: &InsightContext<'_>) -> Vec<String> {
        let monthly = ctx.table.monthly_counts();
        if monthly.len() < 3 {
            return Vec::new();
        }
        let (Some((max_age, max)), Some((min_age, min))) = (
            first_max(monthly.iter().map(|(a, c)| (*a, *c))),
            first_min(monthly.iter().map(|(a, c)| (*a, *c))),
        ) else {
            return Vec::new();
        };
        if min == 0 || min_age == max_age {
            return Vec::new();
        }

        let ratio = max as f64 / min as f64;
        if ratio < ctx.thresholds.contrast_ratio_min {
            return Vec::new();
        }
        vec![format!(
            "🔍 {} had {:.1}x more captures than {}",
            month_name_for_age(ctx.birth_date, max_age),
            ratio,
            month_name_for_age(ctx.birth_date, min_age)
        )]
    }
}

/// Per-day capture rate on weekends versus weekdays.
pub struct WeekendRate;

impl InsightRule for WeekendRate {
    fn evaluate(&self, ctx: &InsightContext<'_>) -> Vec<String> {
        let weekend = ctx.table.rows().iter().filter(|row| row.is_weekend()).count();
        let weekday = ctx.table.len() - weekend;
        if weekend == 0 || weekday == 0 {
            return Vec::new();
        }

        let t = ctx.thresholds;
        let ratio = (weekend as f64 / 2.0) / (weekday as f64 / 5.0);
        if ratio >= t.weekend_high {
            vec![format!(
                "🎈 Intense weekends: {:.1}x more captures per day than on weekdays",
                ratio
            )]
        } else if ratio <= t.weekend_low {
            vec![format!(
                "💼 Active weekdays: {:.1}x more captures per day than on weekends",
                1.0 / ratio
            )]
        } else {
            Vec::new()
        }
    }
}

/// Slope across the last three tracked months of age.
pub struct TrailingTrend;

impl InsightRule for TrailingTrend {
    fn evaluate(&self, ctx: &InsightContext<'_>) -> Vec<String> {
        let counts: Vec<usize> = ctx.table.monthly_counts().into_values().collect();
        let [.., first, _, last] = counts.as_slice() else {
            return Vec::new();
        };

        let t = ctx.thresholds;
        let trend = (*last as f64 - *first as f64) / 2.0;
        if trend > t.trend_increase {
            vec!["📈 Upward trend over the last three months".to_string()]
        } else if trend < t.trend_decrease {
            vec!["📉 Downward trend over the last three months".to_string()]
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::age::age_in_months;
    use crate::analytics::AnalyticsRow;
    use crate::media_kind::MediaKind;
    use crate::metrics::compute_metrics;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn birth() -> NaiveDate {
        date(2024, 6, 1)
    }

    fn rows(kind: MediaKind, on: NaiveDate, count: usize) -> Vec<AnalyticsRow> {
        let age = age_in_months(birth(), on).unwrap();
        (0..count)
            .map(|i| AnalyticsRow::new(format!("{}_{}.jpg", on.format("%Y%m%d"), i), kind, on, age, "photos"))
            .collect()
    }

    fn table(groups: &[(NaiveDate, usize)]) -> AnalyticsTable {
        AnalyticsTable::new(
            groups
                .iter()
                .flat_map(|(on, count)| rows(MediaKind::Photo, *on, *count))
                .collect(),
        )
    }

    fn evaluate(rule: &dyn InsightRule, table: &AnalyticsTable, filter: FileTypeFilter) -> Vec<String> {
        evaluate_on(rule, table, filter, date(2025, 1, 1))
    }

    fn evaluate_on(
        rule: &dyn InsightRule,
        table: &AnalyticsTable,
        filter: FileTypeFilter,
        today: NaiveDate,
    ) -> Vec<String> {
        let metrics = compute_metrics(table, filter);
        let thresholds = InsightThresholds::default();
        let ctx = InsightContext {
            table,
            metrics: &metrics,
            birth_date: birth(),
            filter,
            today,
            thresholds: &thresholds,
        };
        rule.evaluate(&ctx)
    }

    #[test]
    fn test_empty_table_yields_single_message() {
        let table = AnalyticsTable::default();
        let metrics = compute_metrics(&table, FileTypeFilter::Both);
        let insights = generate_insights(&table, &metrics, birth(), FileTypeFilter::Both);
        assert_eq!(insights, vec![NO_DATA_MESSAGE.to_string()]);
    }

    #[test]
    fn test_collection_size_single_type() {
        let table = table(&[(date(2024, 7, 1), 60)]);
        assert_eq!(
            evaluate(&CollectionSize, &table, FileTypeFilter::PhotosOnly),
            vec!["📸 Nice collection of 60 photos!".to_string()]
        );
        assert!(evaluate(&CollectionSize, &table, FileTypeFilter::Both).is_empty());

        let large = self::table(&[(date(2024, 7, 1), 101)]);
        assert_eq!(
            evaluate(&CollectionSize, &large, FileTypeFilter::PhotosOnly),
            vec!["📸 Magnificent collection of 101 photos!".to_string()]
        );
    }

    #[test]
    fn test_collection_size_mixed() {
        let mut all = rows(MediaKind::Photo, date(2024, 7, 1), 90);
        all.extend(rows(MediaKind::Video, date(2024, 7, 2), 20));
        let table = AnalyticsTable::new(all);

        assert_eq!(
            evaluate(&CollectionSize, &table, FileTypeFilter::Both),
            vec!["🎉 Magnificent collection: 90 photos and 20 videos!".to_string()]
        );
    }

    #[test]
    fn test_media_balance() {
        let mut all = rows(MediaKind::Photo, date(2024, 7, 1), 12);
        all.extend(rows(MediaKind::Video, date(2024, 7, 1), 2));
        let table = AnalyticsTable::new(all);
        assert_eq!(
            evaluate(&MediaBalance, &table, FileTypeFilter::Both),
            vec!["📸 You clearly prefer photos to videos".to_string()]
        );

        let mut all = rows(MediaKind::Photo, date(2024, 7, 1), 10);
        all.extend(rows(MediaKind::Video, date(2024, 7, 1), 10));
        let table = AnalyticsTable::new(all);
        assert_eq!(
            evaluate(&MediaBalance, &table, FileTypeFilter::Both),
            vec!["⚖️ Perfect balance between photos and videos".to_string()]
        );
        assert!(evaluate(&MediaBalance, &table, FileTypeFilter::PhotosOnly).is_empty());

        let mut all = rows(MediaKind::Photo, date(2024, 7, 1), 1);
        all.extend(rows(MediaKind::Video, date(2024, 7, 1), 6));
        let table = AnalyticsTable::new(all);
        assert_eq!(
            evaluate(&MediaBalance, &table, FileTypeFilter::Both),
            vec!["🎬 A true videographer: videos dominate your collection".to_string()]
        );
    }

    #[test]
    fn test_champion_month_prefers_earliest_on_tie() {
        let table = table(&[(date(2024, 7, 5), 2), (date(2024, 9, 1), 2)]);
        assert_eq!(
            evaluate(&ChampionMonth, &table, FileTypeFilter::PhotosOnly),
            vec!["🏆 Record period: 1-2 months (July) with 2 photos".to_string()]
        );
    }

    #[test]
    fn test_weekday_bias() {
        // 2024-07-06 is a Saturday, 2024-07-08 a Monday.
        let weekend = table(&[(date(2024, 7, 6), 3), (date(2024, 7, 8), 1)]);
        assert_eq!(
            evaluate(&WeekdayBias, &weekend, FileTypeFilter::Both),
            vec!["🌞 You capture the most moments on weekends".to_string()]
        );

        let monday = table(&[(date(2024, 7, 6), 1), (date(2024, 7, 8), 2)]);
        assert!(evaluate(&WeekdayBias, &monday, FileTypeFilter::Both).is_empty());

        // 2024-07-09 is a Tuesday.
        let tuesday = table(&[(date(2024, 7, 9), 1)]);
        assert!(evaluate(&WeekdayBias, &tuesday, FileTypeFilter::Both).is_empty());
    }

    #[test]
    fn test_weekday_bias_tie_goes_to_first_name_alphabetically() {
        // Sunday 07/07 and Tuesday 09/07, one capture each.
        let tie = table(&[(date(2024, 7, 7), 1), (date(2024, 7, 9), 1)]);
        assert_eq!(
            evaluate(&WeekdayBias, &tie, FileTypeFilter::Both),
            vec!["🌞 You capture the most moments on weekends".to_string()]
        );

        // Monday sorts before Saturday.
        let tie = table(&[(date(2024, 7, 6), 1), (date(2024, 7, 8), 1)]);
        assert!(evaluate(&WeekdayBias, &tie, FileTypeFilter::Both).is_empty());
    }

    #[test]
    fn test_daily_record_tiers() {
        let burst = table(&[(date(2024, 7, 5), 10)]);
        assert_eq!(
            evaluate(&DailyRecord, &burst, FileTypeFilter::PhotosOnly),
            vec!["⚡ Burst mode activated: 10 photos on 05/07/2024!".to_string()]
        );

        let productive = table(&[(date(2024, 7, 5), 2), (date(2024, 7, 9), 6)]);
        assert_eq!(
            evaluate(&DailyRecord, &productive, FileTypeFilter::PhotosOnly),
            vec!["✨ Productive day: 6 photos on 09/07/2024".to_string()]
        );

        let quiet = table(&[(date(2024, 7, 5), 4)]);
        assert!(evaluate(&DailyRecord, &quiet, FileTypeFilter::PhotosOnly).is_empty());
    }

    #[test]
    fn test_longest_silence() {
        let table = table(&[(date(2024, 7, 5), 1), (date(2024, 7, 20), 1), (date(2024, 7, 27), 1)]);
        assert_eq!(
            evaluate(&LongestSilence, &table, FileTypeFilter::Both),
            vec!["⏱️ Longest silence: 15 days between 05/07 and 20/07".to_string()]
        );

        let short = AnalyticsTable::new(rows(MediaKind::Photo, date(2024, 7, 5), 1));
        assert!(evaluate(&LongestSilence, &short, FileTypeFilter::Both).is_empty());
    }

    #[test]
    fn test_recent_activity_window() {
        let table = table(&[(date(2024, 7, 20), 25)]);

        let idle = evaluate_on(&RecentActivity, &table, FileTypeFilter::Both, date(2024, 12, 1));
        assert_eq!(
            idle,
            vec!["📷 Nothing captured in the last 30 days, time for new memories!".to_string()]
        );

        let busy = evaluate_on(&RecentActivity, &table, FileTypeFilter::Both, date(2024, 7, 25));
        assert_eq!(
            busy,
            vec!["🔥 Very active lately: 25 files in the last 30 days".to_string()]
        );

        // Exactly 30 days ago falls outside the window.
        let edge = evaluate_on(&RecentActivity, &table, FileTypeFilter::Both, date(2024, 8, 19));
        assert_eq!(edge.len(), 1);
        assert!(edge[0].starts_with("📷"));
    }

    #[test]
    fn test_yearly_projection() {
        // Ages 1 and 3: coverage 4 months, 6 files, 1.5 per month.
        let table = table(&[(date(2024, 7, 5), 4), (date(2024, 9, 2), 2)]);
        assert_eq!(
            evaluate(&YearlyProjection, &table, FileTypeFilter::PhotosOnly),
            vec!["🔮 At this pace: about 18 photos per year".to_string()]
        );
    }

    #[test]
    fn test_special_events_and_intensive_period() {
        let mut groups = vec![(date(2024, 7, 5), 16), (date(2024, 7, 7), 9)];
        groups.extend((10..20).map(|day| (date(2024, 8, day), 1)));
        let table = table(&groups);

        assert_eq!(
            evaluate(&SpecialEvents, &table, FileTypeFilter::Both),
            vec![
                "🎉 2 special events detected (05/07, 07/07)".to_string(),
                "🎈 Great day on 05/07/2024 - Family outing? First birthday?".to_string(),
                "🏖️ Intensive period 05/07 - 07/07 - Vacation or event?".to_string(),
            ]
        );
    }

    #[test]
    fn test_special_events_major_tier() {
        // 49 captures over 12 days: the special threshold is about 8.2.
        let mut groups = vec![(date(2024, 7, 5), 30), (date(2024, 7, 7), 9)];
        groups.extend((10..20).map(|day| (date(2024, 8, day), 1)));
        let table = table(&groups);

        let insights = evaluate(&SpecialEvents, &table, FileTypeFilter::Both);
        assert_eq!(insights.len(), 3);
        assert_eq!(insights[0], "🎉 2 special events detected (05/07, 07/07)");
        assert_eq!(
            insights[1],
            "🎊 Major event on 05/07/2024 - First vacation? Family visit?"
        );
    }

    #[test]
    fn test_single_special_day_is_not_reported() {
        let table = table(&[(date(2024, 7, 5), 30), (date(2024, 7, 20), 1)]);
        assert!(evaluate(&SpecialEvents, &table, FileTypeFilter::Both).is_empty());
    }

    #[test]
    fn test_month_evolution() {
        let growing = table(&[(date(2024, 6, 10), 2), (date(2024, 9, 2), 4)]);
        assert_eq!(
            evaluate(&MonthEvolution, &growing, FileTypeFilter::Both),
            vec!["📈 Growing evolution: +100% between June and August".to_string()]
        );

        let shrinking = table(&[(date(2024, 6, 10), 10), (date(2024, 9, 2), 4)]);
        assert_eq!(
            evaluate(&MonthEvolution, &shrinking, FileTypeFilter::Both),
            vec!["📉 Evolution: -60% between June and August".to_string()]
        );

        let adjacent = table(&[(date(2024, 6, 10), 2), (date(2024, 7, 5), 8)]);
        assert!(evaluate(&MonthEvolution, &adjacent, FileTypeFilter::Both).is_empty());
    }

    #[test]
    fn test_month_contrast_needs_three_months() {
        let table3 = table(&[(date(2024, 6, 10), 1), (date(2024, 7, 5), 2), (date(2024, 8, 5), 4)]);
        assert_eq!(
            evaluate(&MonthContrast, &table3, FileTypeFilter::Both),
            vec!["🔍 July had 4.0x more captures than June".to_string()]
        );

        let table2 = table(&[(date(2024, 6, 10), 1), (date(2024, 7, 5), 4)]);
        assert!(evaluate(&MonthContrast, &table2, FileTypeFilter::Both).is_empty());
    }

    #[test]
    fn test_weekend_rate_both_directions() {
        let weekend = table(&[(date(2024, 7, 6), 6), (date(2024, 7, 8), 1)]);
        assert_eq!(
            evaluate(&WeekendRate, &weekend, FileTypeFilter::Both),
            vec!["🎈 Intense weekends: 15.0x more captures per day than on weekdays".to_string()]
        );

        let weekdays = table(&[(date(2024, 7, 6), 1), (date(2024, 7, 8), 10)]);
        assert_eq!(
            evaluate(&WeekendRate, &weekdays, FileTypeFilter::Both),
            vec!["💼 Active weekdays: 4.0x more captures per day than on weekends".to_string()]
        );
    }

    #[test]
    fn test_trailing_trend() {
        let rising = table(&[(date(2024, 6, 10), 1), (date(2024, 7, 5), 5), (date(2024, 8, 5), 20)]);
        assert_eq!(
            evaluate(&TrailingTrend, &rising, FileTypeFilter::Both),
            vec!["📈 Upward trend over the last three months".to_string()]
        );

        let falling = table(&[(date(2024, 6, 10), 20), (date(2024, 7, 5), 5), (date(2024, 8, 5), 1)]);
        assert_eq!(
            evaluate(&TrailingTrend, &falling, FileTypeFilter::Both),
            vec!["📉 Downward trend over the last three months".to_string()]
        );

        let short = table(&[(date(2024, 6, 10), 1), (date(2024, 8, 5), 30)]);
        assert!(evaluate(&TrailingTrend, &short, FileTypeFilter::Both).is_empty());
    }

    struct Fixed(&'static str);

    impl InsightRule for Fixed {
        fn evaluate(&self, _ctx: &InsightContext<'_>) -> Vec<String> {
            vec![self.0.to_string()]
        }
    }

    #[test]
    fn test_engine_runs_rules_in_order() {
        let mut engine = InsightEngine::with_rules(vec![Box::new(Fixed("first"))]);
        engine.push(Box::new(Fixed("second")));
        let table = table(&[(date(2024, 7, 5), 1)]);
        let metrics = compute_metrics(&table, FileTypeFilter::Both);
        let thresholds = InsightThresholds::default();
        let ctx = InsightContext {
            table: &table,
            metrics: &metrics,
            birth_date: birth(),
            filter: FileTypeFilter::Both,
            today: date(2024, 7, 10),
            thresholds: &thresholds,
        };

        assert_eq!(engine.run(&ctx), vec!["first".to_string(), "second".to_string()]);
        assert_eq!(InsightEngine::default().len(), 13);
    }
}
