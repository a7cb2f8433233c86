//! Age-in-months arithmetic and month-bucket naming.
//!
//! Ages are counted in completed calendar months: a capture on the same
//! day-of-month as the birth date completes the month, an earlier day does
//! not. Folder names follow the `"{N}-{N+1}months"` convention.

use chrono::{Datelike, Duration, Month, NaiveDate};
use serde::{Serialize, Serializer};
use std::fmt;

/// Average month length used to map an age back to a calendar month name.
pub const AVERAGE_DAYS_PER_MONTH: f64 = 30.44;

/// Returns the number of completed calendar months between `birth_date`
/// and `photo_date`.
///
/// Returns `None` when the photo predates the birth; callers filter those
/// files out before asking for an age.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use momentkeeper::age::age_in_months;
///
/// let birth = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
/// let before_anniversary = NaiveDate::from_ymd_opt(2024, 7, 14).unwrap();
/// let anniversary = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();
///
/// assert_eq!(age_in_months(birth, before_anniversary), Some(0));
/// assert_eq!(age_in_months(birth, anniversary), Some(1));
/// ```
pub fn age_in_months(birth_date: NaiveDate, photo_date: NaiveDate) -> Option<u32> {
    if photo_date < birth_date {
        return None;
    }

    let mut months = (photo_date.year() - birth_date.year()) * 12
        + (photo_date.month() as i32 - birth_date.month() as i32);

    if photo_date.day() < birth_date.day() {
        months -= 1;
    }

    Some(months.max(0) as u32)
}

/// English name of the calendar month reached `age_months` after birth,
/// using the average month length.
pub fn month_name_for_age(birth_date: NaiveDate, age_months: u32) -> &'static str {
    let offset_days = (age_months as f64 * AVERAGE_DAYS_PER_MONTH) as i64;
    let target = birth_date + Duration::days(offset_days);
    Month::try_from(target.month() as u8)
        .map(|month| month.name())
        .unwrap_or("Unknown")
}

/// A month-of-age bucket, displayed as `"{N}-{N+1}months"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthBucket(pub u32);

impl MonthBucket {
    /// Age in months at the start of this bucket.
    pub fn start(&self) -> u32 {
        self.0
    }

    /// Folder name for this bucket.
    pub fn label(&self) -> String {
        self.to_string()
    }

    /// Parses a folder name of the exact form `"{N}-{N+1}months"`.
    pub fn parse(name: &str) -> Option<Self> {
        let rest = name.strip_suffix("months")?;
        let (start, end) = rest.split_once('-')?;
        let start: u32 = start.parse().ok()?;
        let end: u32 = end.parse().ok()?;
        (end == start + 1).then_some(MonthBucket(start))
    }
}

impl fmt::Display for MonthBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}months", self.0, self.0 + 1)
    }
}

impl Serialize for MonthBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Loose recognizer used when resetting: any name containing a dash and
/// the word "month" is treated as a bucket folder.
pub fn is_bucket_folder_name(name: &str) -> bool {
    name.contains('-') && name.contains("month")
}

/// Human-readable age: "Newborn", "3 months", "1 year", "1 and a half years",
/// "2 years 3 months".
pub fn format_age(age_months: u32) -> String {
    if age_months == 0 {
        return "Newborn".to_string();
    }

    let years = age_months / 12;
    let months = age_months % 12;

    if years == 0 {
        return format!("{} {}", months, plural(months, "month", "months"));
    }

    match months {
        0 => format!("{} {}", years, plural(years, "year", "years")),
        6 => format!("{} and a half years", years),
        _ => format!(
            "{} {} {} {}",
            years,
            plural(years, "year", "years"),
            months,
            plural(months, "month", "months")
        ),
    }
}

fn plural<'a>(n: u32, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 { one } else { many }
}
