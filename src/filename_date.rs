//! Capture-date extraction from filenames.
//!
//! Only one shape is accepted: `YYYYMMDD_<anything>`. The eight characters
//! before the first underscore must be ASCII digits forming a real calendar
//! date. Everything else yields `None`.

use chrono::NaiveDate;

/// Length of the `YYYYMMDD` prefix.
const DATE_PREFIX_LEN: usize = 8;

/// `chrono` format of the date prefix.
pub const DATE_FORMAT: &str = "%Y%m%d";

/// Extracts the capture date from a filename such as `20240705_a.jpg`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use momentkeeper::filename_date::parse_filename_date;
///
/// assert_eq!(
///     parse_filename_date("20240705_beach.jpg"),
///     NaiveDate::from_ymd_opt(2024, 7, 5)
/// );
/// assert_eq!(parse_filename_date("IMG_20240705.jpg"), None);
/// assert_eq!(parse_filename_date("20240705.jpg"), None);
/// ```
pub fn parse_filename_date(filename: &str) -> Option<NaiveDate> {
    let (prefix, _) = filename.split_once('_')?;

    if prefix.len() != DATE_PREFIX_LEN || !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    NaiveDate::parse_from_str(prefix, DATE_FORMAT).ok()
}
