//! Output formatting and styling module.
//!
//! Provides a centralized interface for all human-readable CLI output:
//! colored status lines, progress bars, and the tables printed by each
//! command. JSON output bypasses this module entirely.

use crate::age::format_age;
use crate::classifier::Classification;
use crate::gallery::{GalleryPhoto, age_caption};
use crate::media_kind::{FileTypeFilter, MediaKind};
use crate::metrics::{Gap, Metrics};
use crate::series::SeriesPoint;
use chrono::NaiveDate;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

const PROGRESS_TEMPLATE: &str = "{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}";

/// Manages all CLI output with consistent styling and formatting.
///
/// This struct provides methods for:
/// - Success messages (green with ✓)
/// - Error messages (red with ✗)
/// - Warning messages (yellow with ⚠)
/// - Info messages (cyan)
/// - Progress bars for batch moves
/// - Bucket, metrics and series tables
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use momentkeeper::output::OutputFormatter;
    /// OutputFormatter::success("4 files organized");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message to stderr in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    pub fn plain(message: &str) {
        println!("{}", message);
    }

    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Creates a progress bar for batch moves.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use momentkeeper::output::OutputFormatter;
    /// let pb = OutputFormatter::create_progress_bar(4);
    /// pb.inc(1);
    /// pb.finish_with_message("Done");
    /// ```
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let style = ProgressStyle::with_template(PROGRESS_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        let pb = ProgressBar::new(total);
        pb.set_style(style);
        pb
    }

    /// Prints one row per month bucket, then the per-kind totals.
    pub fn bucket_table(classification: &Classification, filter: FileTypeFilter) {
        Self::header("BUCKETS");

        let width = classification
            .buckets
            .keys()
            .map(|bucket| bucket.label().len())
            .max()
            .unwrap_or(0)
            .max(6);

        println!("{:<width$} | {}", "Folder".bold(), "Files".bold(), width = width);
        println!("{}", "-".repeat(width + 10));

        for (bucket, records) in &classification.buckets {
            println!(
                "{:<width$} | {} {}",
                bucket.label(),
                records.len().to_string().green(),
                file_word(records.len()),
                width = width
            );
        }

        println!("{}", "-".repeat(width + 10));
        let total = classification.total_files();
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total.to_string().green().bold(),
            file_word(total),
            width = width
        );

        if filter == FileTypeFilter::Both {
            println!(
                "{} photos, {} videos",
                classification.count_kind(MediaKind::Photo),
                classification.count_kind(MediaKind::Video)
            );
        }
    }

    /// Lists files left out of every bucket.
    pub fn skip_log(classification: &Classification) {
        if classification.skipped.is_empty() {
            return;
        }
        Self::header(&format!("SKIPPED ({})", classification.skipped.len()));
        for skipped in &classification.skipped {
            println!("  {} ({})", skipped.file_name, skipped.reason.to_string().dimmed());
        }
    }

    /// Prints per-file error strings as warnings.
    pub fn error_list(errors: &[String]) {
        for error in errors {
            Self::warning(error);
        }
    }

    /// Prints the metrics block.
    pub fn metrics_table(metrics: &Metrics, filter: FileTypeFilter) {
        Self::header("METRICS");

        let mut rows: Vec<(&str, String)> = Vec::new();
        if filter.includes(MediaKind::Photo) {
            rows.push(("Photos", metrics.total_photos.to_string()));
        }
        if filter.includes(MediaKind::Video) {
            rows.push(("Videos", metrics.total_videos.to_string()));
        }
        rows.push(("Total", metrics.total_files.to_string()));
        rows.push((
            "Last capture",
            metrics
                .last_capture_date
                .map(|d| d.format("%d/%m/%Y").to_string())
                .unwrap_or_else(|| "-".to_string()),
        ));
        rows.push(("Growth", format_age(metrics.coverage_months)));
        rows.push(("Daily record", metrics.busiest_day_count.to_string()));
        rows.push(("Rhythm", format!("{:.1} per month", metrics.avg_per_month)));
        rows.push(("Longest gap", format!("{} days", metrics.max_gap_days)));

        for (label, value) in rows {
            println!("{:<14} {}", label.bold(), value);
        }
    }

    /// Prints a labelled bar chart made of block characters.
    pub fn series_chart(title: &str, points: &[SeriesPoint]) {
        Self::header(title);

        let max = points.iter().map(|p| p.count).max().unwrap_or(0);
        let width = points.iter().map(|p| p.label.len()).max().unwrap_or(0);
        for point in points {
            let bar_len = if max == 0 { 0 } else { point.count * 30 / max };
            println!(
                "{:<width$} {} {}",
                point.label,
                "█".repeat(bar_len).cyan(),
                point.count,
                width = width
            );
        }
    }

    pub fn gap_list(gaps: &[Gap], min_days: i64) {
        Self::header(&format!("GAPS OF {} DAYS OR MORE", min_days));
        if gaps.is_empty() {
            Self::info("No gaps found");
            return;
        }
        for gap in gaps {
            println!(
                "  {} → {}  {} days",
                gap.start.format("%d/%m/%Y"),
                gap.end.format("%d/%m/%Y"),
                gap.days.to_string().yellow()
            );
        }
    }

    pub fn insight_list(insights: &[String]) {
        Self::header("INSIGHTS");
        for insight in insights {
            println!("  • {}", insight);
        }
    }

    /// Prints selected gallery photos with their age badge.
    pub fn gallery_list(photos: &[&GalleryPhoto], birth_date: NaiveDate) {
        Self::header("GALLERY");
        if photos.is_empty() {
            Self::info("No photos to show");
            return;
        }
        for photo in photos {
            println!(
                "  {} {}",
                format!("[{}]", age_caption(photo, birth_date)).green(),
                photo.path.display()
            );
        }
    }
}

fn file_word(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}
