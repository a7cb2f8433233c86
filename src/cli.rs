//! Command-line interface for momentkeeper.
//!
//! ## Usage
//! ```bash
//! # Preview where files would go
//! momentkeeper --root ~/Baby --birth-date 2024-06-01 simulate
//!
//! # Move them, then put everything back
//! momentkeeper --root ~/Baby --birth-date 2024-06-01 organize
//! momentkeeper --root ~/Baby --birth-date 2024-06-01 reset
//!
//! # Statistics and insights as JSON
//! momentkeeper --root ~/Baby --birth-date 2024-06-01 --output json insights
//! ```

use crate::config::{self, AppConfig, ConfigOverrides};
use crate::error::{Result, ScanError};
use crate::gallery::{DEFAULT_GALLERY_COUNT, Gallery, GalleryMode};
use crate::insights::generate_insights_with;
use crate::media_kind::FileTypeFilter;
use crate::metrics::{Metrics, compute_metrics, find_gaps};
use crate::organizer::{BatchOutcome, OrganizerConfig, PhotoOrganizer};
use crate::output::OutputFormatter;
use crate::series::ChartSeries;
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

/// MomentKeeper - sort a child's photos and videos by age in months
#[derive(Parser, Debug)]
#[command(name = "momentkeeper")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to ./.momentkeeper.toml, then ~/.config/momentkeeper/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Root folder holding the source folder and the month folders
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Name of the folder under the root holding unsorted files
    #[arg(long, global = true)]
    pub source: Option<String>,

    /// Birth date, YYYY-MM-DD
    #[arg(long, global = true)]
    pub birth_date: Option<String>,

    /// Which media to work on
    #[arg(long, global = true)]
    pub types: Option<Types>,

    /// Output format
    #[arg(short, long, global = true, default_value = "pretty")]
    pub output: OutputFormat,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Show where every file would go, without moving anything
    Simulate,
    /// Move files into their month folders
    Organize,
    /// Move every file from the month folders back into the source folder
    Reset,
    /// Metrics and per-month, per-week and per-weekday series
    Analytics,
    /// List stretches without captures
    Gaps {
        /// Smallest gap to report, in days
        #[arg(long)]
        min_days: Option<i64>,
    },
    /// Observations about capture habits
    Insights,
    /// Pick photos to look at
    Gallery {
        #[arg(long, default_value = "chronological")]
        mode: GalleryModeArg,

        /// Number of photos to pick
        #[arg(long, default_value_t = DEFAULT_GALLERY_COUNT)]
        count: usize,
    },
    /// Save the effective settings to a configuration file
    SaveConfig {
        /// Destination (defaults to ~/.config/momentkeeper/config.toml)
        path: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Types {
    PhotosOnly,
    VideosOnly,
    Both,
}

impl From<Types> for FileTypeFilter {
    fn from(types: Types) -> Self {
        match types {
            Types::PhotosOnly => FileTypeFilter::PhotosOnly,
            Types::VideosOnly => FileTypeFilter::VideosOnly,
            Types::Both => FileTypeFilter::Both,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GalleryModeArg {
    /// Newest first
    Chronological,
    /// One photo from each of the busiest days
    Highlights,
    /// First photo of each month folder
    Timeline,
}

impl From<GalleryModeArg> for GalleryMode {
    fn from(mode: GalleryModeArg) -> Self {
        match mode {
            GalleryModeArg::Chronological => GalleryMode::Chronological,
            GalleryModeArg::Highlights => GalleryMode::Highlights,
            GalleryModeArg::Timeline => GalleryMode::Timeline,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
}

#[derive(Serialize)]
struct AnalyticsReport<'a> {
    metrics: &'a Metrics,
    series: &'a ChartSeries,
}

/// Runs one parsed command line.
///
/// # Errors
///
/// Configuration problems, a missing root or source folder, and failures
/// reading directories are returned. Per-file move failures are not errors;
/// they are printed with the batch outcome.
pub fn run_cli(cli: Cli) -> Result<()> {
    let mut settings = AppConfig::load(cli.config.as_deref())?;
    settings.apply(ConfigOverrides {
        root_dir: cli.root.clone(),
        source_subdir: cli.source.clone(),
        birth_date: cli
            .birth_date
            .as_deref()
            .map(config::parse_birth_date)
            .transpose()?,
        file_types: cli.types.map(FileTypeFilter::from),
    });

    if let Commands::SaveConfig { path } = &cli.command {
        let path = path.clone().unwrap_or_else(config::default_save_path);
        settings.save_to(&path)?;
        report_saved(&path, cli.output)?;
        return Ok(());
    }

    let organizer_config = settings.organizer_config()?;
    validate_directories(&organizer_config)?;
    let mut organizer = PhotoOrganizer::new(organizer_config);
    let output = cli.output;

    match cli.command {
        Commands::Simulate => simulate(&organizer, output),
        Commands::Organize => organize(&mut organizer, output),
        Commands::Reset => reset(&mut organizer, output),
        Commands::Analytics => analytics(&organizer, output),
        Commands::Gaps { min_days } => gaps(&organizer, min_days.unwrap_or(settings.min_gap_days()), output),
        Commands::Insights => insights(&organizer, &settings, output),
        Commands::Gallery { mode, count } => gallery(&organizer, mode.into(), count, output),
        Commands::SaveConfig { .. } => Ok(()),
    }
}

/// The root and source folders must exist before any command touches them.
fn validate_directories(config: &OrganizerConfig) -> std::result::Result<(), ScanError> {
    for dir in [config.root_dir.clone(), config.source_dir()] {
        if !dir.is_dir() {
            return Err(ScanError::DirectoryNotFound { path: dir });
        }
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn report_saved(path: &std::path::Path, output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Json => print_json(&serde_json::json!({ "saved": path })),
        OutputFormat::Pretty => {
            OutputFormatter::success(&format!("Configuration saved to {}", path.display()));
            Ok(())
        }
    }
}

fn simulate(organizer: &PhotoOrganizer, output: OutputFormat) -> Result<()> {
    let report = organizer.simulate()?;
    if output == OutputFormat::Json {
        return print_json(&report);
    }

    let config = organizer.config();
    OutputFormatter::dry_run_notice(&format!(
        "Analyzing {}",
        config.source_dir().display()
    ));

    if report.classification.is_empty() {
        OutputFormatter::info(&format!("No {} found to organize", config.file_types.noun()));
    } else {
        OutputFormatter::bucket_table(&report.classification, config.file_types);
    }
    OutputFormatter::skip_log(&report.classification);
    OutputFormatter::error_list(&report.conflicts);

    OutputFormatter::plain("");
    OutputFormatter::success("Dry run complete. No files were moved.");
    Ok(())
}

fn organize(organizer: &mut PhotoOrganizer, output: OutputFormat) -> Result<()> {
    let noun = organizer.config().file_types.noun();

    let outcome = match output {
        OutputFormat::Json => organizer.commit()?,
        OutputFormat::Pretty => {
            let total = organizer.classify()?.total_files();
            if total == 0 {
                OutputFormatter::info(&format!("No {} found to organize", noun));
                return Ok(());
            }
            let pb = OutputFormatter::create_progress_bar(total as u64);
            let outcome = organizer.commit_with_progress(|done, _, name| {
                pb.set_position(done as u64);
                pb.set_message(name.to_string());
            })?;
            pb.finish_and_clear();
            outcome
        }
    };

    print_outcome(&outcome, &format!("{} {} organized", outcome.moved, noun), output)
}

fn reset(organizer: &mut PhotoOrganizer, output: OutputFormat) -> Result<()> {
    let outcome = match output {
        OutputFormat::Json => organizer.reset()?,
        OutputFormat::Pretty => {
            let pb = OutputFormatter::create_progress_bar(0);
            let outcome = organizer.reset_with_progress(|done, total, name| {
                pb.set_length(total as u64);
                pb.set_position(done as u64);
                pb.set_message(name.to_string());
            })?;
            pb.finish_and_clear();
            outcome
        }
    };

    let message = format!(
        "{} files put back in {}",
        outcome.moved,
        organizer.config().source_subdir
    );
    print_outcome(&outcome, &message, output)
}

fn print_outcome(outcome: &BatchOutcome, message: &str, output: OutputFormat) -> Result<()> {
    if output == OutputFormat::Json {
        return print_json(outcome);
    }
    OutputFormatter::success(message);
    if !outcome.errors.is_empty() {
        OutputFormatter::header("ERRORS");
        OutputFormatter::error_list(&outcome.errors);
    }
    Ok(())
}

fn analytics(organizer: &PhotoOrganizer, output: OutputFormat) -> Result<()> {
    let filter = organizer.config().file_types;
    let table = organizer.extract_analytics()?;
    let metrics = compute_metrics(&table, filter);
    let series = ChartSeries::from_table(&table);

    if output == OutputFormat::Json {
        return print_json(&AnalyticsReport {
            metrics: &metrics,
            series: &series,
        });
    }

    if table.is_empty() {
        OutputFormatter::info(&format!("No {} found for analysis", filter.noun()));
        return Ok(());
    }
    OutputFormatter::metrics_table(&metrics, filter);
    OutputFormatter::series_chart("BY MONTH OF AGE", &series.by_age_month);
    OutputFormatter::series_chart("BY WEEK", &series.by_week);
    OutputFormatter::series_chart("BY WEEKDAY", &series.by_weekday);
    Ok(())
}

fn gaps(organizer: &PhotoOrganizer, min_days: i64, output: OutputFormat) -> Result<()> {
    let table = organizer.extract_analytics()?;
    let gaps = find_gaps(&table, min_days);
    info!(count = gaps.len(), min_days, "found gaps");

    match output {
        OutputFormat::Json => print_json(&gaps),
        OutputFormat::Pretty => {
            OutputFormatter::gap_list(&gaps, min_days);
            Ok(())
        }
    }
}

fn insights(organizer: &PhotoOrganizer, settings: &AppConfig, output: OutputFormat) -> Result<()> {
    let config = organizer.config();
    let table = organizer.extract_analytics()?;
    let metrics = compute_metrics(&table, config.file_types);
    let insights = generate_insights_with(
        &table,
        &metrics,
        config.birth_date,
        config.file_types,
        &settings.insights,
        Local::now().date_naive(),
    );

    match output {
        OutputFormat::Json => print_json(&insights),
        OutputFormat::Pretty => {
            OutputFormatter::insight_list(&insights);
            Ok(())
        }
    }
}

fn gallery(
    organizer: &PhotoOrganizer,
    mode: GalleryMode,
    count: usize,
    output: OutputFormat,
) -> Result<()> {
    let config = organizer.config();
    let table = organizer.extract_analytics()?;
    let gallery = Gallery::from_table(&table, &config.root_dir, &config.source_subdir);
    let picked = gallery.select(mode, count);

    match output {
        OutputFormat::Json => print_json(&picked),
        OutputFormat::Pretty => {
            OutputFormatter::gallery_list(&picked, config.birth_date);
            Ok(())
        }
    }
}
