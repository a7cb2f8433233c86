//! momentkeeper - sort a child's photos and videos into month-of-age folders
//!
//! Files named `YYYYMMDD_<anything>.<ext>` in a source folder are bucketed by
//! the child's age at capture and moved into folders named
//! `"{N}-{N+1}months"`. The same tree can be analysed for capture metrics,
//! gaps and insights whether or not it has been organized.
//!
//! - `classifier` / `organizer` - bucketing, simulate, commit, reset
//! - `analytics` / `metrics` / `insights` / `series` / `gallery` - read-only analysis
//! - `config` / `cli` / `output` - the command-line application

pub mod age;
pub mod analytics;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod error;
pub mod file_mover;
pub mod filename_date;
pub mod gallery;
pub mod insights;
pub mod media_kind;
pub mod metrics;
pub mod organizer;
pub mod output;
pub mod series;

pub use age::{MonthBucket, age_in_months, format_age};
pub use analytics::{AnalyticsRow, AnalyticsTable};
pub use classifier::{Classification, FileRecord, SkipReason, SkippedFile};
pub use config::AppConfig;
pub use error::{ConfigError, Error, MoveError, Result, ScanError};
pub use file_mover::{FileMover, MoveRecord};
pub use filename_date::parse_filename_date;
pub use insights::{InsightEngine, InsightRule, InsightThresholds, generate_insights};
pub use media_kind::{FileTypeFilter, MediaKind};
pub use metrics::{Gap, Metrics, compute_metrics, find_gaps};
pub use organizer::{BatchOutcome, OrganizerConfig, PhotoOrganizer, SimulationReport};

pub use cli::{Cli, run_cli};

/// Installs the global tracing subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence; otherwise the level is `debug` when
/// `verbose` is set and `warn` when it is not. Calling this more than once is
/// harmless.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
