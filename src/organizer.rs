/// Organization of a source folder into month-of-age folders.
///
/// `PhotoOrganizer` ties the classifier and the file mover together. A
/// simulation reports destination conflicts without touching the disk; a
/// reset undoes a commit folder by folder.
/// Batch operations never stop on a per-file failure; each one becomes a
/// human-readable error string in the returned outcome.
use crate::age::is_bucket_folder_name;
use crate::analytics::{self, AnalyticsTable};
use crate::classifier::{self, Classification, list_dirs, list_files};
use crate::error::{MoveError, ScanError};
use crate::file_mover::{FileMover, MoveRecord};
use crate::media_kind::FileTypeFilter;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default name of the folder holding unsorted files.
pub const DEFAULT_SOURCE_SUBDIR: &str = "photos";

/// Immutable settings for one organizer instance.
#[derive(Debug, Clone)]
pub struct OrganizerConfig {
    pub root_dir: PathBuf,
    pub source_subdir: String,
    pub birth_date: NaiveDate,
    pub file_types: FileTypeFilter,
    active_extensions: HashSet<String>,
}

impl OrganizerConfig {
    /// Builds a config; the active extension set is derived from `file_types`.
    pub fn new(
        root_dir: impl Into<PathBuf>,
        source_subdir: impl Into<String>,
        birth_date: NaiveDate,
        file_types: FileTypeFilter,
    ) -> Self {
        Self {
            root_dir: root_dir.into(),
            source_subdir: source_subdir.into(),
            birth_date,
            file_types,
            active_extensions: file_types.active_extensions(),
        }
    }

    /// The folder holding unsorted files.
    pub fn source_dir(&self) -> PathBuf {
        self.root_dir.join(&self.source_subdir)
    }

    /// Lowercase extensions (no dot) this instance works on.
    pub fn active_extensions(&self) -> &HashSet<String> {
        &self.active_extensions
    }
}

/// Dry-run result: the would-be buckets plus destination conflicts.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub classification: Classification,
    pub conflicts: Vec<String>,
}

/// Result of a commit or reset batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    pub moved: usize,
    pub errors: Vec<String>,
}

impl BatchOutcome {
    fn record_failure(&mut self, file_name: &str, error: &MoveError) {
        warn!(file = %file_name, error = %error, "file not moved");
        self.errors.push(format!("Error for {}: {}", file_name, error));
    }
}

/// Organizes files under a root directory into month-of-age folders.
#[derive(Debug)]
pub struct PhotoOrganizer {
    config: OrganizerConfig,
    mover: FileMover,
}

impl PhotoOrganizer {
    /// Creates an organizer for the given settings.
    pub fn new(config: OrganizerConfig) -> Self {
        Self {
            config,
            mover: FileMover::new(),
        }
    }

    /// The settings this organizer was built with.
    pub fn config(&self) -> &OrganizerConfig {
        &self.config
    }

    /// Scans the source folder and buckets its files.
    pub fn classify(&self) -> Result<Classification, ScanError> {
        classifier::classify(
            &self.config.source_dir(),
            self.config.birth_date,
            self.config.active_extensions(),
        )
    }

    /// Computes where every bucketed file would go, flagging destinations
    /// that already exist. Nothing on disk is changed.
    pub fn simulate(&self) -> Result<SimulationReport, ScanError> {
        let classification = self.classify()?;
        let mut conflicts = Vec::new();

        for (bucket, records) in &classification.buckets {
            let target_dir = self.config.root_dir.join(bucket.label());
            for record in records {
                let target = target_dir.join(&record.file_name);
                if target.exists() {
                    conflicts.push(format!("File {} already exists", target.display()));
                }
            }
        }

        Ok(SimulationReport {
            classification,
            conflicts,
        })
    }

    /// Moves every bucketed file into its month folder.
    pub fn commit(&mut self) -> Result<BatchOutcome, ScanError> {
        self.commit_with_progress(|_, _, _| {})
    }

    /// Like [`PhotoOrganizer::commit`], calling `on_progress(done, total,
    /// file_name)` after each file.
    pub fn commit_with_progress<F>(&mut self, mut on_progress: F) -> Result<BatchOutcome, ScanError>
    where
        F: FnMut(usize, usize, &str),
    {
        let classification = self.classify()?;
        let total = classification.total_files();
        let mut outcome = BatchOutcome::default();
        let mut done = 0;

        for (bucket, records) in &classification.buckets {
            let target_dir = self.config.root_dir.join(bucket.label());
            for record in records {
                match self.mover.move_file(&record.path, &target_dir) {
                    Ok(_) => outcome.moved += 1,
                    Err(e) => outcome.record_failure(&record.file_name, &e),
                }
                done += 1;
                on_progress(done, total, &record.file_name);
            }
        }

        info!(moved = outcome.moved, errors = outcome.errors.len(), "commit finished");
        Ok(outcome)
    }

    /// Moves every file found in bucket folders back into the source folder
    /// and removes bucket folders left empty.
    pub fn reset(&mut self) -> Result<BatchOutcome, ScanError> {
        self.reset_with_progress(|_, _, _| {})
    }

    /// Like [`PhotoOrganizer::reset`], with a per-file progress callback.
    pub fn reset_with_progress<F>(&mut self, mut on_progress: F) -> Result<BatchOutcome, ScanError>
    where
        F: FnMut(usize, usize, &str),
    {
        let source_dir = self.config.source_dir();
        let mut pending: Vec<(PathBuf, Vec<PathBuf>)> = Vec::new();

        for dir in self.bucket_folders()? {
            let files = list_files(&dir)?;
            pending.push((dir, files));
        }

        let total: usize = pending.iter().map(|(_, files)| files.len()).sum();
        let mut outcome = BatchOutcome::default();
        let mut done = 0;

        for (dir, files) in pending {
            for file in files {
                let file_name = file_name_of(&file);
                match self.mover.move_file(&file, &source_dir) {
                    Ok(_) => outcome.moved += 1,
                    Err(e) => outcome.record_failure(&file_name, &e),
                }
                done += 1;
                on_progress(done, total, &file_name);
            }

            remove_if_empty(&dir)?;
        }

        info!(moved = outcome.moved, errors = outcome.errors.len(), "reset finished");
        Ok(outcome)
    }

    /// Reverses the most recent single move made by this organizer.
    pub fn undo_last_move(&mut self) -> Result<Option<MoveRecord>, MoveError> {
        self.mover.undo_last()
    }

    /// Re-derives the analytics table from every folder under the root.
    pub fn extract_analytics(&self) -> Result<AnalyticsTable, ScanError> {
        analytics::extract(
            &self.config.root_dir,
            self.config.birth_date,
            self.config.active_extensions(),
        )
    }

    /// Subdirectories of the root that follow the bucket naming convention.
    fn bucket_folders(&self) -> Result<Vec<PathBuf>, ScanError> {
        let source_dir = self.config.source_dir();
        Ok(list_dirs(&self.config.root_dir)?
            .into_iter()
            .filter(|dir| *dir != source_dir && is_bucket_folder_name(&file_name_of(dir)))
            .collect())
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn remove_if_empty(dir: &Path) -> Result<(), ScanError> {
    let mut entries = fs::read_dir(dir).map_err(|e| ScanError::ReadDirectory {
        path: dir.to_path_buf(),
        source: e,
    })?;

    if entries.next().is_none() {
        fs::remove_dir(dir).map_err(|e| ScanError::RemoveDirectory {
            path: dir.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup(files: &[&str]) -> (TempDir, PhotoOrganizer) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source = temp_dir.path().join(DEFAULT_SOURCE_SUBDIR);
        fs::create_dir(&source).unwrap();
        for name in files {
            fs::write(source.join(name), name).unwrap();
        }
        let config = OrganizerConfig::new(
            temp_dir.path(),
            DEFAULT_SOURCE_SUBDIR,
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            FileTypeFilter::Both,
        );
        (temp_dir, PhotoOrganizer::new(config))
    }

    #[test]
    fn test_simulate_does_not_touch_disk() {
        let (temp_dir, organizer) = setup(&["20240705_a.jpg", "20240901_c.jpg"]);

        let report = organizer.simulate().expect("Simulation failed");

        assert_eq!(report.classification.total_files(), 2);
        assert!(report.conflicts.is_empty());
        assert!(!temp_dir.path().join("1-2months").exists());
        assert!(temp_dir.path().join("photos/20240705_a.jpg").exists());
    }

    #[test]
    fn test_simulate_flags_conflicts() {
        let (temp_dir, organizer) = setup(&["20240705_a.jpg"]);
        let bucket = temp_dir.path().join("1-2months");
        fs::create_dir(&bucket).unwrap();
        fs::write(bucket.join("20240705_a.jpg"), "older copy").unwrap();

        let report = organizer.simulate().unwrap();

        assert_eq!(report.conflicts.len(), 1);
        assert!(report.conflicts[0].contains("20240705_a.jpg"));
        assert!(report.conflicts[0].ends_with("already exists"));
    }

    #[test]
    fn test_commit_continues_past_conflicts() {
        let (temp_dir, mut organizer) = setup(&["20240705_a.jpg", "20240710_b.jpg"]);
        let bucket = temp_dir.path().join("1-2months");
        fs::create_dir(&bucket).unwrap();
        fs::write(bucket.join("20240705_a.jpg"), "older copy").unwrap();

        let outcome = organizer.commit().unwrap();

        assert_eq!(outcome.moved, 1);
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors[0].starts_with("Error for 20240705_a.jpg: "));
        assert_eq!(
            fs::read_to_string(bucket.join("20240705_a.jpg")).unwrap(),
            "older copy"
        );
        assert!(temp_dir.path().join("photos/20240705_a.jpg").exists());
        assert!(bucket.join("20240710_b.jpg").exists());
    }

    #[test]
    fn test_commit_reports_progress() {
        let (_temp_dir, mut organizer) = setup(&["20240705_a.jpg", "20240901_c.jpg"]);
        let mut seen = Vec::new();

        organizer
            .commit_with_progress(|done, total, name| seen.push((done, total, name.to_string())))
            .unwrap();

        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1].0, 2);
        assert_eq!(seen[1].1, 2);
    }

    #[test]
    fn test_reset_moves_back_and_removes_empty_buckets() {
        let (temp_dir, mut organizer) = setup(&["20240705_a.jpg", "20240901_c.jpg"]);
        organizer.commit().unwrap();

        let outcome = organizer.reset().unwrap();

        assert_eq!(outcome, BatchOutcome { moved: 2, errors: vec![] });
        assert!(!temp_dir.path().join("1-2months").exists());
        assert!(!temp_dir.path().join("3-4months").exists());
        assert!(temp_dir.path().join("photos/20240705_a.jpg").exists());
    }

    #[test]
    fn test_reset_keeps_bucket_with_leftovers() {
        let (temp_dir, mut organizer) = setup(&["20240705_a.jpg"]);
        organizer.commit().unwrap();
        fs::write(temp_dir.path().join("photos/20240705_a.jpg"), "clash").unwrap();

        let outcome = organizer.reset().unwrap();

        assert_eq!(outcome.moved, 0);
        assert_eq!(outcome.errors.len(), 1);
        assert!(temp_dir.path().join("1-2months/20240705_a.jpg").exists());
    }

    #[test]
    fn test_reset_ignores_unrelated_folders() {
        let (temp_dir, mut organizer) = setup(&[]);
        let other = temp_dir.path().join("holidays");
        fs::create_dir(&other).unwrap();
        fs::write(other.join("20240705_a.jpg"), "x").unwrap();

        let outcome = organizer.reset().unwrap();

        assert_eq!(outcome.moved, 0);
        assert!(other.join("20240705_a.jpg").exists());
    }

    #[test]
    fn test_undo_last_move_after_commit() {
        let (temp_dir, mut organizer) = setup(&["20240705_a.jpg", "20240901_c.jpg"]);
        organizer.commit().unwrap();

        let undone = organizer.undo_last_move().unwrap().expect("Nothing to undo");

        assert_eq!(undone.original_path, temp_dir.path().join("photos/20240901_c.jpg"));
        assert!(temp_dir.path().join("photos/20240901_c.jpg").exists());
        assert!(temp_dir.path().join("1-2months/20240705_a.jpg").exists());
    }
}
