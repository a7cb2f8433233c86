//! Persistent settings.
//!
//! Settings are stored as TOML. Every key is optional; command-line flags
//! override whatever the file provides.
//!
//! # Configuration File Format
//!
//! ```toml
//! root_dir = "/home/me/Baby"
//! source_subdir = "photos"
//! birth_date = "2024-06-01"
//! file_types = "both"          # photos_only | videos_only | both
//!
//! [insights]
//! min_gap_days = 5
//! burst_day = 12
//! recent_days = 14
//! ```

use crate::error::ConfigError;
use crate::insights::InsightThresholds;
use crate::media_kind::FileTypeFilter;
use crate::organizer::{DEFAULT_SOURCE_SUBDIR, OrganizerConfig};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Config file looked up in the current directory.
pub const LOCAL_CONFIG_FILE: &str = ".momentkeeper.toml";

/// Settings loaded from a config file, before command-line overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_dir: Option<PathBuf>,

    /// Name of the folder under the root holding unsorted files.
    pub source_subdir: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,

    pub file_types: FileTypeFilter,

    pub insights: InsightThresholds,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            root_dir: None,
            source_subdir: DEFAULT_SOURCE_SUBDIR.to_string(),
            birth_date: None,
            file_types: FileTypeFilter::default(),
            insights: InsightThresholds::default(),
        }
    }
}

/// Values given on the command line. `None` keeps the configured value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub root_dir: Option<PathBuf>,
    pub source_subdir: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub file_types: Option<FileTypeFilter>,
}

impl AppConfig {
    /// Load configuration from a file, with fallback to defaults.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.momentkeeper.toml` in the current directory
    /// 3. Look for `~/.config/momentkeeper/config.toml`
    /// 4. Fall back to default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is explicitly provided but
    /// cannot be read, or if any file found is not valid.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Some(home_config) = home_config_path()
            && home_config.exists()
        {
            return Self::load_from_file(&home_config);
        }

        debug!("no configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigNotFound` if the file does not exist and
    /// `ConfigError::ConfigInvalid` if TOML parsing fails.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config = toml::from_str(&content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Writes the settings to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))?;
        fs::write(path, content).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        debug!(path = %path.display(), "saved configuration");
        Ok(())
    }

    /// Applies command-line values on top of the loaded ones.
    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(root_dir) = overrides.root_dir {
            self.root_dir = Some(root_dir);
        }
        if let Some(source_subdir) = overrides.source_subdir {
            self.source_subdir = source_subdir;
        }
        if let Some(birth_date) = overrides.birth_date {
            self.birth_date = Some(birth_date);
        }
        if let Some(file_types) = overrides.file_types {
            self.file_types = file_types;
        }
    }

    /// Gap threshold shared by the `gaps` listing and the silence insight.
    pub fn min_gap_days(&self) -> i64 {
        self.insights.min_gap_days
    }

    /// Builds the organizer settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingSetting` when the root directory or the
    /// birth date is unknown.
    pub fn organizer_config(&self) -> Result<OrganizerConfig, ConfigError> {
        let root_dir = self
            .root_dir
            .clone()
            .ok_or(ConfigError::MissingSetting("root_dir"))?;
        let birth_date = self
            .birth_date
            .ok_or(ConfigError::MissingSetting("birth_date"))?;

        Ok(OrganizerConfig::new(
            root_dir,
            self.source_subdir.clone(),
            birth_date,
            self.file_types,
        ))
    }
}

/// `~/.config/momentkeeper/config.toml`, if `HOME` is set.
pub fn home_config_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| {
        PathBuf::from(home)
            .join(".config")
            .join("momentkeeper")
            .join("config.toml")
    })
}

/// Where `save-config` writes when no path is given.
pub fn default_save_path() -> PathBuf {
    home_config_path().unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
}

/// Parses a `YYYY-MM-DD` birth date.
pub fn parse_birth_date(value: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ConfigError::InvalidBirthDate(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.source_subdir, "photos");
        assert_eq!(config.file_types, FileTypeFilter::Both);
        assert_eq!(config.min_gap_days(), 5);
        assert_eq!(config.root_dir, None);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let result = AppConfig::load(Some(&temp_dir.path().join("nope.toml")));
        assert!(matches!(result, Err(ConfigError::ConfigNotFound(_))));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
birth_date = "2024-06-01"
file_types = "videos_only"

[insights]
burst_day = 12
"#,
        )
        .unwrap();

        let config = AppConfig::load(Some(&path)).expect("Failed to load config");

        assert_eq!(config.birth_date, NaiveDate::from_ymd_opt(2024, 6, 1));
        assert_eq!(config.file_types, FileTypeFilter::VideosOnly);
        assert_eq!(config.source_subdir, "photos");
        assert_eq!(config.insights.burst_day, 12);
        assert_eq!(config.insights.productive_day, 5);
    }

    #[test]
    fn test_gap_threshold_comes_from_insights_table() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[insights]\nmin_gap_days = 9\n").unwrap();

        let config = AppConfig::load(Some(&path)).expect("Failed to load config");

        assert_eq!(config.min_gap_days(), 9);
        assert_eq!(config.insights.min_gap_days, 9);
        let saved = toml::to_string(&config).unwrap();
        assert_eq!(saved.matches("min_gap_days").count(), 1);
    }

    #[test]
    fn test_invalid_toml() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "birth_date = [not toml").unwrap();

        let result = AppConfig::load_from_file(&path);
        assert!(matches!(result, Err(ConfigError::ConfigInvalid(_))));
    }

    #[test]
    fn test_save_creates_parent_and_reloads() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("nested/dir/config.toml");
        let config = AppConfig {
            root_dir: Some(temp_dir.path().to_path_buf()),
            birth_date: NaiveDate::from_ymd_opt(2024, 6, 1),
            file_types: FileTypeFilter::PhotosOnly,
            ..AppConfig::default()
        };

        config.save_to(&path).expect("Failed to save config");

        assert!(path.exists());
        assert_eq!(AppConfig::load_from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_overrides_win() {
        let mut config = AppConfig {
            source_subdir: "camera".to_string(),
            ..AppConfig::default()
        };
        config.apply(ConfigOverrides {
            root_dir: Some(PathBuf::from("/tmp/baby")),
            birth_date: NaiveDate::from_ymd_opt(2024, 6, 1),
            ..ConfigOverrides::default()
        });

        let organizer = config.organizer_config().expect("Settings incomplete");
        assert_eq!(organizer.source_dir(), PathBuf::from("/tmp/baby/camera"));
        assert_eq!(organizer.file_types, FileTypeFilter::Both);
    }

    #[test]
    fn test_missing_settings() {
        let mut config = AppConfig::default();
        assert!(matches!(
            config.organizer_config(),
            Err(ConfigError::MissingSetting("root_dir"))
        ));

        config.root_dir = Some(PathBuf::from("/tmp"));
        assert!(matches!(
            config.organizer_config(),
            Err(ConfigError::MissingSetting("birth_date"))
        ));
    }

    #[test]
    fn test_parse_birth_date() {
        assert_eq!(
            parse_birth_date("2024-06-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
        );
        assert!(matches!(
            parse_birth_date("01/06/2024"),
            Err(ConfigError::InvalidBirthDate(_))
        ));
    }
}
