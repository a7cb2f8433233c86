//! Error types for momentkeeper.
//!
//! Per-file problems inside batch operations are reported as strings in the
//! batch outcome; the types here cover failures that stop an operation.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error returned by the CLI runner.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Move(#[from] MoveError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures of a single move or copy.
#[derive(Error, Debug)]
pub enum MoveError {
    #[error("Source file {path} does not exist")]
    SourceNotFound { path: PathBuf },

    #[error("File {path} already exists")]
    AlreadyExists { path: PathBuf },

    #[error("Path {path} has no file name component")]
    NoFileName { path: PathBuf },

    #[error("Failed to create directory {path}: {source}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to transfer {from} to {to}: {source}")]
    TransferFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures reading the directories an operation depends on.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to remove directory {path}: {source}")]
    RemoveDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failures loading, validating or saving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("Missing required setting '{0}' (pass it on the command line or in the config file)")]
    MissingSetting(&'static str),

    #[error("Invalid birth date '{0}': expected YYYY-MM-DD")]
    InvalidBirthDate(String),

    #[error("IO error on configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result alias used by the CLI runner.
pub type Result<T> = std::result::Result<T, Error>;
