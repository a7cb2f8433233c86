/// Single-file move and copy primitives with in-memory undo history.
///
/// This module moves or copies one file at a time into a destination
/// directory. Existing destinations are never overwritten: a name collision
/// is always reported to the caller. Every successful move is recorded so
/// the most recent one can be reversed.
use crate::error::MoveError;
use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default number of moves kept for undo.
pub const DEFAULT_HISTORY_LIMIT: usize = 10_000;

/// Represents a single completed move.
///
/// Records where a file was and where it went, enabling undo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    /// The path of the file before the move.
    pub original_path: PathBuf,
    /// The path of the file after the move.
    pub new_path: PathBuf,
}

/// Result type for move operations.
pub type MoveResult<T> = Result<T, MoveError>;

/// Moves and copies files, keeping a bounded stack of completed moves.
///
/// The history lives only as long as the mover; nothing is written to disk.
#[derive(Debug)]
pub struct FileMover {
    history: VecDeque<MoveRecord>,
    history_limit: usize,
}

impl FileMover {
    /// Creates a mover with the default history limit.
    pub fn new() -> Self {
        Self::with_history_limit(DEFAULT_HISTORY_LIMIT)
    }

    /// Creates a mover that keeps at most `limit` moves; the oldest entries
    /// are dropped first.
    pub fn with_history_limit(limit: usize) -> Self {
        Self {
            history: VecDeque::new(),
            history_limit: limit.max(1),
        }
    }

    /// Moves `source` into `dest_dir`, keeping its file name.
    ///
    /// `dest_dir` (and its parents) is created if missing. Fails with
    /// [`MoveError::SourceNotFound`] if the source is gone and with
    /// [`MoveError::AlreadyExists`] if the destination name is taken.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use momentkeeper::file_mover::FileMover;
    /// use std::path::Path;
    ///
    /// let mut mover = FileMover::new();
    /// match mover.move_file(Path::new("photos/20240705_a.jpg"), Path::new("1-2months")) {
    ///     Ok(dest) => println!("Moved to {}", dest.display()),
    ///     Err(e) => eprintln!("Move failed: {}", e),
    /// }
    /// ```
    pub fn move_file(&mut self, source: &Path, dest_dir: &Path) -> MoveResult<PathBuf> {
        let destination = prepare_destination(source, dest_dir)?;

        transfer(source, &destination)?;
        debug!(from = %source.display(), to = %destination.display(), "moved file");

        self.record(MoveRecord {
            original_path: source.to_path_buf(),
            new_path: destination.clone(),
        });

        Ok(destination)
    }

    /// Copies `source` into `dest_dir`, preserving the modification time.
    ///
    /// Same preconditions as [`FileMover::move_file`]. Copies are not
    /// recorded in the undo history.
    pub fn copy_file(&self, source: &Path, dest_dir: &Path) -> MoveResult<PathBuf> {
        let destination = prepare_destination(source, dest_dir)?;

        copy_with_mtime(source, &destination)
            .map_err(|e| transfer_error(source, &destination, e))?;
        debug!(from = %source.display(), to = %destination.display(), "copied file");

        Ok(destination)
    }

    /// Reverses the most recent move.
    ///
    /// Returns `Ok(None)` if there is nothing to undo or if the moved file
    /// is no longer where it was put (that entry is discarded). If moving
    /// back fails, the entry stays on the stack and the error is returned.
    pub fn undo_last(&mut self) -> MoveResult<Option<MoveRecord>> {
        let Some(record) = self.history.pop_back() else {
            return Ok(None);
        };

        if !record.new_path.exists() {
            debug!(path = %record.new_path.display(), "moved file vanished, dropping undo entry");
            return Ok(None);
        }

        if record.original_path.exists() {
            let path = record.original_path.clone();
            self.history.push_back(record);
            return Err(MoveError::AlreadyExists { path });
        }

        if let Some(parent) = record.original_path.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            let path = parent.to_path_buf();
            self.history.push_back(record);
            return Err(MoveError::DirectoryCreationFailed { path, source: e });
        }

        if let Err(e) = transfer(&record.new_path, &record.original_path) {
            self.history.push_back(record);
            return Err(e);
        }

        debug!(
            from = %record.new_path.display(),
            to = %record.original_path.display(),
            "undid move"
        );
        Ok(Some(record))
    }

    /// Completed moves, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &MoveRecord> {
        self.history.iter()
    }

    /// Number of moves that can currently be undone.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    fn record(&mut self, record: MoveRecord) {
        if self.history.len() == self.history_limit {
            self.history.pop_front();
        }
        self.history.push_back(record);
    }
}

impl Default for FileMover {
    fn default() -> Self {
        Self::new()
    }
}

/// Validates the source and computes a free destination path inside
/// `dest_dir`, creating the directory if needed.
fn prepare_destination(source: &Path, dest_dir: &Path) -> MoveResult<PathBuf> {
    if !source.exists() {
        return Err(MoveError::SourceNotFound {
            path: source.to_path_buf(),
        });
    }

    if !dest_dir.exists() {
        fs::create_dir_all(dest_dir).map_err(|e| MoveError::DirectoryCreationFailed {
            path: dest_dir.to_path_buf(),
            source: e,
        })?;
    }

    let file_name = source.file_name().ok_or_else(|| MoveError::NoFileName {
        path: source.to_path_buf(),
    })?;

    let destination = dest_dir.join(file_name);
    if destination.exists() {
        return Err(MoveError::AlreadyExists { path: destination });
    }

    Ok(destination)
}

/// Maps an I/O failure on `to` into a `MoveError`. A destination that
/// appeared after the existence check is reported as a collision.
fn transfer_error(from: &Path, to: &Path, e: io::Error) -> MoveError {
    if e.kind() == io::ErrorKind::AlreadyExists {
        return MoveError::AlreadyExists {
            path: to.to_path_buf(),
        };
    }
    MoveError::TransferFailed {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source: e,
    }
}

/// Moves `from` to `to` without ever replacing an existing `to`.
///
/// A hard link claims the destination name atomically; the source link is
/// then removed. Where linking is not possible (another filesystem, or a
/// filesystem without hard links) the file is copied into a newly created
/// destination and the source deleted.
fn transfer(from: &Path, to: &Path) -> MoveResult<()> {
    let wrap = |e: io::Error| transfer_error(from, to, e);

    match fs::hard_link(from, to) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Err(wrap(e)),
        Err(e) => {
            debug!(error = %e, "hard link failed, copying instead");
            copy_with_mtime(from, to).map_err(wrap)?;
        }
    }

    if let Err(e) = fs::remove_file(from) {
        let _ = fs::remove_file(to);
        return Err(wrap(e));
    }
    Ok(())
}

/// Copies file contents and permissions into a file that must not exist
/// yet, then carries the modification time over to the copy.
fn copy_with_mtime(from: &Path, to: &Path) -> io::Result<()> {
    let mut reader = File::open(from)?;
    let metadata = reader.metadata()?;
    let mut writer = OpenOptions::new().write(true).create_new(true).open(to)?;

    let copied = io::copy(&mut reader, &mut writer)
        .and_then(|_| writer.set_modified(metadata.modified()?))
        .and_then(|_| writer.set_permissions(metadata.permissions()));
    if copied.is_err() {
        drop(writer);
        let _ = fs::remove_file(to);
    }
    copied
}
