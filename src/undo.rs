//! Reverting the moves recorded in the history file.
//!
//! Moves are replayed newest first, putting each file back where the scan
//! originally found it.
use crate::relocate::{Move, MoveLog, RelocateError, RelocateResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Outcome of an undo run.
#[derive(Debug, Default)]
pub struct UndoReport {
    pub restored_files: usize,
    pub failed_restores: Vec<(PathBuf, String)>,
    /// Moved files that are no longer where the history says they are.
    pub skipped_files: Vec<(PathBuf, String)>,
}

impl UndoReport {
    /// Number of history entries looked at, whatever their outcome.
    pub fn total_processed(&self) -> usize {
        self.restored_files + self.failed_restores.len() + self.skipped_files.len()
    }

    /// True when every recorded move was reverted.
    pub fn is_complete_success(&self) -> bool {
        self.failed_restores.is_empty() && self.skipped_files.is_empty()
    }
}

enum RestoreFailure {
    Missing(PathBuf, String),
    Failed(PathBuf, String),
}

/// Replays a [`MoveLog`] backwards.
pub struct UndoManager;

impl UndoManager {
    /// Undoes the most recent recorded run in `root`.
    ///
    /// A file that is gone from its new location is skipped. If something
    /// already occupies the original location it is renamed to
    /// `<name>.bak.<timestamp>` first. The history file is only deleted when
    /// every move was reverted.
    ///
    /// # Errors
    ///
    /// Fails if `root` is not a directory, if there is no history, or if the
    /// history cannot be read.
    pub fn undo(root: &Path) -> RelocateResult<UndoReport> {
        if !root.is_dir() {
            return Err(RelocateError::InvalidRoot(root.to_path_buf()));
        }

        let log = MoveLog::load(root)?.ok_or(RelocateError::NothingToUndo)?;

        let mut report = UndoReport::default();
        for entry in log.moves.iter().rev() {
            match Self::restore(entry) {
                Ok(()) => report.restored_files += 1,
                Err(RestoreFailure::Missing(path, reason)) => {
                    report.skipped_files.push((path, reason))
                }
                Err(RestoreFailure::Failed(path, reason)) => {
                    report.failed_restores.push((path, reason))
                }
            }
        }

        if report.is_complete_success()
            && let Err(e) = MoveLog::delete(root)
        {
            warn!("could not delete history file: {e}");
        }

        Ok(report)
    }

    fn restore(entry: &Move) -> Result<(), RestoreFailure> {
        if !entry.new_path.exists() {
            return Err(RestoreFailure::Missing(
                entry.new_path.clone(),
                "File not found at expected location".to_string(),
            ));
        }

        if entry.original_path.exists() {
            let backup_path = Self::backup_path(&entry.original_path);
            fs::rename(&entry.original_path, &backup_path).map_err(|e| {
                RestoreFailure::Failed(
                    entry.original_path.clone(),
                    format!("Could not back up conflicting file: {e}"),
                )
            })?;
            warn!(
                original = %entry.original_path.display(),
                backup = %backup_path.display(),
                "backed up conflicting file"
            );
        }

        if let Some(parent) = entry.original_path.parent()
            && !parent.is_dir()
        {
            fs::create_dir_all(parent).map_err(|e| {
                RestoreFailure::Failed(
                    parent.to_path_buf(),
                    format!("Could not recreate folder: {e}"),
                )
            })?;
        }

        fs::rename(&entry.new_path, &entry.original_path).map_err(|e| {
            RestoreFailure::Failed(
                entry.new_path.clone(),
                format!("Failed to restore file: {e}"),
            )
        })
    }

    /// `big.md` becomes `big.md.bak.20251109-143052`.
    fn backup_path(original_path: &Path) -> PathBuf {
        let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        let file_name = original_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());
        original_path.with_file_name(format!("{file_name}.bak.{timestamp}"))
    }
}
