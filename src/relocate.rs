//! Moving misplaced files into their suggested category folder.
//!
//! The scanner only reports; this module is what actually touches the disk
//! when the user agrees to a suggestion. Every move is returned as a [`Move`]
//! so a run can be recorded in a [`MoveLog`] and reverted later.

use crate::category::Category;
use crate::models::MisplacedFile;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the history file written into the scanned root.
pub const HISTORY_FILE_NAME: &str = ".sortdesk_history.json";

/// A single completed move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub original_path: PathBuf,
    pub new_path: PathBuf,
    pub from: Category,
    pub to: Category,
}

/// All moves made by one run, persisted for undo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveLog {
    /// RFC 3339 timestamp of the run.
    pub timestamp: String,
    pub root: PathBuf,
    pub moves: Vec<Move>,
}

impl MoveLog {
    /// Starts an empty log for a run in `root`, stamped with the current time.
    pub fn new(root: PathBuf) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            root,
            moves: Vec::new(),
        }
    }

    /// Appends a completed move. Moves are undone in reverse order of
    /// recording.
    pub fn record(&mut self, entry: Move) {
        self.moves.push(entry);
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Location of the history file for `root`.
    pub fn history_path(root: &Path) -> PathBuf {
        root.join(HISTORY_FILE_NAME)
    }

    /// Writes the log as pretty JSON into `root`, replacing any previous one.
    pub fn save(&self, root: &Path) -> RelocateResult<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| RelocateError::HistoryWrite(io::Error::other(e)))?;
        fs::write(Self::history_path(root), json).map_err(RelocateError::HistoryWrite)
    }

    /// Loads the log stored in `root`, if any.
    pub fn load(root: &Path) -> RelocateResult<Option<Self>> {
        let path = Self::history_path(root);
        if !path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&path).map_err(RelocateError::HistoryRead)?;
        let log = serde_json::from_str(&json)?;
        Ok(Some(log))
    }

    /// Removes the history file from `root`. A missing file is not an error.
    pub fn delete(root: &Path) -> RelocateResult<()> {
        let path = Self::history_path(root);
        if path.exists() {
            fs::remove_file(&path).map_err(RelocateError::HistoryWrite)?;
        }
        Ok(())
    }
}

/// Errors from moving files or handling the move history.
#[derive(Debug, Error)]
pub enum RelocateError {
    #[error("Invalid root directory {}", .0.display())]
    InvalidRoot(PathBuf),

    #[error("Failed to create directory {}: {source}", .path.display())]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Refusing to overwrite existing file {}", .0.display())]
    DestinationExists(PathBuf),

    #[error("Failed to move {} to {}: {source}", .from.display(), .to.display())]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write history file: {0}")]
    HistoryWrite(#[source] io::Error),

    #[error("Failed to read history file: {0}")]
    HistoryRead(#[source] io::Error),

    #[error("Invalid history file: {0}")]
    InvalidHistory(#[from] serde_json::Error),

    #[error("No previous moves found to undo")]
    NothingToUndo,
}

pub type RelocateResult<T> = Result<T, RelocateError>;

pub struct Relocator;

impl Relocator {
    /// Moves a misplaced file into `<root>/<suggested>/`, keeping its name.
    ///
    /// The target folder is created when missing. An existing file at the
    /// destination is never overwritten.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use sortdesk::relocate::Relocator;
    /// use sortdesk::scanner::Scanner;
    ///
    /// let scanner = Scanner::new("/path/to/input").unwrap();
    /// let result = scanner.scan().unwrap();
    /// for misplaced in result.misplaced() {
    ///     match Relocator::move_misplaced(scanner.root(), misplaced) {
    ///         Ok(done) => println!("moved to {}", done.new_path.display()),
    ///         Err(e) => eprintln!("{e}"),
    ///     }
    /// }
    /// ```
    pub fn move_misplaced(root: &Path, misplaced: &MisplacedFile) -> RelocateResult<Move> {
        if !root.is_dir() {
            return Err(RelocateError::InvalidRoot(root.to_path_buf()));
        }

        let target_dir = misplaced.suggested_dir(root);
        if !target_dir.is_dir() {
            fs::create_dir(&target_dir).map_err(|source| RelocateError::DirectoryCreation {
                path: target_dir.clone(),
                source,
            })?;
        }

        let Some(file_name) = misplaced.path.file_name() else {
            return Err(RelocateError::Move {
                from: misplaced.path.clone(),
                to: target_dir,
                source: io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
            });
        };
        let destination = target_dir.join(file_name);

        if destination.exists() {
            return Err(RelocateError::DestinationExists(destination));
        }

        fs::rename(&misplaced.path, &destination).map_err(|source| RelocateError::Move {
            from: misplaced.path.clone(),
            to: destination.clone(),
            source,
        })?;

        tracing::info!(
            from = %misplaced.path.display(),
            to = %destination.display(),
            "moved misplaced file"
        );

        Ok(Move {
            original_path: misplaced.path.clone(),
            new_path: destination,
            from: misplaced.placed_in,
            to: misplaced.suggested,
        })
    }
}
