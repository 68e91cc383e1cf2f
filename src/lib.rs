//! sortdesk - categorization checks for a conversations/notes/documents tree
//!
//! This library scans an input directory with three category folders,
//! validates every file against its folder's rules, flags files that belong in
//! another folder, and removes cross-category duplicates by content hash.
//! The CLI pieces on top can move misplaced files and undo those moves.

pub mod category;
pub mod cli;
pub mod config;
pub mod dedup;
pub mod hasher;
pub mod logging;
pub mod models;
pub mod output;
pub mod relocate;
pub mod scanner;
pub mod undo;
pub mod validator;

pub use category::Category;
pub use config::{ConfigError, HashFailurePolicy, ReportFormat, ScanConfig};
pub use models::{FileRecord, MisplacedFile, ScanResult};
pub use relocate::{Move, MoveLog, RelocateError, Relocator};
pub use scanner::{ScanError, ScanOptions, Scanner};
pub use undo::{UndoManager, UndoReport};
pub use validator::{Validator, ValidatorSet};

pub use cli::{Cli, run_cli};
