//! Command-line interface module for sortdesk.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing
//! - Running a scan and printing its report
//! - Asking the user which misplaced files to move
//! - Undo of previous moves

use crate::config::{ConfigError, ReportFormat, ScanConfig};
use crate::models::{MisplacedFile, ScanResult};
use crate::output::{OutputFormatter, misplaced_line, relative_display};
use crate::relocate::{Move, MoveLog, RelocateError, Relocator};
use crate::scanner::{ScanError, ScanOptions, Scanner};
use crate::undo::UndoManager;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Parser)]
#[command(
    name = "sortdesk",
    version,
    about = "Check conversations/, notes/ and documents/ for misplaced and duplicate files"
)]
pub struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to a configuration file.
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scan an input directory and report how its files are categorized.
    Extract(ExtractArgs),
    /// Revert the moves made by the last extract run.
    Undo {
        /// Directory the moves were made in.
        input_dir: PathBuf,
    },
}

#[derive(Debug, Clone, Args)]
pub struct ExtractArgs {
    /// Directory containing conversations/, notes/ and documents/.
    pub input_dir: PathBuf,

    /// Report format; defaults to the configured one.
    #[arg(long, value_enum)]
    pub format: Option<ReportFormat>,

    /// Move every misplaced file without asking.
    #[arg(long, conflicts_with = "skip_moves")]
    pub move_all: bool,

    /// Never move anything.
    #[arg(long)]
    pub skip_moves: bool,

    /// Show which files would be moved without touching them.
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Relocate(#[from] RelocateError),

    #[error("Failed to read answer: {0}")]
    Io(#[from] io::Error),
}

/// How misplaced files get picked for moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveMode {
    Prompt,
    All,
    Skip,
}

impl MoveMode {
    /// Picks the mode for one extract run. JSON output never moves files.
    pub fn for_run(args: &ExtractArgs, format: ReportFormat) -> Self {
        if format == ReportFormat::Json || args.skip_moves {
            MoveMode::Skip
        } else if args.move_all {
            MoveMode::All
        } else {
            MoveMode::Prompt
        }
    }

    /// Whether the text report lists misplaced files itself. When prompting,
    /// each file is shown once, next to its question.
    pub fn report_lists_misplaced(self, dry_run: bool) -> bool {
        self != MoveMode::Prompt || dry_run
    }
}

/// A reply to `Move? [y/n/a(ll)/s(kip all)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptAnswer {
    Yes,
    No,
    All,
    SkipAll,
}

impl PromptAnswer {
    /// Anything unrecognised counts as "no".
    pub fn parse(input: &str) -> Self {
        match input.trim().to_lowercase().as_str() {
            "y" | "yes" => PromptAnswer::Yes,
            "a" | "all" => PromptAnswer::All,
            "s" | "skip" => PromptAnswer::SkipAll,
            _ => PromptAnswer::No,
        }
    }
}

/// What an extract run did.
#[derive(Debug)]
pub struct ExtractOutcome {
    pub root: PathBuf,
    pub result: ScanResult,
    pub moves: Vec<Move>,
    pub failed_moves: usize,
}

/// Runs the CLI, reading prompt answers from stdin.
pub fn run_cli(cli: Cli) -> Result<(), CliError> {
    let stdin = io::stdin();
    run_cli_with_input(cli, &mut stdin.lock())
}

/// Runs the CLI, reading prompt answers from `input`.
pub fn run_cli_with_input<R: BufRead>(cli: Cli, input: &mut R) -> Result<(), CliError> {
    match cli.command {
        Command::Extract(args) => extract(&args, cli.config.as_deref(), input).map(|_| ()),
        Command::Undo { input_dir } => undo(&input_dir),
    }
}

/// Scans `args.input_dir`, prints the report and resolves misplaced files.
///
/// # Errors
///
/// Fails on bad configuration, an invalid input directory, an aborted scan,
/// or a history file that cannot be written.
pub fn extract<R: BufRead>(
    args: &ExtractArgs,
    config_path: Option<&Path>,
    input: &mut R,
) -> Result<ExtractOutcome, CliError> {
    let config = ScanConfig::load(config_path)?;
    let options = ScanOptions {
        on_hash_error: config.scan.on_hash_error,
        filter: config.compile_filters()?,
    };
    let format = args.format.unwrap_or(config.report.format);

    let scanner = Scanner::with_options(&args.input_dir, options)?;
    let root = scanner.root().to_path_buf();
    let result = scanner.scan()?;

    let mode = MoveMode::for_run(args, format);

    match format {
        ReportFormat::Text => {
            let list_misplaced = mode.report_lists_misplaced(args.dry_run);
            OutputFormatter::scan_report(&result, &root, list_misplaced);
        }
        ReportFormat::Json => {
            let json = serde_json::to_string_pretty(&result).map_err(io::Error::other)?;
            OutputFormatter::plain(&json);
        }
    }

    let mut outcome = ExtractOutcome {
        root,
        result,
        moves: Vec::new(),
        failed_moves: 0,
    };

    if outcome.result.misplaced().is_empty() || mode == MoveMode::Skip {
        return Ok(outcome);
    }

    if args.dry_run {
        OutputFormatter::header("Planned moves");
        for misplaced in outcome.result.misplaced() {
            OutputFormatter::dry_run_notice(&format!(
                "{} → {}/",
                relative_display(&misplaced.path, &outcome.root),
                misplaced.suggested.dir_name()
            ));
        }
        return Ok(outcome);
    }

    let selected = select_moves(outcome.result.misplaced(), &outcome.root, mode, input)?;
    let (moves, failed) = apply_moves(&outcome.root, &selected);
    outcome.moves = moves;
    outcome.failed_moves = failed;

    if !outcome.moves.is_empty() {
        let mut log = MoveLog::new(outcome.root.clone());
        for entry in &outcome.moves {
            log.record(entry.clone());
        }
        log.save(&outcome.root)?;
        OutputFormatter::info(&format!(
            "History saved. Use 'sortdesk undo {}' to revert the moves.",
            outcome.root.display()
        ));
    }

    if failed > 0 {
        OutputFormatter::warning("Some files could not be moved. Please review errors above.");
    }

    Ok(outcome)
}

/// Picks the misplaced files to move.
///
/// In prompt mode every file is shown with its suggestion and one line of
/// `input` is read per file. End of input stops prompting.
pub fn select_moves<'a, R: BufRead>(
    misplaced: &'a [MisplacedFile],
    root: &Path,
    mode: MoveMode,
    input: &mut R,
) -> io::Result<Vec<&'a MisplacedFile>> {
    match mode {
        MoveMode::Skip => return Ok(Vec::new()),
        MoveMode::All => return Ok(misplaced.iter().collect()),
        MoveMode::Prompt => {}
    }

    let mut selected = Vec::new();
    for (index, file) in misplaced.iter().enumerate() {
        OutputFormatter::plain(&format!("\n  {}", misplaced_line(file, root)));
        OutputFormatter::prompt("  Move? [y/n/a(ll)/s(kip all)]: ")?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            OutputFormatter::plain("");
            break;
        }

        match PromptAnswer::parse(&line) {
            PromptAnswer::Yes => selected.push(file),
            PromptAnswer::No => {}
            PromptAnswer::All => {
                selected.extend(&misplaced[index..]);
                break;
            }
            PromptAnswer::SkipAll => {
                OutputFormatter::plain("  Skipping all.");
                break;
            }
        }
    }

    Ok(selected)
}

/// Moves the selected files, returning the completed moves and the number of
/// failures. A failed move does not stop the others.
fn apply_moves(root: &Path, selected: &[&MisplacedFile]) -> (Vec<Move>, usize) {
    let pb = OutputFormatter::create_progress_bar(selected.len() as u64);
    let mut moves = Vec::new();
    let mut failed = 0;

    for misplaced in selected {
        match Relocator::move_misplaced(root, misplaced) {
            Ok(entry) => {
                pb.println(format!(
                    "  ✓ Moved to {}",
                    relative_display(&entry.new_path, root)
                ));
                moves.push(entry);
            }
            Err(e) => {
                pb.suspend(|| OutputFormatter::error(&e.to_string()));
                failed += 1;
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    (moves, failed)
}

fn undo(input_dir: &Path) -> Result<(), CliError> {
    OutputFormatter::info("Undoing previous moves...");

    let report = UndoManager::undo(input_dir)?;
    OutputFormatter::success(&format!("Restored: {}", report.restored_files));

    if !report.skipped_files.is_empty() {
        OutputFormatter::warning(&format!("Skipped: {}", report.skipped_files.len()));
        for (path, reason) in &report.skipped_files {
            OutputFormatter::plain(&format!("    - {}: {}", path.display(), reason));
        }
    }

    if !report.failed_restores.is_empty() {
        OutputFormatter::error(&format!("Failed: {}", report.failed_restores.len()));
        for (path, reason) in &report.failed_restores {
            OutputFormatter::error(&format!("    - {}: {}", path.display(), reason));
        }
        OutputFormatter::warning("History file was NOT deleted due to failures.");
    }

    Ok(())
}
