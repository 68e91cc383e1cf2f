//! Output formatting and styling module.
//!
//! All user-facing text goes through here: colored status lines, the scan
//! report and the progress bar used for bulk moves. Diagnostics go through
//! `tracing` instead.

use crate::category::Category;
use crate::models::{MisplacedFile, ScanResult};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Manages all CLI output with consistent styling and formatting.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red to stderr.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning in yellow with a warning sign.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an informational message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    pub fn plain(message: &str) {
        println!("{}", message);
    }

    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Prints a question without a trailing newline so the answer is typed
    /// on the same line.
    ///
    /// # Errors
    ///
    /// Returns the error from flushing stdout.
    pub fn prompt(question: &str) -> io::Result<()> {
        print!("{}", question.bold());
        io::stdout().flush()
    }

    /// Creates a progress bar for moving `total` files.
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░");
        pb.set_style(style);
        pb
    }

    /// Prints the full text report for a scan of `root`.
    ///
    /// Sections for misplaced, duplicate and ignored files only appear when
    /// they are non-empty. With `list_misplaced` off the misplaced section
    /// shows only its count.
    ///
    /// # Arguments
    ///
    /// * `result` - The scan to report on
    /// * `root` - Canonical input directory, used to shorten paths
    /// * `list_misplaced` - Whether to print one line per misplaced file
    pub fn scan_report(result: &ScanResult, root: &Path, list_misplaced: bool) {
        Self::info(&format!("Scanning {} ...", root.display()));
        Self::category_table(result);

        if !result.misplaced().is_empty() {
            Self::header(&format!("⚠ Misplaced files ({})", result.misplaced().len()));
            if list_misplaced {
                for misplaced in result.misplaced() {
                    Self::plain(&format!("  {}", misplaced_line(misplaced, root)));
                }
            }
        }

        if !result.duplicates().is_empty() {
            Self::header(&format!("⚠ Duplicates ({})", result.duplicates().len()));
            for path in result.duplicates() {
                Self::plain(&format!("  {}", relative_display(path, root)));
            }
        }

        if !result.ignored().is_empty() {
            Self::header(&format!("✗ Ignored ({})", result.ignored().len()));
            for path in result.ignored() {
                let line = relative_display(path, root);
                Self::plain(&format!("  {}", line.as_str().dimmed()));
            }
        }

        if result.is_clean() {
            println!();
            Self::success("Every file is in the right place.");
        }
    }

    /// Per-category file counts with a total row.
    pub fn category_table(result: &ScanResult) {
        Self::header("SUMMARY");

        let width = Category::ALL
            .iter()
            .map(|c| c.dir_name().len())
            .max()
            .unwrap_or(0)
            .max("Category".len());

        println!("{:<width$} | {}", "Category".bold(), "Files".bold());
        println!("{}", "-".repeat(width + 10));
        for category in Category::ALL {
            let count = result.records(category).len();
            println!(
                "{:<width$} | {} {}",
                category.dir_name(),
                count.to_string().green(),
                file_word(count)
            );
        }
        println!("{}", "-".repeat(width + 10));
        let total = result.categorized_count();
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total.to_string().green().bold(),
            file_word(total)
        );
    }
}

/// `path` relative to `root`, or the full path when it lies outside.
pub fn relative_display(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Size in KiB with one decimal, e.g. `2.9 KiB`.
pub fn format_size_kib(bytes: u64) -> String {
    format!("{:.1} KiB", bytes as f64 / 1024.0)
}

/// One report line for a misplaced file:
/// `notes/big.md (2.9 KiB) → suggested: documents/`.
pub fn misplaced_line(misplaced: &MisplacedFile, root: &Path) -> String {
    let size = fs::metadata(&misplaced.path)
        .map(|m| format_size_kib(m.len()))
        .unwrap_or_else(|_| "? KiB".to_string());
    format!(
        "{} ({}) → suggested: {}/",
        relative_display(&misplaced.path, root),
        size,
        misplaced.suggested.dir_name()
    )
}

fn file_word(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}
