//! Directory scanner and categorizer.
//!
//! The scanner walks the three category folders of an input directory, runs
//! each file through its home validator, works out a suggestion for files that
//! landed in the wrong folder, and hands everything that validated to the
//! deduplicator. The outcome is a single [`ScanResult`].
//!
//! # Examples
//!
//! ```no_run
//! use sortdesk::scanner::Scanner;
//!
//! let scanner = Scanner::new("/path/to/input")?;
//! let result = scanner.scan()?;
//! println!("{} notes", result.notes().len());
//! # Ok::<(), sortdesk::scanner::ScanError>(())
//! ```

use crate::category::Category;
use crate::config::{EntryFilter, HashFailurePolicy};
use crate::dedup::deduplicate;
use crate::hasher::hash_file;
use crate::models::{CategorySets, FileRecord, MisplacedFile, ScanResult};
use crate::validator::ValidatorSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors raised by the scanner.
///
/// Files that merely fail validation are never errors; they end up in the
/// misplaced or ignored lists of the result.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The input path is missing or is not a directory.
    #[error("Input path {reason}: {}", .path.display())]
    InvalidInput { path: PathBuf, reason: String },

    /// A validated file could not be read while hashing it.
    #[error("Failed to read {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Knobs that change how a scan treats edge cases.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub on_hash_error: HashFailurePolicy,
    pub filter: EntryFilter,
}

/// Scans one input directory.
#[derive(Debug)]
pub struct Scanner {
    root: PathBuf,
    validators: ValidatorSet,
    options: ScanOptions,
    hasher: fn(&Path) -> io::Result<String>,
}

impl Scanner {
    /// Creates a scanner with default options.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::InvalidInput`] if `input_dir` does not exist or
    /// is not a directory.
    pub fn new(input_dir: impl AsRef<Path>) -> Result<Self, ScanError> {
        Self::with_options(input_dir, ScanOptions::default())
    }

    /// Creates a scanner with explicit options.
    ///
    /// The path is canonicalized here so every reported path is absolute and
    /// independent of the caller's working directory.
    pub fn with_options(
        input_dir: impl AsRef<Path>,
        options: ScanOptions,
    ) -> Result<Self, ScanError> {
        let input_dir = input_dir.as_ref();
        let invalid = |reason: String| ScanError::InvalidInput {
            path: input_dir.to_path_buf(),
            reason,
        };

        let root = fs::canonicalize(input_dir).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => invalid("does not exist".to_string()),
            _ => invalid(format!("cannot be resolved ({e})")),
        })?;
        if !root.is_dir() {
            return Err(invalid("is not a directory".to_string()));
        }

        Ok(Self {
            root,
            validators: ValidatorSet::new(),
            options,
            hasher: hash_file,
        })
    }

    #[cfg(test)]
    fn with_hasher(mut self, hasher: fn(&Path) -> io::Result<String>) -> Self {
        self.hasher = hasher;
        self
    }

    /// The canonical input directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scans the input directory.
    ///
    /// Each call is independent; scanning an unchanged directory twice gives
    /// equal results.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Unreadable`] if a validated file cannot be hashed
    /// and the hash failure policy is [`HashFailurePolicy::Abort`].
    pub fn scan(&self) -> Result<ScanResult, ScanError> {
        let mut buffered = CategorySets::default();
        let mut misplaced = Vec::new();
        let mut ignored = Vec::new();

        for category in Category::ALL {
            let subdir = self.root.join(category.dir_name());
            if !subdir.is_dir() {
                debug!(dir = %subdir.display(), "category folder missing, skipping");
                continue;
            }

            for path in self.list_files(&subdir) {
                if self.validators.for_category(category).validate(&path) {
                    match self.build_record(&path, category) {
                        Ok(record) => {
                            debug!(path = %path.display(), %category, "accepted");
                            buffered.insert(record);
                        }
                        Err(e) if self.options.on_hash_error == HashFailurePolicy::Ignore => {
                            warn!("{e}; recording as ignored");
                            ignored.push(path);
                        }
                        Err(e) => return Err(e),
                    }
                } else if let Some(suggested) = self.validators.find_alternate(&path, category) {
                    debug!(path = %path.display(), placed_in = %category, %suggested, "misplaced");
                    misplaced.push(MisplacedFile {
                        path,
                        placed_in: category,
                        suggested,
                    });
                } else {
                    debug!(path = %path.display(), %category, "ignored");
                    ignored.push(path);
                }
            }
        }

        let (categorized, duplicates) = deduplicate(buffered);

        info!(
            root = %self.root.display(),
            categorized = categorized.len(),
            misplaced = misplaced.len(),
            duplicates = duplicates.len(),
            ignored = ignored.len(),
            "scan complete"
        );

        Ok(ScanResult::new(categorized, misplaced, duplicates, ignored))
    }

    /// Regular files directly inside `dir`, sorted by path.
    ///
    /// Subdirectories, dangling links and filtered entries are left out.
    fn list_files(&self, dir: &Path) -> Vec<PathBuf> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %dir.display(), "cannot list category folder: {e}");
                return Vec::new();
            }
        };

        let mut files: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && self.options.filter.allows(path))
            .collect();
        files.sort();
        files
    }

    fn build_record(&self, path: &Path, category: Category) -> Result<FileRecord, ScanError> {
        let unreadable = |source: io::Error| ScanError::Unreadable {
            path: path.to_path_buf(),
            source,
        };
        let size = fs::metadata(path).map_err(unreadable)?.len();
        let content_hash = (self.hasher)(path).map_err(unreadable)?;

        Ok(FileRecord {
            path: path.to_path_buf(),
            category,
            size,
            content_hash,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct Input {
        dir: TempDir,
    }

    impl Input {
        fn new(subdirs: &[&str]) -> Self {
            let dir = TempDir::new().expect("Failed to create temp directory");
            for name in subdirs {
                fs::create_dir(dir.path().join(name)).expect("Failed to create subdirectory");
            }
            Self { dir }
        }

        fn write(&self, rel: &str, content: impl AsRef<[u8]>) -> PathBuf {
            let path = self.dir.path().join(rel);
            fs::write(&path, content).expect("Failed to write file");
            fs::canonicalize(&path).expect("Failed to canonicalize")
        }

        fn scan(&self) -> ScanResult {
            Scanner::new(self.dir.path())
                .expect("Failed to create scanner")
                .scan()
                .expect("Scan failed")
        }
    }

    #[test]
    fn test_nonexistent_input_dir() {
        let input = Input::new(&[]);
        let err = Scanner::new(input.dir.path().join("nonexistent")).unwrap_err();
        assert!(matches!(err, ScanError::InvalidInput { .. }));
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_input_path_is_a_file() {
        let input = Input::new(&[]);
        let file = input.write("plain.md", "x");
        let err = Scanner::new(&file).unwrap_err();
        assert!(err.to_string().contains("is not a directory"));
    }

    #[test]
    fn test_root_is_canonical() {
        let input = Input::new(&["notes"]);
        let dotted = input.dir.path().join("notes").join("..");
        let scanner = Scanner::new(&dotted).unwrap();
        assert_eq!(scanner.root(), fs::canonicalize(input.dir.path()).unwrap());
    }

    #[test]
    fn test_empty_input_dir() {
        let input = Input::new(&[]);
        let result = input.scan();
        assert_eq!(result, ScanResult::default());
    }

    #[test]
    fn test_valid_files_land_in_home_category() {
        let input = Input::new(&["conversations", "notes", "documents"]);
        input.write("conversations/chat.md", "User: Hi\nAssistant: Hello");
        input.write("notes/idea.md", "Quick idea");
        let essay = format!("# Essay\n{}", "content ".repeat(500));
        input.write("documents/essay.md", essay);

        let result = input.scan();
        assert_eq!(result.conversations().len(), 1);
        assert_eq!(result.notes().len(), 1);
        assert_eq!(result.documents().len(), 1);
        assert!(result.is_clean());
    }

    #[test]
    fn test_record_fields() {
        let input = Input::new(&["notes"]);
        let path = input.write("notes/idea.txt", "abc");

        let result = input.scan();
        let record = result.notes().iter().next().unwrap();
        assert_eq!(record.path, path);
        assert_eq!(record.category, Category::Note);
        assert_eq!(record.size, 3);
        assert_eq!(record.content_hash, crate::hasher::hash_bytes(b"abc"));
    }

    #[test]
    fn test_oversized_note_is_misplaced() {
        let input = Input::new(&["notes"]);
        let path = input.write("notes/large.md", "x".repeat(3000));

        let result = input.scan();
        assert!(result.notes().is_empty());
        assert_eq!(result.misplaced().len(), 1);
        let misplaced = &result.misplaced()[0];
        assert_eq!(misplaced.path, path);
        assert_eq!(misplaced.placed_in, Category::Note);
        assert_eq!(misplaced.suggested, Category::Conversation);
    }

    #[test]
    fn test_pdf_is_ignored() {
        let input = Input::new(&["notes"]);
        let path = input.write("notes/diagram.pdf", b"fake pdf");

        let result = input.scan();
        assert!(result.notes().is_empty());
        assert!(result.misplaced().is_empty());
        assert_eq!(result.ignored(), &[path]);
    }

    #[test]
    fn test_nested_directories_are_not_scanned() {
        let input = Input::new(&["notes"]);
        fs::create_dir(input.dir.path().join("notes/archive")).unwrap();
        input.write("notes/archive/old.md", "old");

        let result = input.scan();
        assert_eq!(result, ScanResult::default());
    }

    #[test]
    fn test_dedup_priority() {
        let input = Input::new(&["conversations", "notes"]);
        input.write("conversations/conv.md", "Same content");
        let note = input.write("notes/note.md", "Same content");

        let result = input.scan();
        assert_eq!(result.conversations().len(), 1);
        assert!(result.notes().is_empty());
        assert_eq!(result.duplicates(), &[note]);
    }

    #[test]
    fn test_filters_skip_entries() {
        let input = Input::new(&["notes"]);
        input.write("notes/.hidden.md", "h");
        input.write("notes/draft.swp", "s");
        input.write("notes/kept.md", "k");

        let toml = "[filters]\nskip_hidden = true\nexclude = [\"*.swp\"]\n";
        let config = crate::config::ScanConfig::from_toml(toml).unwrap();
        let options = ScanOptions {
            on_hash_error: HashFailurePolicy::Abort,
            filter: config.compile_filters().unwrap(),
        };
        let result = Scanner::with_options(input.dir.path(), options)
            .unwrap()
            .scan()
            .unwrap();

        assert_eq!(result.notes().len(), 1);
        assert!(result.ignored().is_empty());
    }

    fn hash_all_but_locked(path: &Path) -> io::Result<String> {
        if path.ends_with("locked.md") {
            return Err(io::Error::from(io::ErrorKind::PermissionDenied));
        }
        hash_file(path)
    }

    fn scan_with_failing_hash(
        input: &Input,
        policy: HashFailurePolicy,
    ) -> Result<ScanResult, ScanError> {
        let options = ScanOptions {
            on_hash_error: policy,
            ..ScanOptions::default()
        };
        Scanner::with_options(input.dir.path(), options)
            .unwrap()
            .with_hasher(hash_all_but_locked)
            .scan()
    }

    #[test]
    fn test_hash_failure_aborts_by_default() {
        let input = Input::new(&["documents"]);
        let locked = input.write("documents/locked.md", "secret");
        input.write("documents/open.md", "public");

        let err = scan_with_failing_hash(&input, HashFailurePolicy::Abort).unwrap_err();
        match err {
            ScanError::Unreadable { path, source } => {
                assert_eq!(path, locked);
                assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
            }
            other => panic!("expected Unreadable, got {other:?}"),
        }
    }

    #[test]
    fn test_hash_failure_ignored_on_request() {
        let input = Input::new(&["documents"]);
        let locked = input.write("documents/locked.md", "secret");
        input.write("documents/open.md", "public");

        let result = scan_with_failing_hash(&input, HashFailurePolicy::Ignore).unwrap();
        assert_eq!(result.documents().len(), 1);
        assert!(result.misplaced().is_empty());
        assert_eq!(result.ignored(), std::slice::from_ref(&locked));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_file_aborts_scan() {
        use std::os::unix::fs::PermissionsExt;

        let input = Input::new(&["documents"]);
        let locked = input.write("documents/locked.md", "secret");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        if fs::File::open(&locked).is_ok() {
            eprintln!("skipping: this process can read mode 000 files");
            return;
        }

        let result = Scanner::new(input.dir.path()).unwrap().scan();
        assert!(matches!(result, Err(ScanError::Unreadable { .. })));

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
    }
}
