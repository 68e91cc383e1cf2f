//! Per-category file validation.
//!
//! Each category has one independent predicate. All of them share the same
//! structural base check (the file exists, is a regular file and carries an
//! allowed text extension); categories only add refinements on top of it.
//!
//! Validators never fail: anything that cannot be inspected is simply not
//! accepted.

use crate::category::Category;
use std::fs::{self, Metadata};
use std::path::Path;

/// Extensions accepted by every category, compared ASCII case-insensitively.
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["md", "markdown", "txt"];

/// Largest note accepted, in bytes. The boundary is inclusive.
pub const NOTE_MAX_SIZE: u64 = 2048;

/// Decides whether a single file belongs to a category.
pub trait Validator {
    /// The category this validator accepts files into.
    fn category(&self) -> Category;

    /// Returns `true` if the file at `path` belongs to this category.
    fn validate(&self, path: &Path) -> bool;
}

/// Applies the structural rules shared by every category.
///
/// Returns the file's metadata when the base rule holds, so refinements can
/// inspect the size without a second `stat`. Symlinks are followed: a link to
/// a regular file passes, a dangling link or a link to a directory does not.
pub fn base_metadata(path: &Path) -> Option<Metadata> {
    let metadata = fs::metadata(path).ok()?;
    if !metadata.is_file() || !has_allowed_extension(path) {
        return None;
    }
    Some(metadata)
}

/// Checks the file extension against [`ALLOWED_EXTENSIONS`].
pub fn has_allowed_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ALLOWED_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
}

/// Notes: base rule and a size ceiling.
#[derive(Debug, Clone, Copy)]
pub struct NoteValidator {
    max_size: u64,
}

impl NoteValidator {
    /// Creates a note validator with a custom size ceiling in bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// use sortdesk::validator::{NOTE_MAX_SIZE, NoteValidator};
    ///
    /// assert_eq!(NoteValidator::default().max_size(), NOTE_MAX_SIZE);
    /// assert_eq!(NoteValidator::new(512).max_size(), 512);
    /// ```
    pub fn new(max_size: u64) -> Self {
        Self { max_size }
    }

    pub fn max_size(&self) -> u64 {
        self.max_size
    }
}

impl Default for NoteValidator {
    fn default() -> Self {
        Self::new(NOTE_MAX_SIZE)
    }
}

impl Validator for NoteValidator {
    fn category(&self) -> Category {
        Category::Note
    }

    fn validate(&self, path: &Path) -> bool {
        base_metadata(path).is_some_and(|metadata| metadata.len() <= self.max_size)
    }
}

/// Documents: base rule only, any size.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentValidator;

impl Validator for DocumentValidator {
    fn category(&self) -> Category {
        Category::Document
    }

    fn validate(&self, path: &Path) -> bool {
        base_metadata(path).is_some()
    }
}

/// Conversations: base rule only, any size.
// TODO: detect speaker turns once content-aware classification lands.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConversationValidator;

impl Validator for ConversationValidator {
    fn category(&self) -> Category {
        Category::Conversation
    }

    fn validate(&self, path: &Path) -> bool {
        base_metadata(path).is_some()
    }
}

/// One validator per category.
#[derive(Debug, Clone, Default)]
pub struct ValidatorSet {
    conversation: ConversationValidator,
    document: DocumentValidator,
    note: NoteValidator,
}

impl ValidatorSet {
    /// The standard validators, notes capped at [`NOTE_MAX_SIZE`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the validator responsible for `category`.
    pub fn for_category(&self, category: Category) -> &dyn Validator {
        match category {
            Category::Conversation => &self.conversation,
            Category::Document => &self.document,
            Category::Note => &self.note,
        }
    }

    /// Probes every category except `home` in [`Category::PROBE_ORDER`] and
    /// returns the first one that accepts the file.
    pub fn find_alternate(&self, path: &Path, home: Category) -> Option<Category> {
        Category::PROBE_ORDER
            .into_iter()
            .filter(|category| *category != home)
            .find(|category| self.for_category(*category).validate(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_sized(dir: &TempDir, name: &str, size: usize) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, vec![b'x'; size]).expect("Failed to write test file");
        path
    }

    #[test]
    fn test_allowed_extensions_case_insensitive() {
        assert!(has_allowed_extension(Path::new("a.md")));
        assert!(has_allowed_extension(Path::new("a.MD")));
        assert!(has_allowed_extension(Path::new("a.Markdown")));
        assert!(has_allowed_extension(Path::new("a.TXT")));
        assert!(!has_allowed_extension(Path::new("a.pdf")));
        assert!(!has_allowed_extension(Path::new("a.md.bak")));
        assert!(!has_allowed_extension(Path::new("README")));
        assert!(!has_allowed_extension(Path::new(".md")));
    }

    #[test]
    fn test_note_size_boundary() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let at_limit = write_sized(&dir, "at_limit.md", 2048);
        let over_limit = write_sized(&dir, "over_limit.md", 2049);

        let validator = NoteValidator::default();
        assert!(validator.validate(&at_limit));
        assert!(!validator.validate(&over_limit));
    }

    #[test]
    fn test_note_accepts_empty_file() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let empty = write_sized(&dir, "empty.txt", 0);
        assert!(NoteValidator::default().validate(&empty));
    }

    #[test]
    fn test_document_and_conversation_have_no_size_ceiling() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let empty = write_sized(&dir, "empty.md", 0);
        let large = write_sized(&dir, "large.md", 1024 * 1024 + 1);

        for path in [&empty, &large] {
            assert!(DocumentValidator.validate(path));
            assert!(ConversationValidator.validate(path));
        }
    }

    #[test]
    fn test_rejects_wrong_extension() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let pdf = write_sized(&dir, "diagram.pdf", 10);

        let validators = ValidatorSet::new();
        for category in Category::ALL {
            assert!(!validators.for_category(category).validate(&pdf));
        }
    }

    #[test]
    fn test_rejects_missing_file() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let missing = dir.path().join("missing.md");

        let validators = ValidatorSet::new();
        for category in Category::ALL {
            assert!(!validators.for_category(category).validate(&missing));
        }
    }

    #[test]
    fn test_rejects_directory_with_allowed_extension() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let sub = dir.path().join("folder.md");
        fs::create_dir(&sub).expect("Failed to create subdirectory");

        assert!(!DocumentValidator.validate(&sub));
        assert!(!NoteValidator::default().validate(&sub));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_handling() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let target = write_sized(&dir, "target.md", 5);
        let link = dir.path().join("link.md");
        std::os::unix::fs::symlink(&target, &link).expect("Failed to create symlink");
        let dangling = dir.path().join("dangling.md");
        std::os::unix::fs::symlink(dir.path().join("gone.md"), &dangling)
            .expect("Failed to create symlink");

        assert!(DocumentValidator.validate(&link));
        assert!(!DocumentValidator.validate(&dangling));
    }

    #[test]
    fn test_validator_categories() {
        let validators = ValidatorSet::new();
        for category in Category::ALL {
            assert_eq!(validators.for_category(category).category(), category);
        }
    }

    #[test]
    fn test_find_alternate_skips_home_and_follows_probe_order() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let big = write_sized(&dir, "big.md", 3000);
        let small = write_sized(&dir, "small.md", 10);

        let validators = ValidatorSet::new();
        assert_eq!(
            validators.find_alternate(&big, Category::Note),
            Some(Category::Conversation)
        );
        assert_eq!(
            validators.find_alternate(&small, Category::Conversation),
            Some(Category::Note)
        );
        assert_eq!(
            validators.find_alternate(&big, Category::Conversation),
            Some(Category::Document)
        );
    }

    #[test]
    fn test_find_alternate_none_for_rejected_file() {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let pdf = write_sized(&dir, "x.pdf", 3);
        let validators = ValidatorSet::new();
        assert_eq!(validators.find_alternate(&pdf, Category::Note), None);
    }
}
