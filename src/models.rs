//! Values produced by a scan.
//!
//! All of these are plain data: the scanner builds them, callers read them.

use crate::category::Category;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// A file accepted into its home category.
///
/// Ordering compares the path first, so ordered sets of records iterate
/// lexicographically by path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FileRecord {
    /// Canonical absolute path.
    pub path: PathBuf,
    /// The category the file was accepted into.
    pub category: Category,
    /// Size in bytes.
    pub size: u64,
    /// Lowercase hex SHA-256 of the content.
    pub content_hash: String,
}

/// A file that failed its home validator but passes another category's.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MisplacedFile {
    pub path: PathBuf,
    /// The category folder the file was found in.
    pub placed_in: Category,
    /// The category that would accept it.
    pub suggested: Category,
}

impl MisplacedFile {
    /// Destination directory for this file under `root`.
    pub fn suggested_dir(&self, root: &Path) -> PathBuf {
        root.join(self.suggested.dir_name())
    }
}

/// One ordered set of records per category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategorySets {
    pub conversations: BTreeSet<FileRecord>,
    pub documents: BTreeSet<FileRecord>,
    pub notes: BTreeSet<FileRecord>,
}

impl CategorySets {
    /// Returns the set belonging to `category`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sortdesk::category::Category;
    /// use sortdesk::models::CategorySets;
    ///
    /// let sets = CategorySets::default();
    /// assert!(sets.get(Category::Note).is_empty());
    /// ```
    pub fn get(&self, category: Category) -> &BTreeSet<FileRecord> {
        match category {
            Category::Conversation => &self.conversations,
            Category::Document => &self.documents,
            Category::Note => &self.notes,
        }
    }

    /// Mutable counterpart of [`CategorySets::get`].
    pub fn get_mut(&mut self, category: Category) -> &mut BTreeSet<FileRecord> {
        match category {
            Category::Conversation => &mut self.conversations,
            Category::Document => &mut self.documents,
            Category::Note => &mut self.notes,
        }
    }

    /// Inserts a record into the set of its own category.
    pub fn insert(&mut self, record: FileRecord) -> bool {
        self.get_mut(record.category).insert(record)
    }

    /// Total number of records across all three sets.
    pub fn len(&self) -> usize {
        self.conversations.len() + self.documents.len() + self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Everything one scan found, split into four outcome classes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    #[serde(flatten)]
    categorized: CategorySets,
    misplaced: Vec<MisplacedFile>,
    duplicates: Vec<PathBuf>,
    ignored: Vec<PathBuf>,
}

impl ScanResult {
    pub(crate) fn new(
        categorized: CategorySets,
        misplaced: Vec<MisplacedFile>,
        duplicates: Vec<PathBuf>,
        ignored: Vec<PathBuf>,
    ) -> Self {
        Self {
            categorized,
            misplaced,
            duplicates,
            ignored,
        }
    }

    pub fn conversations(&self) -> &BTreeSet<FileRecord> {
        &self.categorized.conversations
    }

    pub fn documents(&self) -> &BTreeSet<FileRecord> {
        &self.categorized.documents
    }

    pub fn notes(&self) -> &BTreeSet<FileRecord> {
        &self.categorized.notes
    }

    /// Surviving records for one category.
    pub fn records(&self, category: Category) -> &BTreeSet<FileRecord> {
        self.categorized.get(category)
    }

    /// Files that belong in another category, in scan order.
    pub fn misplaced(&self) -> &[MisplacedFile] {
        &self.misplaced
    }

    /// Duplicate paths in the order deduplication resolved them.
    pub fn duplicates(&self) -> &[PathBuf] {
        &self.duplicates
    }

    /// Files no validator accepted, plus unreadable files under the
    /// ignore policy.
    pub fn ignored(&self) -> &[PathBuf] {
        &self.ignored
    }

    /// Number of files that survived in some category.
    pub fn categorized_count(&self) -> usize {
        self.categorized.len()
    }

    /// True when nothing needs the user's attention.
    pub fn is_clean(&self) -> bool {
        self.misplaced.is_empty() && self.duplicates.is_empty() && self.ignored.is_empty()
    }
}
