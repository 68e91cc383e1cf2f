//! Category definitions for the three scanned folders.
//!
//! Every category owns exactly one subdirectory of the input directory. The
//! order in which categories are visited is never taken from the enum
//! declaration; callers use one of the explicit orderings below.
//!
//! # Examples
//!
//! ```
//! use sortdesk::category::Category;
//!
//! assert_eq!(Category::Note.dir_name(), "notes");
//! assert_eq!(Category::from_dir_name("conversations"), Some(Category::Conversation));
//! assert_eq!(Category::from_dir_name("extras"), None);
//! ```
use serde::{Deserialize, Serialize};
use std::fmt;

/// A classification bucket with its own validation rule and subdirectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Chat or meeting transcripts.
    #[serde(rename = "conversations")]
    Conversation,
    /// Long-form writing of any size.
    #[serde(rename = "documents")]
    Document,
    /// Short notes, at most 2 KiB.
    #[serde(rename = "notes")]
    Note,
}

impl Category {
    /// Enumeration order used when walking the input directory.
    pub const ALL: [Category; 3] = [Category::Conversation, Category::Note, Category::Document];

    /// Order in which alternate validators are probed for a file that failed
    /// its home validator. The home category is skipped.
    pub const PROBE_ORDER: [Category; 3] = Self::ALL;

    /// Survival precedence when identical content shows up in several
    /// categories. Earlier entries win.
    pub const DEDUP_PRIORITY: [Category; 3] =
        [Category::Conversation, Category::Document, Category::Note];

    /// Returns the subdirectory name for this category.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Conversation => "conversations",
            Category::Document => "documents",
            Category::Note => "notes",
        }
    }

    /// Resolves a subdirectory name back to its category.
    ///
    /// Matching is exact: `"Notes"` or `"note"` are not category folders.
    pub fn from_dir_name(name: &str) -> Option<Category> {
        Self::ALL
            .into_iter()
            .find(|category| category.dir_name() == name)
    }

    /// Returns a human-readable description of this category.
    pub fn description(&self) -> &'static str {
        match self {
            Category::Conversation => "Conversation transcripts",
            Category::Document => "Documents",
            Category::Note => "Short notes",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_dir_names() {
        assert_eq!(Category::Conversation.dir_name(), "conversations");
        assert_eq!(Category::Document.dir_name(), "documents");
        assert_eq!(Category::Note.dir_name(), "notes");
    }

    #[test]
    fn test_from_dir_name_round_trips_every_category() {
        for category in Category::ALL {
            assert_eq!(Category::from_dir_name(category.dir_name()), Some(category));
        }
    }

    #[test]
    fn test_from_dir_name_is_exact() {
        assert_eq!(Category::from_dir_name("Notes"), None);
        assert_eq!(Category::from_dir_name("note"), None);
        assert_eq!(Category::from_dir_name("extras"), None);
        assert_eq!(Category::from_dir_name(""), None);
    }

    #[test]
    fn test_dedup_priority_order() {
        assert_eq!(
            Category::DEDUP_PRIORITY,
            [Category::Conversation, Category::Document, Category::Note]
        );
    }

    #[test]
    fn test_orderings_cover_every_category_once() {
        for order in [Category::ALL, Category::PROBE_ORDER, Category::DEDUP_PRIORITY] {
            for category in [Category::Conversation, Category::Document, Category::Note] {
                assert_eq!(order.iter().filter(|c| **c == category).count(), 1);
            }
        }
    }

    #[test]
    fn test_display_uses_dir_name() {
        assert_eq!(Category::Document.to_string(), "documents");
    }

    #[test]
    fn test_serializes_as_dir_name() {
        let json = serde_json::to_string(&Category::Conversation).unwrap();
        assert_eq!(json, "\"conversations\"");
    }
}
