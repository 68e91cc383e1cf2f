//! Cross-category deduplication by content hash.

use crate::category::Category;
use crate::models::CategorySets;
use std::collections::HashSet;
use std::path::PathBuf;

/// Keeps at most one record per content hash across all categories.
///
/// Categories are visited in [`Category::DEDUP_PRIORITY`] order and records
/// within a category in path order. The first record seen for a hash
/// survives; every later one is dropped and its path appended to the
/// returned duplicates list, in visiting order.
///
/// Needs the complete buffered view of all three categories: resolving
/// collisions while records are still arriving would break the priority.
pub fn deduplicate(mut buffered: CategorySets) -> (CategorySets, Vec<PathBuf>) {
    let mut seen: HashSet<String> = HashSet::new();
    let mut kept = CategorySets::default();
    let mut duplicates = Vec::new();

    for category in Category::DEDUP_PRIORITY {
        for record in std::mem::take(buffered.get_mut(category)) {
            if seen.contains(&record.content_hash) {
                tracing::debug!(
                    path = %record.path.display(),
                    category = %category,
                    "duplicate content"
                );
                duplicates.push(record.path);
            } else {
                seen.insert(record.content_hash.clone());
                kept.insert(record);
            }
        }
    }

    (kept, duplicates)
}
