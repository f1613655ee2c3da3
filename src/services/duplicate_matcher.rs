//! Duplicate detection across two bookmark trees.
//!
//! Flattens both trees to bookmark lists and pairs entries at three
//! precision levels: exact (normalized URLs identical), name+URL (an
//! exact match whose titles are also identical, reported at finer
//! granularity), and fuzzy (URLs differing only in scheme, leading
//! "www.", or query string). Folders are not matched here; folder-aware
//! merging lives in the merge engine.

use std::collections::HashMap;

use crate::services::url_normalizer::{normalize, urls_are_similar};
use crate::types::bookmark::{Bookmark, BookmarkTree};
use crate::types::report::{DuplicateMatch, MatchKind};

/// Toggles for the optional matching levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    pub fuzzy: bool,
    pub name_matching: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            fuzzy: true,
            name_matching: true,
        }
    }
}

/// Finds duplicate bookmark pairs between two trees.
pub struct DuplicateMatcher {
    options: MatchOptions,
}

impl DuplicateMatcher {
    pub fn new(options: MatchOptions) -> Self {
        Self { options }
    }

    /// Pairs bookmarks from `tree_a` and `tree_b` that represent the same
    /// logical bookmark.
    ///
    /// Each bookmark participates in at most one match. Pairing is
    /// deterministic: bookmarks of the second tree are visited in
    /// flattened traversal order, and each takes the first still-unmatched
    /// candidate from the first tree's traversal order. Fuzzy matching
    /// only runs over entries the exact pass left unmatched.
    pub fn find_matches(&self, tree_a: &BookmarkTree, tree_b: &BookmarkTree) -> Vec<DuplicateMatch> {
        let flat_a = tree_a.all_bookmarks();
        let flat_b = tree_b.all_bookmarks();
        self.match_indexes(&flat_a, &flat_b)
            .into_iter()
            .map(|(i, j, kind)| DuplicateMatch {
                bookmark_a: flat_a[i].clone(),
                bookmark_b: flat_b[j].clone(),
                kind,
            })
            .collect()
    }

    /// Index-level matching over pre-flattened bookmark lists. Indexes
    /// refer to the depth-first traversal order `all_bookmarks` produces,
    /// which is what the merge engine walks when rebuilding trees.
    pub(crate) fn match_indexes(
        &self,
        flat_a: &[&Bookmark],
        flat_b: &[&Bookmark],
    ) -> Vec<(usize, usize, MatchKind)> {
        // Normalized URL -> indexes into flat_a, in traversal order.
        let mut url_index: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, bookmark) in flat_a.iter().enumerate() {
            url_index.entry(normalize(&bookmark.url)).or_default().push(i);
        }

        let mut used_a = vec![false; flat_a.len()];
        let mut matched_b = vec![false; flat_b.len()];
        let mut matches = Vec::new();

        // Exact pass.
        for (j, b) in flat_b.iter().enumerate() {
            let norm = normalize(&b.url);
            let candidate = url_index
                .get(&norm)
                .and_then(|indexes| indexes.iter().copied().find(|&i| !used_a[i]));
            if let Some(i) = candidate {
                used_a[i] = true;
                matched_b[j] = true;
                let kind = if self.options.name_matching && flat_a[i].title == b.title {
                    MatchKind::NameUrl
                } else {
                    MatchKind::Exact
                };
                matches.push((i, j, kind));
            }
        }

        // Fuzzy pass over what exact matching left behind.
        if self.options.fuzzy {
            for (j, b) in flat_b.iter().enumerate() {
                if matched_b[j] {
                    continue;
                }
                let candidate = flat_a
                    .iter()
                    .enumerate()
                    .find(|(i, a)| !used_a[*i] && urls_are_similar(&a.url, &b.url));
                if let Some((i, _)) = candidate {
                    used_a[i] = true;
                    matched_b[j] = true;
                    matches.push((i, j, MatchKind::Fuzzy));
                }
            }
        }

        matches
    }
}
