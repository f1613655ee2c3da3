use serde::{Deserialize, Serialize};

use crate::types::bookmark::Bookmark;

/// Precision level at which two bookmarks were judged to be duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchKind {
    /// Normalized URLs are identical.
    Exact,
    /// Normalized URLs and titles are identical.
    NameUrl,
    /// URLs differ only in scheme, leading "www.", or query string.
    Fuzzy,
}

/// A pair of bookmarks from two trees judged to be the same logical bookmark.
///
/// Produced transiently during a merge pass; not persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateMatch {
    pub bookmark_a: Bookmark,
    pub bookmark_b: Bookmark,
    pub kind: MatchKind,
}

/// Aspect in which two matched bookmarks disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConflictKind {
    /// Titles differ.
    Title,
    /// `date_modified` differs.
    Date,
    /// Favicon or tags differ.
    Metadata,
}

/// A duplicate match whose non-URL metadata disagrees.
///
/// `kind` is the highest-priority differing aspect (title > date >
/// metadata); `aspects` lists every aspect that differs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookmarkConflict {
    pub url: String,
    pub bookmark_a: Bookmark,
    pub bookmark_b: Bookmark,
    pub source_a: String,
    pub source_b: String,
    pub kind: ConflictKind,
    pub aspects: Vec<ConflictKind>,
}

/// Everything a merge pass discovered: duplicate pairs and conflicts.
///
/// Every bookmark omitted from a merge output is accounted for by an
/// entry in `duplicates`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergeReport {
    pub duplicates: Vec<DuplicateMatch>,
    pub conflicts: Vec<BookmarkConflict>,
}

impl MergeReport {
    /// True when the pass found neither duplicates nor conflicts.
    pub fn is_empty(&self) -> bool {
        self.duplicates.is_empty() && self.conflicts.is_empty()
    }
}

/// Classified differences between a current tree and a stored hash snapshot.
///
/// Unchanged entries are not reported. `deleted` holds normalized URLs
/// because the bookmarks themselves are no longer present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChangeSet {
    pub new: Vec<Bookmark>,
    pub modified: Vec<Bookmark>,
    pub deleted: Vec<String>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.new.is_empty() && self.modified.is_empty() && self.deleted.is_empty()
    }
}

/// Structured result of one sync run, returned to the caller for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncOutcome {
    /// Bookmarks written to the target(s); 0 when the run was a no-op.
    pub bookmarks_written: usize,
    /// True when an incremental run found nothing to write.
    pub skipped: bool,
    /// True when an incremental run fell back to full semantics.
    pub seeded_metadata: bool,
    /// Merge findings, present in merge mode.
    pub merge_report: Option<MergeReport>,
    /// Change classification, present in incremental mode.
    pub changes: Option<ChangeSet>,
}
