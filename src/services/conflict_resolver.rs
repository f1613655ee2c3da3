//! Conflict detection and resolution for matched bookmark pairs.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::bookmark::Bookmark;
use crate::types::errors::SyncError;
use crate::types::report::{BookmarkConflict, ConflictKind};

/// Policy governing which side of a conflict wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionPolicy {
    KeepFirst,
    KeepSecond,
    /// Compares `date_modified`; ties keep the first.
    KeepNewer,
    /// Field-by-field merge: title and favicon favor the first, dates
    /// widen to the extremes, tags union in first-then-second order.
    MergeMetadata,
}

impl FromStr for ResolutionPolicy {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keep_first" => Ok(ResolutionPolicy::KeepFirst),
            "keep_second" => Ok(ResolutionPolicy::KeepSecond),
            "keep_newer" => Ok(ResolutionPolicy::KeepNewer),
            "merge_metadata" => Ok(ResolutionPolicy::MergeMetadata),
            other => Err(SyncError::ConflictUnresolved(format!(
                "unknown resolution policy: {}",
                other
            ))),
        }
    }
}

/// Compares two bookmarks that the matcher already paired by URL.
///
/// Precondition: the two bookmarks' normalized URLs are equal. Returns a
/// conflict when any tracked field disagrees; `kind` is the
/// highest-priority differing aspect (title > date > metadata) and
/// `aspects` records every one. Returns `None` when the bookmarks agree
/// in every tracked field.
pub fn detect_conflict(
    bookmark_a: &Bookmark,
    bookmark_b: &Bookmark,
    source_a: &str,
    source_b: &str,
) -> Option<BookmarkConflict> {
    let mut aspects = Vec::new();

    if bookmark_a.title != bookmark_b.title {
        aspects.push(ConflictKind::Title);
    }
    if bookmark_a.date_modified != bookmark_b.date_modified {
        aspects.push(ConflictKind::Date);
    }
    if bookmark_a.favicon != bookmark_b.favicon || bookmark_a.tags != bookmark_b.tags {
        aspects.push(ConflictKind::Metadata);
    }

    if aspects.is_empty() {
        return None;
    }

    Some(BookmarkConflict {
        url: bookmark_a.url.clone(),
        bookmark_a: bookmark_a.clone(),
        bookmark_b: bookmark_b.clone(),
        source_a: source_a.to_string(),
        source_b: source_b.to_string(),
        kind: aspects[0],
        aspects,
    })
}

/// Produces the winning bookmark for a recorded conflict. Pure: inputs
/// are never mutated.
pub fn resolve(conflict: &BookmarkConflict, policy: ResolutionPolicy) -> Bookmark {
    resolve_pair(&conflict.bookmark_a, &conflict.bookmark_b, policy)
}

/// Applies a resolution policy directly to a matched pair.
pub fn resolve_pair(
    bookmark_a: &Bookmark,
    bookmark_b: &Bookmark,
    policy: ResolutionPolicy,
) -> Bookmark {
    match policy {
        ResolutionPolicy::KeepFirst => bookmark_a.clone(),
        ResolutionPolicy::KeepSecond => bookmark_b.clone(),
        ResolutionPolicy::KeepNewer => {
            if bookmark_b.date_modified > bookmark_a.date_modified {
                bookmark_b.clone()
            } else {
                bookmark_a.clone()
            }
        }
        ResolutionPolicy::MergeMetadata => {
            let mut tags = bookmark_a.tags.clone();
            for tag in &bookmark_b.tags {
                if !tags.contains(tag) {
                    tags.push(tag.clone());
                }
            }
            Bookmark {
                title: bookmark_a.title.clone(),
                url: bookmark_a.url.clone(),
                date_added: bookmark_a.date_added.min(bookmark_b.date_added),
                date_modified: bookmark_a.date_modified.max(bookmark_b.date_modified),
                favicon: bookmark_a
                    .favicon
                    .clone()
                    .or_else(|| bookmark_b.favicon.clone()),
                tags,
            }
        }
    }
}
