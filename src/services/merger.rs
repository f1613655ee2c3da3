//! Merge engine: combines two bookmark trees under a named strategy.
//!
//! Merging never mutates its inputs; the output is a freshly built tree.
//! Every bookmark absent from the output is accounted for by a duplicate
//! match in the returned report.

use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::services::conflict_resolver::{self, ResolutionPolicy};
use crate::services::duplicate_matcher::{DuplicateMatcher, MatchOptions};
use crate::services::url_normalizer::normalize;
use crate::types::bookmark::{Bookmark, BookmarkFolder, BookmarkNode, BookmarkTree};
use crate::types::errors::SyncError;
use crate::types::report::{DuplicateMatch, MatchKind, MergeReport};

/// Which input tree wins duplicates under the priority strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceSide {
    First,
    Second,
}

/// Policy governing how duplicates are handled when combining two trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    /// Keep every bookmark from both trees; the second tree's copy of a
    /// duplicate is retained under a source-labeled title.
    KeepAll,
    /// For each duplicate pair keep only the newer `date_modified`.
    Timestamp,
    /// For each duplicate pair keep only the primary side's bookmark;
    /// entries unique to the other side are still included.
    SourcePriority(SourceSide),
    /// Merge same-named folders recursively, keep_all semantics for the
    /// bookmarks inside them.
    Smart,
}

impl FromStr for MergeStrategy {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keep_all" => Ok(MergeStrategy::KeepAll),
            "timestamp" => Ok(MergeStrategy::Timestamp),
            "first_priority" => Ok(MergeStrategy::SourcePriority(SourceSide::First)),
            "second_priority" => Ok(MergeStrategy::SourcePriority(SourceSide::Second)),
            "smart" => Ok(MergeStrategy::Smart),
            other => Err(SyncError::ConflictUnresolved(format!(
                "unknown merge strategy: {}",
                other
            ))),
        }
    }
}

/// Merges two bookmark trees into one, reporting every duplicate match
/// and conflict discovered along the way.
pub struct MergeEngine {
    strategy: MergeStrategy,
    options: MatchOptions,
}

impl MergeEngine {
    pub fn new(strategy: MergeStrategy, options: MatchOptions) -> Self {
        Self { strategy, options }
    }

    /// Merges `tree_a` and `tree_b` under the configured strategy.
    ///
    /// The merged root carries `tree_a`'s name and the elementwise max of
    /// both roots' date fields. Children are ordered as all of `tree_a`'s
    /// children, then `tree_b`'s children not already represented as
    /// duplicates.
    pub fn merge(
        &self,
        tree_a: &BookmarkTree,
        tree_b: &BookmarkTree,
        label_a: &str,
        label_b: &str,
    ) -> (BookmarkTree, MergeReport) {
        let flat_a = tree_a.all_bookmarks();
        let flat_b = tree_b.all_bookmarks();

        let matcher = DuplicateMatcher::new(self.options);
        let pairs = matcher.match_indexes(&flat_a, &flat_b);

        let mut report = MergeReport::default();
        for &(i, j, kind) in &pairs {
            report.duplicates.push(DuplicateMatch {
                bookmark_a: flat_a[i].clone(),
                bookmark_b: flat_b[j].clone(),
                kind,
            });
            // Fuzzy pairs have different normalized URLs, which the
            // conflict detector's contract excludes.
            if kind != MatchKind::Fuzzy {
                if let Some(conflict) =
                    conflict_resolver::detect_conflict(flat_a[i], flat_b[j], label_a, label_b)
                {
                    report.conflicts.push(conflict);
                }
            }
        }

        let mut merged = BookmarkFolder::new(
            &tree_a.name,
            tree_a.date_added.max(tree_b.date_added),
            tree_a.date_modified.max(tree_b.date_modified),
        );

        merged.children = match self.strategy {
            MergeStrategy::KeepAll => self.build_keep_all(tree_a, tree_b, &pairs, &flat_b, label_b),
            MergeStrategy::Timestamp => self.build_timestamp(tree_a, tree_b, &pairs, &flat_a, &flat_b),
            MergeStrategy::SourcePriority(side) => {
                self.build_priority(tree_a, tree_b, &pairs, side)
            }
            MergeStrategy::Smart => self.build_smart(tree_a, tree_b, &pairs, &flat_b, label_b),
        };

        (merged, report)
    }

    /// keep_all: tree_a verbatim, then tree_b with matched bookmarks
    /// retained under a source-labeled title. Nothing is dropped.
    fn build_keep_all(
        &self,
        tree_a: &BookmarkTree,
        tree_b: &BookmarkTree,
        pairs: &[(usize, usize, MatchKind)],
        flat_b: &[&Bookmark],
        label_b: &str,
    ) -> Vec<BookmarkNode> {
        let rename = duplicate_urls(pairs, flat_b);
        let mut children: Vec<BookmarkNode> = tree_a.children.clone();
        for child in &tree_b.children {
            let mut copy = child.clone();
            rename_duplicates(&mut copy, &rename, label_b);
            children.push(copy);
        }
        children
    }

    /// timestamp: duplicates collapse to the newer side in tree_a's
    /// position; tree_b keeps only its unmatched bookmarks.
    fn build_timestamp(
        &self,
        tree_a: &BookmarkTree,
        tree_b: &BookmarkTree,
        pairs: &[(usize, usize, MatchKind)],
        flat_a: &[&Bookmark],
        flat_b: &[&Bookmark],
    ) -> Vec<BookmarkNode> {
        let mut resolved: HashMap<usize, Bookmark> = HashMap::new();
        let mut drop_b: HashSet<usize> = HashSet::new();
        for &(i, j, _) in pairs {
            resolved.insert(
                i,
                conflict_resolver::resolve_pair(flat_a[i], flat_b[j], ResolutionPolicy::KeepNewer),
            );
            drop_b.insert(j);
        }

        let mut counter_a = 0;
        let mut children = rebuild_resolved(&tree_a.children, &mut counter_a, &resolved);
        let mut counter_b = 0;
        children.extend(rebuild_filtered(&tree_b.children, &mut counter_b, &drop_b));
        children
    }

    /// source_priority: the primary tree verbatim; the other tree with
    /// its side of every duplicate pair removed.
    fn build_priority(
        &self,
        tree_a: &BookmarkTree,
        tree_b: &BookmarkTree,
        pairs: &[(usize, usize, MatchKind)],
        side: SourceSide,
    ) -> Vec<BookmarkNode> {
        let mut drop: HashSet<usize> = HashSet::new();
        match side {
            SourceSide::First => {
                for &(_, j, _) in pairs {
                    drop.insert(j);
                }
                let mut children: Vec<BookmarkNode> = tree_a.children.clone();
                let mut counter = 0;
                children.extend(rebuild_filtered(&tree_b.children, &mut counter, &drop));
                children
            }
            SourceSide::Second => {
                for &(i, _, _) in pairs {
                    drop.insert(i);
                }
                let mut counter = 0;
                let mut children = rebuild_filtered(&tree_a.children, &mut counter, &drop);
                children.extend(tree_b.children.iter().cloned());
                children
            }
        }
    }

    /// smart: folders present in both trees under the same parent merge
    /// recursively with elementwise-max dates; unmatched folders carry
    /// over verbatim; bookmark duplicates follow keep_all semantics.
    fn build_smart(
        &self,
        tree_a: &BookmarkTree,
        tree_b: &BookmarkTree,
        pairs: &[(usize, usize, MatchKind)],
        flat_b: &[&Bookmark],
        label_b: &str,
    ) -> Vec<BookmarkNode> {
        let rename = duplicate_urls(pairs, flat_b);
        merge_children_smart(&tree_a.children, &tree_b.children, &rename, label_b)
    }
}

/// Normalized URLs of the second tree's side of every duplicate pair.
fn duplicate_urls(pairs: &[(usize, usize, MatchKind)], flat_b: &[&Bookmark]) -> HashSet<String> {
    pairs
        .iter()
        .map(|&(_, j, _)| normalize(&flat_b[j].url))
        .collect()
}

/// Appends the source label to the title of every bookmark in the subtree
/// whose normalized URL is in the duplicate set.
fn rename_duplicates(node: &mut BookmarkNode, duplicates: &HashSet<String>, label: &str) {
    match node {
        BookmarkNode::Bookmark(b) => {
            if duplicates.contains(&normalize(&b.url)) {
                b.title = format!("{} ({})", b.title, label);
            }
        }
        BookmarkNode::Folder(f) => {
            for child in &mut f.children {
                rename_duplicates(child, duplicates, label);
            }
        }
    }
}

/// Rebuilds a child list, substituting resolved winners for matched
/// bookmarks. `counter` tracks depth-first bookmark positions, matching
/// the order `all_bookmarks` flattens in.
fn rebuild_resolved(
    children: &[BookmarkNode],
    counter: &mut usize,
    resolved: &HashMap<usize, Bookmark>,
) -> Vec<BookmarkNode> {
    let mut out = Vec::with_capacity(children.len());
    for child in children {
        match child {
            BookmarkNode::Bookmark(b) => {
                let index = *counter;
                *counter += 1;
                match resolved.get(&index) {
                    Some(winner) => out.push(BookmarkNode::Bookmark(winner.clone())),
                    None => out.push(BookmarkNode::Bookmark(b.clone())),
                }
            }
            BookmarkNode::Folder(f) => {
                let kids = rebuild_resolved(&f.children, counter, resolved);
                let mut folder = BookmarkFolder::new(&f.name, f.date_added, f.date_modified);
                folder.children = kids;
                out.push(BookmarkNode::Folder(folder));
            }
        }
    }
    out
}

/// Rebuilds a child list with the bookmarks at the given depth-first
/// positions removed. A folder whose subtree held bookmarks but lost all
/// of them to filtering is dropped; folders that were empty to begin with
/// carry over.
fn rebuild_filtered(
    children: &[BookmarkNode],
    counter: &mut usize,
    drop: &HashSet<usize>,
) -> Vec<BookmarkNode> {
    let mut out = Vec::new();
    for child in children {
        match child {
            BookmarkNode::Bookmark(b) => {
                let index = *counter;
                *counter += 1;
                if !drop.contains(&index) {
                    out.push(BookmarkNode::Bookmark(b.clone()));
                }
            }
            BookmarkNode::Folder(f) => {
                let had_bookmarks = f.bookmark_count() > 0;
                let kids = rebuild_filtered(&f.children, counter, drop);
                if had_bookmarks && nodes_bookmark_count(&kids) == 0 {
                    continue;
                }
                let mut folder = BookmarkFolder::new(&f.name, f.date_added, f.date_modified);
                folder.children = kids;
                out.push(BookmarkNode::Folder(folder));
            }
        }
    }
    out
}

fn nodes_bookmark_count(nodes: &[BookmarkNode]) -> usize {
    nodes
        .iter()
        .map(|node| match node {
            BookmarkNode::Bookmark(_) => 1,
            BookmarkNode::Folder(f) => f.bookmark_count(),
        })
        .sum()
}

/// Structure-parallel merge for the smart strategy: for each folder of
/// the first list, the first same-named unconsumed folder of the second
/// list merges into it recursively; everything else carries over, with
/// second-side duplicates renamed.
fn merge_children_smart(
    a_children: &[BookmarkNode],
    b_children: &[BookmarkNode],
    duplicates: &HashSet<String>,
    label_b: &str,
) -> Vec<BookmarkNode> {
    let mut consumed = vec![false; b_children.len()];
    let mut out = Vec::new();

    for a_child in a_children {
        match a_child {
            BookmarkNode::Bookmark(b) => out.push(BookmarkNode::Bookmark(b.clone())),
            BookmarkNode::Folder(fa) => {
                let partner = b_children.iter().enumerate().find(|(j, node)| {
                    !consumed[*j]
                        && matches!(node, BookmarkNode::Folder(fb) if fb.name == fa.name)
                });
                match partner {
                    Some((j, BookmarkNode::Folder(fb))) => {
                        consumed[j] = true;
                        let mut folder = BookmarkFolder::new(
                            &fa.name,
                            fa.date_added.max(fb.date_added),
                            fa.date_modified.max(fb.date_modified),
                        );
                        folder.children =
                            merge_children_smart(&fa.children, &fb.children, duplicates, label_b);
                        out.push(BookmarkNode::Folder(folder));
                    }
                    _ => out.push(BookmarkNode::Folder(fa.clone())),
                }
            }
        }
    }

    for (j, b_child) in b_children.iter().enumerate() {
        if consumed[j] {
            continue;
        }
        let mut copy = b_child.clone();
        rename_duplicates(&mut copy, duplicates, label_b);
        out.push(copy);
    }

    out
}
