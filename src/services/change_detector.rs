//! Content hashing and change classification for incremental sync.
//!
//! A bookmark's hash covers its normalized URL, title, and
//! `date_modified`; changing any of the three changes the hash. Hash
//! maps are keyed by normalized URL so lookups agree with the matcher's
//! notion of identity.

use std::collections::{HashMap, HashSet};

use ring::digest;

use crate::services::url_normalizer::normalize;
use crate::types::bookmark::{Bookmark, BookmarkFolder, BookmarkNode, BookmarkTree};
use crate::types::report::ChangeSet;

/// Stable content hash for one bookmark (SHA-256, hex-encoded).
pub fn bookmark_hash(bookmark: &Bookmark) -> String {
    let content = format!(
        "{}|{}|{}",
        normalize(&bookmark.url),
        bookmark.title,
        bookmark.date_modified
    );
    let hash = digest::digest(&digest::SHA256, content.as_bytes());
    hex_encode(hash.as_ref())
}

/// Hashes every bookmark in the tree, keyed by normalized URL.
pub fn tree_hashes(tree: &BookmarkTree) -> HashMap<String, String> {
    tree.all_bookmarks()
        .into_iter()
        .map(|b| (normalize(&b.url), bookmark_hash(b)))
        .collect()
}

/// Classifies every entry of `current_tree` against a previous hash
/// snapshot.
///
/// A URL absent from the snapshot is new; present with a differing hash
/// is modified; present in the snapshot but absent from the tree is
/// deleted. Unchanged entries are not reported. Deleted URLs come back
/// sorted so repeated runs produce identical output.
pub fn detect_changes(
    current_tree: &BookmarkTree,
    previous_hashes: &HashMap<String, String>,
) -> ChangeSet {
    let mut changes = ChangeSet::default();
    let mut current_urls: HashSet<String> = HashSet::new();

    for bookmark in current_tree.all_bookmarks() {
        let url = normalize(&bookmark.url);
        let hash = bookmark_hash(bookmark);
        match previous_hashes.get(&url) {
            None => changes.new.push(bookmark.clone()),
            Some(previous) if *previous != hash => changes.modified.push(bookmark.clone()),
            Some(_) => {}
        }
        current_urls.insert(url);
    }

    changes.deleted = previous_hashes
        .keys()
        .filter(|url| !current_urls.contains(*url))
        .cloned()
        .collect();
    changes.deleted.sort();

    changes
}

/// Projects the new and modified entries of a change set back into tree
/// shape, pruning folders down to their changed descendants.
///
/// Purely for reporting: callers still write the full current tree,
/// because the storage adapters offer no partial-update primitive.
pub fn create_incremental_tree(current_tree: &BookmarkTree, changes: &ChangeSet) -> BookmarkTree {
    let changed_urls: HashSet<String> = changes
        .new
        .iter()
        .chain(changes.modified.iter())
        .map(|b| normalize(&b.url))
        .collect();

    let mut tree = BookmarkFolder::new(
        &current_tree.name,
        current_tree.date_added,
        current_tree.date_modified,
    );
    tree.children = project_changed(&current_tree.children, &changed_urls);
    tree
}

fn project_changed(children: &[BookmarkNode], changed: &HashSet<String>) -> Vec<BookmarkNode> {
    let mut out = Vec::new();
    for child in children {
        match child {
            BookmarkNode::Bookmark(b) => {
                if changed.contains(&normalize(&b.url)) {
                    out.push(BookmarkNode::Bookmark(b.clone()));
                }
            }
            BookmarkNode::Folder(f) => {
                let kids = project_changed(&f.children, changed);
                if !kids.is_empty() {
                    let mut folder = BookmarkFolder::new(&f.name, f.date_added, f.date_modified);
                    folder.children = kids;
                    out.push(BookmarkNode::Folder(folder));
                }
            }
        }
    }
    out
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
