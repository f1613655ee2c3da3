//! Unit tests for content hashing and change classification.

use std::collections::HashMap;

use marksync::services::change_detector::{
    bookmark_hash, create_incremental_tree, detect_changes, tree_hashes,
};
use marksync::types::bookmark::{Bookmark, BookmarkFolder, BookmarkNode, BookmarkTree};

fn bm(title: &str, url: &str, modified: i64) -> Bookmark {
    Bookmark::new(title, url, 1_700_000_000, modified)
}

fn tree_of(bookmarks: Vec<Bookmark>) -> BookmarkTree {
    let mut root = BookmarkFolder::new("Bookmarks", 0, 0);
    for b in bookmarks {
        root.add_child(BookmarkNode::Bookmark(b));
    }
    root
}

/// The hash covers normalized URL, title, and date_modified; each
/// component changes it, and URL variants that normalize alike do not.
#[test]
fn test_hash_sensitivity() {
    let base = bm("Docs", "https://docs.example.com/", 1_700_000_000);

    let mut retitled = base.clone();
    retitled.title = "Documentation".to_string();
    assert_ne!(bookmark_hash(&base), bookmark_hash(&retitled));

    let mut touched = base.clone();
    touched.date_modified += 1;
    assert_ne!(bookmark_hash(&base), bookmark_hash(&touched));

    let mut other_url = base.clone();
    other_url.url = "https://other.example.com/".to_string();
    assert_ne!(bookmark_hash(&base), bookmark_hash(&other_url));

    // Case and trailing slash normalize away.
    let mut variant = base.clone();
    variant.url = "HTTPS://DOCS.EXAMPLE.COM".to_string();
    assert_eq!(bookmark_hash(&base), bookmark_hash(&variant));
}

/// date_added and favicon are not part of the hash.
#[test]
fn test_hash_ignores_untracked_fields() {
    let base = bm("Docs", "https://docs.example.com/", 1_700_000_000);
    let mut other = base.clone();
    other.date_added += 999;
    other.favicon = Some("aWNvbg==".to_string());

    assert_eq!(bookmark_hash(&base), bookmark_hash(&other));
}

/// tree_hashes keys by normalized URL and covers nested bookmarks.
#[test]
fn test_tree_hashes_keys() {
    let mut folder = BookmarkFolder::new("Work", 0, 0);
    folder.add_child(BookmarkNode::Bookmark(bm(
        "Nested",
        "https://Nested.example.com/x/",
        1_700_000_000,
    )));
    let mut tree = tree_of(vec![bm("Top", "https://top.example.com/", 1_700_000_000)]);
    tree.add_child(BookmarkNode::Folder(folder));

    let hashes = tree_hashes(&tree);
    assert_eq!(hashes.len(), 2);
    assert!(hashes.contains_key("https://top.example.com"));
    assert!(hashes.contains_key("https://nested.example.com/x"));
}

/// Against an empty snapshot, everything is new.
#[test]
fn test_detect_all_new_on_empty_snapshot() {
    let tree = tree_of(vec![
        bm("A", "https://a.example.com/", 1_700_000_000),
        bm("B", "https://b.example.com/", 1_700_000_000),
    ]);

    let changes = detect_changes(&tree, &HashMap::new());
    assert_eq!(changes.new.len(), 2);
    assert!(changes.modified.is_empty());
    assert!(changes.deleted.is_empty());
}

/// A snapshot of the tree itself yields an empty change set.
#[test]
fn test_detect_no_changes_against_own_snapshot() {
    let tree = tree_of(vec![bm("A", "https://a.example.com/", 1_700_000_000)]);
    let snapshot = tree_hashes(&tree);

    let changes = detect_changes(&tree, &snapshot);
    assert!(changes.is_empty());
}

/// New, modified, and deleted entries are classified in one pass: a
/// snapshot of {a, b} against a tree holding {a retitled, new-b} reports
/// one of each.
#[test]
fn test_detect_mixed_changes() {
    let before = tree_of(vec![
        bm("A", "https://a.example.com/", 1_700_000_000),
        bm("B", "https://b.example.com/", 1_700_000_000),
    ]);
    let snapshot = tree_hashes(&before);

    let after = tree_of(vec![
        bm("A retitled", "https://a.example.com/", 1_700_100_000),
        bm("New", "https://new-b.example.com/", 1_700_100_000),
    ]);

    let changes = detect_changes(&after, &snapshot);
    assert_eq!(changes.new.len(), 1);
    assert_eq!(changes.new[0].url, "https://new-b.example.com/");
    assert_eq!(changes.modified.len(), 1);
    assert_eq!(changes.modified[0].title, "A retitled");
    assert_eq!(changes.deleted, vec!["https://b.example.com".to_string()]);
}

/// Deleted URLs come back sorted for stable output.
#[test]
fn test_deleted_urls_sorted() {
    let before = tree_of(vec![
        bm("Z", "https://z.example.com/", 1_700_000_000),
        bm("A", "https://a.example.com/", 1_700_000_000),
        bm("M", "https://m.example.com/", 1_700_000_000),
    ]);
    let snapshot = tree_hashes(&before);

    let changes = detect_changes(&tree_of(vec![]), &snapshot);
    assert_eq!(
        changes.deleted,
        vec![
            "https://a.example.com".to_string(),
            "https://m.example.com".to_string(),
            "https://z.example.com".to_string(),
        ]
    );
}

/// The incremental tree keeps structure but prunes folders down to
/// their changed descendants; untouched folders disappear.
#[test]
fn test_incremental_tree_prunes_unchanged() {
    let mut changed_folder = BookmarkFolder::new("Work", 10, 20);
    changed_folder.add_child(BookmarkNode::Bookmark(bm(
        "Changed",
        "https://changed.example.com/",
        1_700_100_000,
    )));
    changed_folder.add_child(BookmarkNode::Bookmark(bm(
        "Stable",
        "https://stable.example.com/",
        1_700_000_000,
    )));

    let mut untouched_folder = BookmarkFolder::new("Archive", 0, 0);
    untouched_folder.add_child(BookmarkNode::Bookmark(bm(
        "Old",
        "https://old.example.com/",
        1_700_000_000,
    )));

    let mut current = BookmarkFolder::new("Bookmarks", 0, 0);
    current.add_child(BookmarkNode::Folder(changed_folder));
    current.add_child(BookmarkNode::Folder(untouched_folder));

    // Snapshot where only "Changed" differs.
    let mut snapshot = tree_hashes(&current);
    snapshot.insert(
        "https://changed.example.com".to_string(),
        "stale-hash".to_string(),
    );

    let changes = detect_changes(&current, &snapshot);
    let incremental = create_incremental_tree(&current, &changes);

    assert_eq!(incremental.bookmark_count(), 1);
    let work = incremental.find_folder_by_name("Work").unwrap();
    assert_eq!(work.bookmark_count(), 1);
    assert!(incremental.find_folder_by_name("Archive").is_none());
}

/// Deleted entries have no representation in the incremental tree.
#[test]
fn test_incremental_tree_ignores_deletions() {
    let before = tree_of(vec![bm("Gone", "https://gone.example.com/", 1_700_000_000)]);
    let snapshot = tree_hashes(&before);
    let current = tree_of(vec![]);

    let changes = detect_changes(&current, &snapshot);
    assert_eq!(changes.deleted.len(), 1);

    let incremental = create_incremental_tree(&current, &changes);
    assert_eq!(incremental.bookmark_count(), 0);
}
