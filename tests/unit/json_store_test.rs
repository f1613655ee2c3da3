//! Unit tests for the JSON document bookmark store.

use std::fs;

use marksync::stores::json_store::JsonStore;
use marksync::stores::BookmarkStore;
use marksync::types::bookmark::{Bookmark, BookmarkFolder, BookmarkNode, BookmarkTree};
use marksync::types::errors::SyncError;
use tempfile::TempDir;

fn bm(title: &str, url: &str) -> Bookmark {
    Bookmark::new(title, url, 1_700_000_000, 1_700_100_000)
}

fn sample_tree() -> BookmarkTree {
    let mut work = BookmarkFolder::new("Work", 1_700_000_000, 1_700_050_000);
    work.add_child(BookmarkNode::Bookmark(bm("Docs", "https://docs.example.com/")));

    let mut root = BookmarkFolder::new("Bookmarks", 1_700_000_000, 1_700_100_000);
    root.add_child(BookmarkNode::Bookmark(bm("Rust", "https://rust-lang.org/")));
    root.add_child(BookmarkNode::Folder(work));
    root
}

/// create writes an empty document that reads back as an empty root.
#[test]
fn test_create_empty_document() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bookmarks.json");

    let store = JsonStore::create(&path).unwrap();
    let tree = store.read().unwrap();

    assert_eq!(tree.name, "Bookmarks");
    assert!(tree.children.is_empty());
}

/// A written tree reads back identical, nested folders included.
#[test]
fn test_write_read_roundtrip() {
    let dir = TempDir::new().unwrap();
    let mut store = JsonStore::create(dir.path().join("bookmarks.json")).unwrap();

    let tree = sample_tree();
    store.write(&tree, true).unwrap();

    assert_eq!(store.read().unwrap(), tree);
}

/// Favicon and tags round-trip through the document format.
#[test]
fn test_optional_fields_roundtrip() {
    let dir = TempDir::new().unwrap();
    let mut store = JsonStore::create(dir.path().join("bookmarks.json")).unwrap();

    let mut bookmark = bm("Docs", "https://docs.example.com/");
    bookmark.favicon = Some("aWNvbg==".to_string());
    bookmark.tags = vec!["work".to_string()];
    let mut tree = BookmarkFolder::new("Bookmarks", 0, 0);
    tree.add_child(BookmarkNode::Bookmark(bookmark.clone()));

    store.write(&tree, true).unwrap();
    let read_back = store.read().unwrap();
    assert_eq!(read_back.all_bookmarks(), vec![&bookmark]);
}

/// Absent favicon and empty tags are omitted from the serialized file.
#[test]
fn test_bare_fields_not_serialized() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bookmarks.json");
    let mut store = JsonStore::create(&path).unwrap();

    store.write(&sample_tree(), true).unwrap();
    let content = fs::read_to_string(&path).unwrap();

    assert!(!content.contains("favicon"));
    assert!(!content.contains("tags"));
    assert!(content.contains("\"type\": \"url\""));
    assert!(content.contains("\"type\": \"folder\""));
}

/// Opening a missing document reports SourceNotFound.
#[test]
fn test_open_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = JsonStore::open(dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, SyncError::SourceNotFound(_)));
}

/// A sibling .lock file blocks both reads and writes with SourceLocked.
#[test]
fn test_lock_file_blocks_access() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bookmarks.json");
    let mut store = JsonStore::create(&path).unwrap();
    store.write(&sample_tree(), true).unwrap();

    fs::write(dir.path().join("bookmarks.json.lock"), b"").unwrap();

    assert!(matches!(store.read().unwrap_err(), SyncError::SourceLocked(_)));
    assert!(matches!(
        store.write(&sample_tree(), true).unwrap_err(),
        SyncError::SourceLocked(_)
    ));

    // Removing the lock restores access.
    fs::remove_file(dir.path().join("bookmarks.json.lock")).unwrap();
    assert!(store.read().is_ok());
}

/// Unparseable document content reports CorruptedData.
#[test]
fn test_malformed_document() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bookmarks.json");
    fs::write(&path, "{ not json").unwrap();

    let store = JsonStore::open(&path).unwrap();
    assert!(matches!(store.read().unwrap_err(), SyncError::CorruptedData(_)));
}

/// A document whose root is a url node rather than a folder is rejected.
#[test]
fn test_root_must_be_folder() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bookmarks.json");
    fs::write(
        &path,
        r#"{"version":1,"root":{"type":"url","name":"X","url":"https://x.example.com/","date_added":0,"date_modified":0}}"#,
    )
    .unwrap();

    let store = JsonStore::open(&path).unwrap();
    assert!(matches!(store.read().unwrap_err(), SyncError::CorruptedData(_)));
}

/// Writing always replaces the whole document, regardless of the
/// clear_existing flag.
#[test]
fn test_write_is_whole_file_replacement() {
    let dir = TempDir::new().unwrap();
    let mut store = JsonStore::create(dir.path().join("bookmarks.json")).unwrap();
    store.write(&sample_tree(), true).unwrap();

    let mut replacement = BookmarkFolder::new("Bookmarks", 0, 0);
    replacement.add_child(BookmarkNode::Bookmark(bm("Only", "https://only.example.com/")));
    store.write(&replacement, false).unwrap();

    assert_eq!(store.read().unwrap().bookmark_count(), 1);
}
