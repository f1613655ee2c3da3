//! Unit tests for the SQLite bookmark store, using in-memory databases
//! and temporary files.

use marksync::stores::sqlite_store::SqliteStore;
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

    let mut nested = BookmarkFolder::new("Projects", 1_700_000_000, 1_700_000_000);
    nested.add_child(BookmarkNode::Bookmark(bm("Repo", "https://repo.example.com/")));
    work.add_child(BookmarkNode::Folder(nested));

    let mut root = BookmarkFolder::new("Bookmarks", 1_700_000_000, 1_700_100_000);
    root.add_child(BookmarkNode::Bookmark(bm("Rust", "https://rust-lang.org/")));
    root.add_child(BookmarkNode::Folder(work));
    root
}

/// A tree written to the store reads back with the same structure,
/// child order, and timestamps.
#[test]
fn test_write_read_roundtrip() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let tree = sample_tree();

    store.write(&tree, true).unwrap();
    let read_back = store.read().unwrap();

    assert_eq!(read_back.bookmark_count(), 3);
    // Top-level order: bookmark first, then the Work folder.
    assert!(matches!(read_back.children[0], BookmarkNode::Bookmark(_)));
    assert!(matches!(read_back.children[1], BookmarkNode::Folder(_)));

    let work = read_back.find_folder_by_name("Work").unwrap();
    assert_eq!(work.date_modified, 1_700_050_000);
    assert!(work.find_folder_by_name("Projects").is_some());
    assert!(read_back.find_bookmark_by_url("https://repo.example.com/").is_some());
}

/// Favicon blobs and tags survive the BLOB/JSON column encoding.
#[test]
fn test_favicon_and_tags_roundtrip() {
    let mut store = SqliteStore::open_in_memory().unwrap();

    let mut bookmark = bm("Docs", "https://docs.example.com/");
    bookmark.favicon = Some("aWNvbi1ieXRlcw==".to_string());
    bookmark.tags = vec!["work".to_string(), "reference".to_string()];
    let mut tree = BookmarkFolder::new("Bookmarks", 0, 0);
    tree.add_child(BookmarkNode::Bookmark(bookmark));

    store.write(&tree, true).unwrap();
    let read_back = store.read().unwrap();

    let b = read_back.find_bookmark_by_url("https://docs.example.com/").unwrap();
    assert_eq!(b.favicon, Some("aWNvbi1ieXRlcw==".to_string()));
    assert_eq!(b.tags, vec!["work", "reference"]);
}

/// clear_existing replaces the previous contents entirely.
#[test]
fn test_write_clear_existing_replaces() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    store.write(&sample_tree(), true).unwrap();

    let mut replacement = BookmarkFolder::new("Bookmarks", 0, 0);
    replacement.add_child(BookmarkNode::Bookmark(bm("Only", "https://only.example.com/")));
    store.write(&replacement, true).unwrap();

    let read_back = store.read().unwrap();
    assert_eq!(read_back.bookmark_count(), 1);
    assert!(read_back.find_bookmark_by_url("https://only.example.com/").is_some());
}

/// Without clear_existing, new rows append to what is already there.
#[test]
fn test_write_without_clear_appends() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    store.write(&sample_tree(), true).unwrap();

    let mut extra = BookmarkFolder::new("Bookmarks", 0, 0);
    extra.add_child(BookmarkNode::Bookmark(bm("Extra", "https://extra.example.com/")));
    store.write(&extra, false).unwrap();

    let read_back = store.read().unwrap();
    assert_eq!(read_back.bookmark_count(), 4);
}

/// Opening a missing database file reports SourceNotFound.
#[test]
fn test_open_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = SqliteStore::open(dir.path().join("missing.sqlite")).unwrap_err();
    assert!(matches!(err, SyncError::SourceNotFound(_)));
}

/// create initializes a fresh file that open then accepts, and data
/// persists across the reopen.
#[test]
fn test_create_then_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bookmarks.sqlite");

    {
        let mut store = SqliteStore::create(&path).unwrap();
        store.write(&sample_tree(), true).unwrap();
    }

    let store = SqliteStore::open(&path).unwrap();
    let read_back = store.read().unwrap();
    assert_eq!(read_back.bookmark_count(), 3);
}

/// An empty database reads as an empty root folder named "Bookmarks".
#[test]
fn test_empty_database_reads_empty_root() {
    let store = SqliteStore::open_in_memory().unwrap();
    let tree = store.read().unwrap();

    assert_eq!(tree.name, "Bookmarks");
    assert!(tree.children.is_empty());
    assert_eq!(tree.date_added, 0);
    assert_eq!(tree.date_modified, 0);
}

/// The root folder's dates reflect the newest bookmark rows.
#[test]
fn test_root_dates_from_rows() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    let mut tree = BookmarkFolder::new("Bookmarks", 0, 0);
    tree.add_child(BookmarkNode::Bookmark(Bookmark::new(
        "Old",
        "https://old.example.com/",
        1_600_000_000,
        1_650_000_000,
    )));
    tree.add_child(BookmarkNode::Bookmark(Bookmark::new(
        "New",
        "https://new.example.com/",
        1_700_000_000,
        1_700_100_000,
    )));

    store.write(&tree, true).unwrap();
    let read_back = store.read().unwrap();

    assert_eq!(read_back.date_added, 1_700_000_000);
    assert_eq!(read_back.date_modified, 1_700_100_000);
}
