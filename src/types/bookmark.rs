use serde::{Deserialize, Serialize};

/// Represents a saved bookmark.
///
/// Timestamps are UNIX seconds. `favicon` is an opaque reference (the
/// SQLite store keeps it base64-encoded); `tags` preserve their order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    pub title: String,
    pub url: String,
    pub date_added: i64,
    pub date_modified: i64,
    #[serde(default)]
    pub favicon: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Bookmark {
    /// Creates a bookmark with no favicon or tags.
    pub fn new(title: &str, url: &str, date_added: i64, date_modified: i64) -> Self {
        Self {
            title: title.to_string(),
            url: url.to_string(),
            date_added,
            date_modified,
            favicon: None,
            tags: Vec::new(),
        }
    }
}

/// Represents a folder containing bookmarks and subfolders.
///
/// Child order is display order and is semantically meaningful.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookmarkFolder {
    pub name: String,
    pub date_added: i64,
    pub date_modified: i64,
    #[serde(default)]
    pub children: Vec<BookmarkNode>,
}

/// A single entry in a bookmark tree: either a bookmark or a folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BookmarkNode {
    Bookmark(Bookmark),
    Folder(BookmarkFolder),
}

/// A bookmark tree is a single root folder. Children own their subtrees,
/// so the structure is a strict tree with no sharing.
pub type BookmarkTree = BookmarkFolder;

impl BookmarkFolder {
    /// Creates an empty folder.
    pub fn new(name: &str, date_added: i64, date_modified: i64) -> Self {
        Self {
            name: name.to_string(),
            date_added,
            date_modified,
            children: Vec::new(),
        }
    }

    /// Appends a child entry, preserving display order.
    pub fn add_child(&mut self, child: BookmarkNode) {
        self.children.push(child);
    }

    /// Returns all bookmarks in this subtree in depth-first traversal order.
    pub fn all_bookmarks(&self) -> Vec<&Bookmark> {
        let mut bookmarks = Vec::new();
        for child in &self.children {
            match child {
                BookmarkNode::Bookmark(b) => bookmarks.push(b),
                BookmarkNode::Folder(f) => bookmarks.extend(f.all_bookmarks()),
            }
        }
        bookmarks
    }

    /// Returns all folders in this subtree (excluding self), depth-first.
    pub fn all_folders(&self) -> Vec<&BookmarkFolder> {
        let mut folders = Vec::new();
        for child in &self.children {
            if let BookmarkNode::Folder(f) = child {
                folders.push(f);
                folders.extend(f.all_folders());
            }
        }
        folders
    }

    /// Finds a bookmark by URL anywhere in this subtree (case-insensitive).
    pub fn find_bookmark_by_url(&self, url: &str) -> Option<&Bookmark> {
        let url_lower = url.to_lowercase();
        for child in &self.children {
            match child {
                BookmarkNode::Bookmark(b) => {
                    if b.url.to_lowercase() == url_lower {
                        return Some(b);
                    }
                }
                BookmarkNode::Folder(f) => {
                    if let Some(found) = f.find_bookmark_by_url(url) {
                        return Some(found);
                    }
                }
            }
        }
        None
    }

    /// Finds a direct child folder by name (non-recursive).
    pub fn find_folder_by_name(&self, name: &str) -> Option<&BookmarkFolder> {
        self.children.iter().find_map(|child| match child {
            BookmarkNode::Folder(f) if f.name == name => Some(f),
            _ => None,
        })
    }

    /// Number of bookmarks in this subtree.
    pub fn bookmark_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| match child {
                BookmarkNode::Bookmark(_) => 1,
                BookmarkNode::Folder(f) => f.bookmark_count(),
            })
            .sum()
    }
}
