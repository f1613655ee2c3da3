//! Document bookmark store: one nested JSON file.
//!
//! The document is a versioned object with a single recursive root node;
//! nodes are tagged `"folder"` or `"url"`. A sibling `<file>.lock` file
//! marks the document as in use by its owning application.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::stores::BookmarkStore;
use crate::types::bookmark::{Bookmark, BookmarkFolder, BookmarkNode, BookmarkTree};
use crate::types::errors::SyncError;

const DOCUMENT_VERSION: u32 = 1;

/// Bookmark store backed by a nested JSON document file.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
}

#[derive(Serialize, Deserialize)]
struct Document {
    version: u32,
    root: Node,
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Node {
    Url {
        name: String,
        url: String,
        date_added: i64,
        date_modified: i64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        favicon: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tags: Vec<String>,
    },
    Folder {
        name: String,
        date_added: i64,
        date_modified: i64,
        #[serde(default)]
        children: Vec<Node>,
    },
}

impl JsonStore {
    /// Opens an existing document file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SyncError> {
        if !path.as_ref().exists() {
            return Err(SyncError::SourceNotFound(format!(
                "bookmark document does not exist: {}",
                path.as_ref().display()
            )));
        }
        Ok(Self {
            path: path.as_ref().to_path_buf(),
        })
    }

    /// Creates an empty document at the given path and opens it.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, SyncError> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
        };
        store.save_document(&BookmarkFolder::new("Bookmarks", 0, 0))?;
        Ok(store)
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }

    fn check_lock(&self) -> Result<(), SyncError> {
        if self.lock_path().exists() {
            return Err(SyncError::SourceLocked(format!(
                "bookmark document is in use: {}",
                self.path.display()
            )));
        }
        Ok(())
    }

    fn save_document(&self, tree: &BookmarkTree) -> Result<(), SyncError> {
        let document = Document {
            version: DOCUMENT_VERSION,
            root: folder_to_node(tree),
        };
        let json = serde_json::to_string_pretty(&document)
            .map_err(|e| SyncError::StorageError(format!("failed to serialize document: {}", e)))?;
        fs::write(&self.path, json)
            .map_err(|e| SyncError::StorageError(format!("failed to write document: {}", e)))
    }
}

impl BookmarkStore for JsonStore {
    fn read(&self) -> Result<BookmarkTree, SyncError> {
        self.check_lock()?;
        if !self.path.exists() {
            return Err(SyncError::SourceNotFound(format!(
                "bookmark document does not exist: {}",
                self.path.display()
            )));
        }
        let content = fs::read_to_string(&self.path)
            .map_err(|e| SyncError::StorageError(format!("failed to read document: {}", e)))?;
        let document: Document = serde_json::from_str(&content)
            .map_err(|e| SyncError::CorruptedData(format!("malformed bookmark document: {}", e)))?;
        match node_to_entry(document.root) {
            BookmarkNode::Folder(folder) => Ok(folder),
            BookmarkNode::Bookmark(_) => Err(SyncError::CorruptedData(
                "document root must be a folder".to_string(),
            )),
        }
    }

    /// Document writes are whole-file replacement, so `clear_existing`
    /// makes no difference here.
    fn write(&mut self, tree: &BookmarkTree, _clear_existing: bool) -> Result<(), SyncError> {
        self.check_lock()?;
        self.save_document(tree)
    }
}

fn folder_to_node(folder: &BookmarkFolder) -> Node {
    Node::Folder {
        name: folder.name.clone(),
        date_added: folder.date_added,
        date_modified: folder.date_modified,
        children: folder.children.iter().map(entry_to_node).collect(),
    }
}

fn entry_to_node(entry: &BookmarkNode) -> Node {
    match entry {
        BookmarkNode::Bookmark(b) => Node::Url {
            name: b.title.clone(),
            url: b.url.clone(),
            date_added: b.date_added,
            date_modified: b.date_modified,
            favicon: b.favicon.clone(),
            tags: b.tags.clone(),
        },
        BookmarkNode::Folder(f) => folder_to_node(f),
    }
}

fn node_to_entry(node: Node) -> BookmarkNode {
    match node {
        Node::Url {
            name,
            url,
            date_added,
            date_modified,
            favicon,
            tags,
        } => BookmarkNode::Bookmark(Bookmark {
            title: name,
            url,
            date_added,
            date_modified,
            favicon,
            tags,
        }),
        Node::Folder {
            name,
            date_added,
            date_modified,
            children,
        } => {
            let mut folder = BookmarkFolder::new(&name, date_added, date_modified);
            folder.children = children.into_iter().map(node_to_entry).collect();
            BookmarkNode::Folder(folder)
        }
    }
}
