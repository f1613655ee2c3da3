//! Relational bookmark store backed by SQLite via `rusqlite`.
//!
//! Bookmarks and folders live in two tables linked by `parent_id` /
//! `folder_id`, with a shared per-parent `position` column carrying
//! display order. Favicon payloads are BLOBs in the database and base64
//! strings in the model; tags are stored as a JSON array string.

use std::collections::HashMap;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rusqlite::{params, Connection, ErrorCode};
use uuid::Uuid;

use crate::stores::BookmarkStore;
use crate::types::bookmark::{Bookmark, BookmarkFolder, BookmarkNode, BookmarkTree};
use crate::types::errors::SyncError;

/// Name given to the root folder of trees read from this store.
const ROOT_NAME: &str = "Bookmarks";

/// Bookmark store backed by a SQLite database file.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

struct FolderRow {
    id: String,
    name: String,
    parent_id: Option<String>,
    position: i64,
    date_added: i64,
    date_modified: i64,
}

struct BookmarkRow {
    url: String,
    title: String,
    folder_id: Option<String>,
    position: i64,
    date_added: i64,
    date_modified: i64,
    favicon: Option<Vec<u8>>,
    tags: String,
}

impl SqliteStore {
    /// Opens an existing database file. A missing file is reported as
    /// `SourceNotFound` rather than silently created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SyncError> {
        if !path.as_ref().exists() {
            return Err(SyncError::SourceNotFound(format!(
                "bookmark database does not exist: {}",
                path.as_ref().display()
            )));
        }
        let conn = Connection::open(path).map_err(map_db_err)?;
        let store = Self { conn };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Creates (or opens) a database file, initializing the schema.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, SyncError> {
        let conn = Connection::open(path).map_err(map_db_err)?;
        let store = Self { conn };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Opens an in-memory database. The data is discarded on drop; useful
    /// for testing.
    pub fn open_in_memory() -> Result<Self, SyncError> {
        let conn = Connection::open_in_memory().map_err(map_db_err)?;
        let store = Self { conn };
        store.ensure_schema()?;
        Ok(store)
    }

    fn ensure_schema(&self) -> Result<(), SyncError> {
        self.conn
            .execute_batch(
                "PRAGMA foreign_keys = ON;

                 CREATE TABLE IF NOT EXISTS folders (
                     id TEXT PRIMARY KEY,
                     name TEXT NOT NULL,
                     parent_id TEXT,
                     position INTEGER NOT NULL DEFAULT 0,
                     date_added INTEGER NOT NULL DEFAULT 0,
                     date_modified INTEGER NOT NULL DEFAULT 0,
                     FOREIGN KEY (parent_id) REFERENCES folders(id)
                 );

                 CREATE TABLE IF NOT EXISTS bookmarks (
                     id TEXT PRIMARY KEY,
                     url TEXT NOT NULL,
                     title TEXT NOT NULL,
                     folder_id TEXT,
                     position INTEGER NOT NULL DEFAULT 0,
                     date_added INTEGER NOT NULL DEFAULT 0,
                     date_modified INTEGER NOT NULL DEFAULT 0,
                     favicon BLOB,
                     tags TEXT NOT NULL DEFAULT '[]',
                     FOREIGN KEY (folder_id) REFERENCES folders(id)
                 );

                 CREATE INDEX IF NOT EXISTS idx_folders_parent ON folders(parent_id);
                 CREATE INDEX IF NOT EXISTS idx_bookmarks_folder ON bookmarks(folder_id);",
            )
            .map_err(map_db_err)
    }

    fn load_folders(&self) -> Result<Vec<FolderRow>, SyncError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, name, parent_id, position, date_added, date_modified \
                 FROM folders ORDER BY position",
            )
            .map_err(map_db_err)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(FolderRow {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    parent_id: row.get(2)?,
                    position: row.get(3)?,
                    date_added: row.get(4)?,
                    date_modified: row.get(5)?,
                })
            })
            .map_err(map_db_err)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(map_db_err)
    }

    fn load_bookmarks(&self) -> Result<Vec<BookmarkRow>, SyncError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT url, title, folder_id, position, date_added, date_modified, \
                 favicon, tags FROM bookmarks ORDER BY position",
            )
            .map_err(map_db_err)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(BookmarkRow {
                    url: row.get(0)?,
                    title: row.get(1)?,
                    folder_id: row.get(2)?,
                    position: row.get(3)?,
                    date_added: row.get(4)?,
                    date_modified: row.get(5)?,
                    favicon: row.get(6)?,
                    tags: row.get(7)?,
                })
            })
            .map_err(map_db_err)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(map_db_err)
    }

    fn row_to_bookmark(row: &BookmarkRow) -> Result<Bookmark, SyncError> {
        let tags: Vec<String> = serde_json::from_str(&row.tags)
            .map_err(|e| SyncError::CorruptedData(format!("bad tags column: {}", e)))?;
        Ok(Bookmark {
            title: row.title.clone(),
            url: row.url.clone(),
            date_added: row.date_added,
            date_modified: row.date_modified,
            favicon: row.favicon.as_deref().map(|blob| BASE64.encode(blob)),
            tags,
        })
    }

    /// Assembles the folder with the given id (`None` is the root).
    fn build_folder(
        &self,
        folder: BookmarkFolder,
        id: Option<&str>,
        folders_by_parent: &HashMap<Option<String>, Vec<&FolderRow>>,
        bookmarks_by_parent: &HashMap<Option<String>, Vec<&BookmarkRow>>,
        depth: usize,
    ) -> Result<BookmarkFolder, SyncError> {
        // A parent chain longer than this means the table's parent links
        // loop, which violates the tree invariant.
        if depth > 256 {
            return Err(SyncError::CorruptedData(
                "folder nesting exceeds limit; parent links may form a cycle".to_string(),
            ));
        }
        let mut folder = folder;
        let key = id.map(|s| s.to_string());

        let mut children: Vec<(i64, BookmarkNode)> = Vec::new();
        if let Some(rows) = bookmarks_by_parent.get(&key) {
            for row in rows {
                children.push((row.position, BookmarkNode::Bookmark(Self::row_to_bookmark(row)?)));
            }
        }
        if let Some(rows) = folders_by_parent.get(&key) {
            for row in rows {
                let child = self.build_folder(
                    BookmarkFolder::new(&row.name, row.date_added, row.date_modified),
                    Some(&row.id),
                    folders_by_parent,
                    bookmarks_by_parent,
                    depth + 1,
                )?;
                children.push((row.position, BookmarkNode::Folder(child)));
            }
        }
        children.sort_by_key(|(position, _)| *position);
        folder.children = children.into_iter().map(|(_, node)| node).collect();
        Ok(folder)
    }

    fn insert_children(
        tx: &rusqlite::Transaction,
        children: &[BookmarkNode],
        parent_id: Option<&str>,
    ) -> Result<(), SyncError> {
        for (position, child) in children.iter().enumerate() {
            match child {
                BookmarkNode::Bookmark(b) => {
                    let favicon = match &b.favicon {
                        Some(encoded) => Some(BASE64.decode(encoded).map_err(|e| {
                            SyncError::CorruptedData(format!("bad favicon encoding: {}", e))
                        })?),
                        None => None,
                    };
                    let tags = serde_json::to_string(&b.tags)
                        .map_err(|e| SyncError::StorageError(e.to_string()))?;
                    tx.execute(
                        "INSERT INTO bookmarks \
                         (id, url, title, folder_id, position, date_added, date_modified, favicon, tags) \
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                        params![
                            Uuid::new_v4().to_string(),
                            b.url,
                            b.title,
                            parent_id,
                            position as i64,
                            b.date_added,
                            b.date_modified,
                            favicon,
                            tags,
                        ],
                    )
                    .map_err(map_db_err)?;
                }
                BookmarkNode::Folder(f) => {
                    let id = Uuid::new_v4().to_string();
                    tx.execute(
                        "INSERT INTO folders \
                         (id, name, parent_id, position, date_added, date_modified) \
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                        params![id, f.name, parent_id, position as i64, f.date_added, f.date_modified],
                    )
                    .map_err(map_db_err)?;
                    Self::insert_children(tx, &f.children, Some(&id))?;
                }
            }
        }
        Ok(())
    }
}

impl BookmarkStore for SqliteStore {
    fn read(&self) -> Result<BookmarkTree, SyncError> {
        let folders = self.load_folders()?;
        let bookmarks = self.load_bookmarks()?;

        let mut folders_by_parent: HashMap<Option<String>, Vec<&FolderRow>> = HashMap::new();
        for row in &folders {
            folders_by_parent.entry(row.parent_id.clone()).or_default().push(row);
        }
        let mut bookmarks_by_parent: HashMap<Option<String>, Vec<&BookmarkRow>> = HashMap::new();
        for row in &bookmarks {
            bookmarks_by_parent.entry(row.folder_id.clone()).or_default().push(row);
        }

        let date_added = bookmarks.iter().map(|b| b.date_added).max().unwrap_or(0);
        let date_modified = bookmarks.iter().map(|b| b.date_modified).max().unwrap_or(0);
        self.build_folder(
            BookmarkFolder::new(ROOT_NAME, date_added, date_modified),
            None,
            &folders_by_parent,
            &bookmarks_by_parent,
            0,
        )
    }

    fn write(&mut self, tree: &BookmarkTree, clear_existing: bool) -> Result<(), SyncError> {
        let tx = self.conn.transaction().map_err(map_db_err)?;
        if clear_existing {
            tx.execute("DELETE FROM bookmarks", []).map_err(map_db_err)?;
            tx.execute("DELETE FROM folders", []).map_err(map_db_err)?;
        }
        Self::insert_children(&tx, &tree.children, None)?;
        tx.commit().map_err(map_db_err)
    }
}

/// Maps SQLite errors to sync errors; a busy or locked database means
/// the owning application has it open.
fn map_db_err(e: rusqlite::Error) -> SyncError {
    if let rusqlite::Error::SqliteFailure(inner, _) = &e {
        if matches!(inner.code, ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked) {
            return SyncError::SourceLocked(format!("bookmark database is busy: {}", e));
        }
    }
    SyncError::StorageError(e.to_string())
}
