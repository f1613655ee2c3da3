//! In-memory stores for tests and ad-hoc pipelines.

use std::collections::HashMap;

use crate::stores::{BookmarkStore, MetadataStore};
use crate::types::bookmark::{BookmarkFolder, BookmarkTree};
use crate::types::errors::SyncError;
use crate::types::metadata::SyncMetadata;

/// In-memory bookmark store with injectable lock and failure behavior.
pub struct MemoryStore {
    tree: BookmarkTree,
    locked: bool,
    fail_writes: bool,
}

impl MemoryStore {
    /// Store holding an empty root folder.
    pub fn empty() -> Self {
        Self::with_tree(BookmarkFolder::new("Bookmarks", 0, 0))
    }

    pub fn with_tree(tree: BookmarkTree) -> Self {
        Self {
            tree,
            locked: false,
            fail_writes: false,
        }
    }

    /// Makes subsequent reads and writes fail with `SourceLocked`.
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    /// Makes subsequent writes fail with `StorageError`.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// The currently stored tree.
    pub fn tree(&self) -> &BookmarkTree {
        &self.tree
    }

    fn check_lock(&self) -> Result<(), SyncError> {
        if self.locked {
            return Err(SyncError::SourceLocked("in-memory store".to_string()));
        }
        Ok(())
    }
}

impl BookmarkStore for MemoryStore {
    fn read(&self) -> Result<BookmarkTree, SyncError> {
        self.check_lock()?;
        Ok(self.tree.clone())
    }

    fn write(&mut self, tree: &BookmarkTree, clear_existing: bool) -> Result<(), SyncError> {
        self.check_lock()?;
        if self.fail_writes {
            return Err(SyncError::StorageError(
                "in-memory store write failure".to_string(),
            ));
        }
        if clear_existing {
            self.tree = tree.clone();
        } else {
            let mut merged = self.tree.clone();
            merged.children.extend(tree.children.iter().cloned());
            self.tree = merged;
        }
        Ok(())
    }
}

/// In-memory metadata store.
#[derive(Default)]
pub struct MemoryMetadataStore {
    entries: HashMap<String, SyncMetadata>,
}

impl MemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MetadataStore for MemoryMetadataStore {
    fn load(&self, key: &str) -> Result<Option<SyncMetadata>, SyncError> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, metadata: &SyncMetadata) -> Result<(), SyncError> {
        self.entries.insert(key.to_string(), metadata.clone());
        Ok(())
    }
}
