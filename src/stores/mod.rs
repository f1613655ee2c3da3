// marksync storage adapters
// Each store maps a persistent bookmark format to the in-memory tree.
// The engine only ever sees these two capability traits, so new source
// types slot in without touching it.

pub mod backup_manager;
pub mod json_store;
pub mod memory_store;
pub mod metadata_store;
pub mod sqlite_store;

use crate::types::bookmark::BookmarkTree;
use crate::types::errors::SyncError;
use crate::types::metadata::SyncMetadata;

/// A persistent bookmark source/target.
pub trait BookmarkStore {
    /// Reads the full bookmark tree. The returned tree is independently
    /// owned; the store keeps no references into it.
    fn read(&self) -> Result<BookmarkTree, SyncError>;

    /// Writes a full tree. When `clear_existing` is set, pre-existing
    /// entries are removed first.
    fn write(&mut self, tree: &BookmarkTree, clear_existing: bool) -> Result<(), SyncError>;
}

/// Persisted per-key sync state, keyed by `"<source>:<profile>"`.
pub trait MetadataStore {
    fn load(&self, key: &str) -> Result<Option<SyncMetadata>, SyncError>;
    fn save(&mut self, key: &str, metadata: &SyncMetadata) -> Result<(), SyncError>;
}
