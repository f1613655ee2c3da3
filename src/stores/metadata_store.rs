//! File-backed sync metadata store.
//!
//! The persisted file is a JSON object mapping `"<source>:<profile>"`
//! keys to `{last_sync, bookmarks}` snapshots. Saves are read-modify-
//! write of the whole map; the engine assumes at most one sync process
//! runs per key at a time.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::stores::MetadataStore;
use crate::types::errors::SyncError;
use crate::types::metadata::SyncMetadata;

/// Metadata store persisted as a single JSON file.
pub struct JsonMetadataStore {
    path: PathBuf,
}

impl JsonMetadataStore {
    /// A missing file is not an error; it simply means no sync has run
    /// yet for any key.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn load_all(&self) -> Result<HashMap<String, SyncMetadata>, SyncError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let content = fs::read_to_string(&self.path)
            .map_err(|e| SyncError::MetadataError(format!("failed to read metadata: {}", e)))?;
        serde_json::from_str(&content)
            .map_err(|e| SyncError::MetadataError(format!("failed to parse metadata: {}", e)))
    }

    fn save_all(&self, entries: &HashMap<String, SyncMetadata>) -> Result<(), SyncError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    SyncError::MetadataError(format!("failed to create metadata directory: {}", e))
                })?;
            }
        }
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| SyncError::MetadataError(format!("failed to serialize metadata: {}", e)))?;
        fs::write(&self.path, json)
            .map_err(|e| SyncError::MetadataError(format!("failed to write metadata: {}", e)))
    }
}

impl MetadataStore for JsonMetadataStore {
    fn load(&self, key: &str) -> Result<Option<SyncMetadata>, SyncError> {
        Ok(self.load_all()?.remove(key))
    }

    fn save(&mut self, key: &str, metadata: &SyncMetadata) -> Result<(), SyncError> {
        let mut entries = self.load_all()?;
        entries.insert(key.to_string(), metadata.clone());
        self.save_all(&entries)
    }
}
