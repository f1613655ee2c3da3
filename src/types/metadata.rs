use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Persisted sync state for one `"<source>:<profile>"` key.
///
/// Read at the start of an incremental sync and rewritten at the end of
/// every successful sync of any mode. A missing entry forces the first
/// sync for that key to run in full mode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncMetadata {
    /// UNIX seconds of the last successful sync.
    pub last_sync: i64,
    /// Normalized URL -> content hash at the time of the last sync.
    #[serde(default)]
    pub bookmarks: HashMap<String, String>,
}

impl SyncMetadata {
    /// Snapshot with the given sync time and hash map.
    pub fn new(last_sync: i64, bookmarks: HashMap<String, String>) -> Self {
        Self {
            last_sync,
            bookmarks,
        }
    }
}

/// Builds the metadata key for a source/profile pair.
pub fn metadata_key(source: &str, profile: &str) -> String {
    format!("{}:{}", source, profile)
}
