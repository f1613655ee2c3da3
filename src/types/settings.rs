use serde::{Deserialize, Serialize};

use crate::services::conflict_resolver::ResolutionPolicy;
use crate::services::duplicate_matcher::MatchOptions;
use crate::services::merger::MergeStrategy;
use crate::services::sync_engine::SyncMode;

/// User-facing sync configuration, persisted as a JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncSettings {
    pub mode: SyncMode,
    pub strategy: MergeStrategy,
    pub resolution_policy: ResolutionPolicy,
    pub enable_fuzzy_matching: bool,
    pub enable_name_matching: bool,
    /// Back up store files before any write (performed by the caller,
    /// not the engine).
    pub backup_before_sync: bool,
    /// Path of the persisted sync metadata file.
    pub metadata_file: String,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            mode: SyncMode::Merge,
            strategy: MergeStrategy::KeepAll,
            resolution_policy: ResolutionPolicy::KeepNewer,
            enable_fuzzy_matching: true,
            enable_name_matching: true,
            backup_before_sync: true,
            metadata_file: ".sync_metadata.json".to_string(),
        }
    }
}

impl SyncSettings {
    /// Matcher toggles as the options struct the matcher consumes.
    pub fn match_options(&self) -> MatchOptions {
        MatchOptions {
            fuzzy: self.enable_fuzzy_matching,
            name_matching: self.enable_name_matching,
        }
    }
}
