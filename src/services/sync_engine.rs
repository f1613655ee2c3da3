//! Sync orchestrator: picks a mode, drives the merge engine and change
//! detector, and decides what gets written to each store.
//!
//! One engine instance drives one source/target pairing. Stores and the
//! metadata store are passed into `sync` explicitly, so the engine has
//! no hidden dependencies and tests can run it entirely in memory.

use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::services::change_detector;
use crate::services::duplicate_matcher::MatchOptions;
use crate::services::merger::{MergeEngine, MergeStrategy};
use crate::services::validator::validate_tree;
use crate::stores::{BookmarkStore, MetadataStore};
use crate::types::bookmark::BookmarkTree;
use crate::types::errors::SyncError;
use crate::types::metadata::{metadata_key, SyncMetadata};
use crate::types::report::SyncOutcome;

/// How a sync run treats the two sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// Replace the target with the source tree.
    Full,
    /// Write only when the hash snapshot says something changed.
    Incremental,
    /// Merge both trees and write the result to both sides.
    Merge,
}

impl FromStr for SyncMode {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(SyncMode::Full),
            "incremental" => Ok(SyncMode::Incremental),
            "merge" => Ok(SyncMode::Merge),
            other => Err(SyncError::ConflictUnresolved(format!(
                "unknown sync mode: {}",
                other
            ))),
        }
    }
}

/// Pipeline position of the current run. `Failed` is terminal and
/// reachable from any state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Reading,
    Diffing,
    Writing,
    Done,
    Failed,
}

/// Orchestrates one source/target sync pairing.
pub struct SyncEngine {
    mode: SyncMode,
    strategy: MergeStrategy,
    options: MatchOptions,
    source_label: String,
    target_label: String,
    source_key: String,
    target_key: String,
    state: SyncState,
}

impl SyncEngine {
    /// Labels name the sources in reports (e.g. "firefox", "chrome");
    /// label/profile pairs form the metadata keys.
    pub fn new(
        mode: SyncMode,
        strategy: MergeStrategy,
        options: MatchOptions,
        source_label: &str,
        source_profile: &str,
        target_label: &str,
        target_profile: &str,
    ) -> Self {
        Self {
            mode,
            strategy,
            options,
            source_label: source_label.to_string(),
            target_label: target_label.to_string(),
            source_key: metadata_key(source_label, source_profile),
            target_key: metadata_key(target_label, target_profile),
            state: SyncState::Idle,
        }
    }

    /// Current pipeline state; `Done` or `Failed` after `sync` returns.
    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Runs one sync in the configured mode.
    ///
    /// Any adapter failure aborts the remaining pipeline and leaves the
    /// engine in `Failed`; writes already committed to one target are
    /// not rolled back.
    pub fn sync(
        &mut self,
        source: &mut dyn BookmarkStore,
        target: &mut dyn BookmarkStore,
        metadata: &mut dyn MetadataStore,
    ) -> Result<SyncOutcome, SyncError> {
        self.state = SyncState::Idle;
        let result = match self.mode {
            SyncMode::Full => self.run_full(source, target, metadata),
            SyncMode::Incremental => self.run_incremental(source, target, metadata),
            SyncMode::Merge => self.run_merge(source, target, metadata),
        };
        self.state = match result {
            Ok(_) => SyncState::Done,
            Err(_) => SyncState::Failed,
        };
        result
    }

    fn run_full(
        &mut self,
        source: &mut dyn BookmarkStore,
        target: &mut dyn BookmarkStore,
        metadata: &mut dyn MetadataStore,
    ) -> Result<SyncOutcome, SyncError> {
        self.state = SyncState::Reading;
        let tree = source.read()?;
        validate_tree(&tree)?;

        self.state = SyncState::Writing;
        target.write(&tree, true)?;
        self.update_metadata(metadata, &tree)?;

        Ok(SyncOutcome {
            bookmarks_written: tree.bookmark_count(),
            ..Default::default()
        })
    }

    fn run_incremental(
        &mut self,
        source: &mut dyn BookmarkStore,
        target: &mut dyn BookmarkStore,
        metadata: &mut dyn MetadataStore,
    ) -> Result<SyncOutcome, SyncError> {
        self.state = SyncState::Reading;
        let source_tree = source.read()?;
        validate_tree(&source_tree)?;

        let Some(previous) = metadata.load(&self.target_key)? else {
            // First sync for this key: full semantics, and seed the
            // snapshot so the next run can diff.
            self.state = SyncState::Writing;
            target.write(&source_tree, true)?;
            self.update_metadata(metadata, &source_tree)?;
            return Ok(SyncOutcome {
                bookmarks_written: source_tree.bookmark_count(),
                seeded_metadata: true,
                ..Default::default()
            });
        };

        let target_tree = target.read()?;

        self.state = SyncState::Diffing;
        let source_changes = change_detector::detect_changes(&source_tree, &previous.bookmarks);
        let target_changes = change_detector::detect_changes(&target_tree, &previous.bookmarks);

        if source_changes.is_empty() && target_changes.is_empty() {
            return Ok(SyncOutcome {
                skipped: true,
                changes: Some(source_changes),
                ..Default::default()
            });
        }

        // The stores offer no partial-update primitive, so the full
        // source tree is written; the change set is reporting only.
        self.state = SyncState::Writing;
        target.write(&source_tree, true)?;
        self.update_metadata(metadata, &source_tree)?;

        Ok(SyncOutcome {
            bookmarks_written: source_tree.bookmark_count(),
            changes: Some(source_changes),
            ..Default::default()
        })
    }

    fn run_merge(
        &mut self,
        source: &mut dyn BookmarkStore,
        target: &mut dyn BookmarkStore,
        metadata: &mut dyn MetadataStore,
    ) -> Result<SyncOutcome, SyncError> {
        self.state = SyncState::Reading;
        let tree_a = source.read()?;
        validate_tree(&tree_a)?;
        let tree_b = target.read()?;
        validate_tree(&tree_b)?;

        self.state = SyncState::Diffing;
        let engine = MergeEngine::new(self.strategy, self.options);
        let (merged, report) =
            engine.merge(&tree_a, &tree_b, &self.source_label, &self.target_label);

        self.state = SyncState::Writing;
        target.write(&merged, true)?;
        source.write(&merged, true)?;
        self.update_metadata(metadata, &merged)?;

        Ok(SyncOutcome {
            bookmarks_written: merged.bookmark_count(),
            merge_report: Some(report),
            ..Default::default()
        })
    }

    /// Refreshes both keys' snapshots with the written tree's hashes.
    fn update_metadata(
        &self,
        metadata: &mut dyn MetadataStore,
        tree: &BookmarkTree,
    ) -> Result<(), SyncError> {
        let hashes = change_detector::tree_hashes(tree);
        let snapshot = SyncMetadata::new(now(), hashes);
        metadata.save(&self.source_key, &snapshot)?;
        metadata.save(&self.target_key, &snapshot)
    }
}

fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
