//! Pre-write file backups.
//!
//! Copies store files into a backup directory under timestamped names
//! before a sync overwrites them. The engine itself never calls this;
//! restoring a backup is the recovery path for callers.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::types::errors::SyncError;

/// Manages timestamped copies of store files.
pub struct BackupManager {
    backup_dir: PathBuf,
}

impl BackupManager {
    pub fn new<P: AsRef<Path>>(backup_dir: P) -> Self {
        Self {
            backup_dir: backup_dir.as_ref().to_path_buf(),
        }
    }

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    /// Copies `source` into the backup directory as
    /// `<label>_<timestamp>_<filename>`. Returns the backup path.
    pub fn backup_file(&self, source: &Path, label: &str) -> Result<PathBuf, SyncError> {
        if !source.exists() {
            return Err(SyncError::SourceNotFound(format!(
                "cannot back up missing file: {}",
                source.display()
            )));
        }
        fs::create_dir_all(&self.backup_dir).map_err(|e| {
            SyncError::StorageError(format!("failed to create backup directory: {}", e))
        })?;
        let file_name = source
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "backup".to_string());
        let target = self
            .backup_dir
            .join(format!("{}_{}_{}", label, Self::now(), file_name));
        fs::copy(source, &target)
            .map_err(|e| SyncError::StorageError(format!("failed to copy backup: {}", e)))?;
        Ok(target)
    }

    /// Backups for a label, oldest first (timestamped names sort
    /// chronologically within one label).
    pub fn list_backups(&self, label: &str) -> Result<Vec<PathBuf>, SyncError> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }
        let prefix = format!("{}_", label);
        let mut backups: Vec<PathBuf> = fs::read_dir(&self.backup_dir)
            .map_err(|e| SyncError::StorageError(format!("failed to list backups: {}", e)))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .map(|n| n.to_string_lossy().starts_with(&prefix))
                    .unwrap_or(false)
            })
            .collect();
        backups.sort();
        Ok(backups)
    }

    /// Deletes all but the `keep` most recent backups for a label.
    /// Returns how many were removed.
    pub fn prune(&self, label: &str, keep: usize) -> Result<usize, SyncError> {
        let backups = self.list_backups(label)?;
        if backups.len() <= keep {
            return Ok(0);
        }
        let excess = backups.len() - keep;
        for path in &backups[..excess] {
            fs::remove_file(path).map_err(|e| {
                SyncError::StorageError(format!("failed to remove old backup: {}", e))
            })?;
        }
        Ok(excess)
    }
}
