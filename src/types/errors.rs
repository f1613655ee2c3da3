use std::fmt;

/// Errors surfaced by the sync engine and its storage adapters.
///
/// All failures are local to the current sync attempt; the engine never
/// retries on its own.
#[derive(Debug)]
pub enum SyncError {
    /// A requested source or profile does not exist.
    SourceNotFound(String),
    /// The underlying store is in use by its owning application.
    SourceLocked(String),
    /// A tree failed validation before being merged or written.
    CorruptedData(String),
    /// A resolution policy, merge strategy, or sync mode is unknown.
    ConflictUnresolved(String),
    /// A storage adapter read or write failed.
    StorageError(String),
    /// The metadata store could not be read or written.
    MetadataError(String),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::SourceNotFound(msg) => write!(f, "Source not found: {}", msg),
            SyncError::SourceLocked(msg) => write!(f, "Source is locked: {}", msg),
            SyncError::CorruptedData(msg) => write!(f, "Corrupted bookmark data: {}", msg),
            SyncError::ConflictUnresolved(msg) => {
                write!(f, "Unresolvable configuration: {}", msg)
            }
            SyncError::StorageError(msg) => write!(f, "Storage error: {}", msg),
            SyncError::MetadataError(msg) => write!(f, "Sync metadata error: {}", msg),
        }
    }
}

impl std::error::Error for SyncError {}
