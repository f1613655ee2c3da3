//! Tree validation run before a tree is merged or written.

use crate::types::bookmark::BookmarkTree;
use crate::types::errors::SyncError;

/// Checks that a URL has a scheme and a host.
pub fn is_valid_url(url: &str) -> bool {
    let Some(scheme_end) = url.find("://") else {
        return false;
    };
    if scheme_end == 0 {
        return false;
    }
    let rest = &url[scheme_end + 3..];
    let host = rest.split(['/', '?', '#']).next().unwrap_or("");
    !host.is_empty()
}

/// Validates every bookmark in a tree.
///
/// Fails with `CorruptedData` on an empty or malformed URL, or a title
/// containing control characters. An empty title is allowed.
pub fn validate_tree(tree: &BookmarkTree) -> Result<(), SyncError> {
    for bookmark in tree.all_bookmarks() {
        if !is_valid_url(&bookmark.url) {
            return Err(SyncError::CorruptedData(format!(
                "invalid URL in bookmark: {:?}",
                bookmark.url
            )));
        }
        if bookmark.title.chars().any(|c| c.is_control()) {
            return Err(SyncError::CorruptedData(format!(
                "malformed title for bookmark: {}",
                bookmark.url
            )));
        }
    }
    Ok(())
}
