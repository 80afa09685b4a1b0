//! Shared key validation for storage backends.
//!
//! Keys are relative `/`-separated paths. All backends reject the same shapes.

use crate::traits::{StorageError, StorageResult};

/// Validate a storage key and return it without leading or trailing separators.
///
/// Rejects keys containing `..` segments or starting with `/`.
pub fn normalize_key(key: &str) -> StorageResult<&str> {
    if key.starts_with('/') || key.split('/').any(|segment| segment == "..") {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(key.trim_end_matches('/'))
}
