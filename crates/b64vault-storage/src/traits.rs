//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use b64vault_core::{ErrorMetadata, LogLevel};
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Directory creation failed: {0}")]
    DirectoryFailed(String),

    #[error("Unknown disk: {0}")]
    UnknownDisk(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl ErrorMetadata for StorageError {
    fn http_status_code(&self) -> u16 {
        match self {
            StorageError::UnknownDisk(_) | StorageError::InvalidKey(_) => 400,
            _ => 500,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            StorageError::WriteFailed(_) => "STORAGE_WRITE_FAILED",
            StorageError::DirectoryFailed(_) => "DIRECTORY_CREATE_FAILED",
            StorageError::UnknownDisk(_) => "UNKNOWN_DISK",
            StorageError::InvalidKey(_) => "INVALID_STORAGE_KEY",
            StorageError::BackendError(_) | StorageError::IoError(_) => "STORAGE_ERROR",
            StorageError::ConfigError(_) => "STORAGE_CONFIG_ERROR",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(
            self,
            StorageError::WriteFailed(_)
                | StorageError::DirectoryFailed(_)
                | StorageError::BackendError(_)
                | StorageError::IoError(_)
        )
    }

    fn client_message(&self) -> String {
        match self {
            StorageError::UnknownDisk(name) => format!("Unknown disk: {}", name),
            StorageError::InvalidKey(msg) => msg.clone(),
            _ => "Failed to access storage".to_string(),
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            StorageError::WriteFailed(_)
            | StorageError::DirectoryFailed(_)
            | StorageError::ConfigError(_) => LogLevel::Error,
            // Usually transient (timeouts, throttling); the caller may retry
            StorageError::BackendError(_) | StorageError::IoError(_) => LogLevel::Warn,
            StorageError::UnknownDisk(_) | StorageError::InvalidKey(_) => LogLevel::Debug,
        }
    }
}

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem, memory) must implement this trait.
/// The file handler only ever needs these three capabilities, so it can write to
/// any backend without coupling to specific implementation details.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Check if a file or directory exists at the given key
    async fn exists(&self, path: &str) -> StorageResult<bool>;

    /// Create a directory (and its parents). Succeeds if it already exists.
    async fn make_directory(&self, path: &str) -> StorageResult<()>;

    /// Write the full contents of a file, replacing any previous contents
    async fn put(&self, path: &str, data: Vec<u8>) -> StorageResult<()>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_backend_failures_are_recoverable() {
        assert!(StorageError::WriteFailed("disk full".into()).is_recoverable());
        assert!(StorageError::BackendError("timeout".into()).is_recoverable());
        assert!(!StorageError::UnknownDisk("nope".into()).is_recoverable());
        assert!(!StorageError::InvalidKey("../x".into()).is_recoverable());
    }

    #[test]
    fn unknown_disk_is_a_client_error() {
        let err = StorageError::UnknownDisk("archive".into());
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.error_code(), "UNKNOWN_DISK");
        assert_eq!(err.client_message(), "Unknown disk: archive");
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn log_levels_follow_failure_kind() {
        assert_eq!(
            StorageError::BackendError("throttled".into()).log_level(),
            LogLevel::Warn
        );
        assert_eq!(
            StorageError::IoError(std::io::Error::other("reset")).log_level(),
            LogLevel::Warn
        );
        assert_eq!(
            StorageError::DirectoryFailed("read-only".into()).log_level(),
            LogLevel::Error
        );
        assert_eq!(
            StorageError::ConfigError("no bucket".into()).log_level(),
            LogLevel::Error
        );
        assert_eq!(
            StorageError::InvalidKey("../x".into()).log_level(),
            LogLevel::Debug
        );
    }

    #[test]
    fn backend_details_are_hidden_from_clients() {
        let err = StorageError::WriteFailed("/var/lib/secret: permission denied".into());
        assert_eq!(err.client_message(), "Failed to access storage");
        assert_eq!(err.log_level(), LogLevel::Error);
    }
}
