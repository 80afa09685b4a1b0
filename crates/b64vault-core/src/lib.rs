//! b64vault Core Library
//!
//! This crate provides configuration, shared models and error metadata
//! used by the storage, processing and CLI crates.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{
    default_valid_image_extensions, normalize_extensions, parse_extension_list, ClassifierKind,
    Config, DiskConfig, HandlerConfig,
};
pub use error::{ErrorMetadata, LogLevel};
pub use models::{FileDescriptor, StorageTarget};
// Note: Storage, StorageError, StorageResult live in the b64vault-storage crate
pub use storage_types::StorageBackend;
