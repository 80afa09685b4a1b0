//! b64vault Storage Library
//!
//! This crate provides the storage abstraction the file handler writes into.
//! It includes the Storage trait, implementations for S3, the local filesystem
//! and process memory, and the [`Disks`] registry that addresses them by name.
//!
//! # Key format
//!
//! Paths are relative, `/`-separated keys such as `uploads/avatar_1700000000.png`.
//! Keys must not contain `..` or a leading `/`; the check is centralized in the
//! `keys` module so all backends stay consistent.

pub mod disks;
pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod memory;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use b64vault_core::StorageBackend;
pub use disks::Disks;
pub use factory::create_disks;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use memory::MemoryStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
