//! Named disk registry
//!
//! Maps logical disk names (e.g. "public") to storage backends and exposes the
//! disk-addressed operations the file handler calls: exists, make_directory and put.

use crate::traits::{Storage, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::Arc;

/// Immutable set of named storage disks.
#[derive(Clone, Default)]
pub struct Disks {
    disks: HashMap<String, Arc<dyn Storage>>,
}

impl Disks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a disk under `name`, replacing any previous disk with that name.
    pub fn with_disk(mut self, name: impl Into<String>, storage: Arc<dyn Storage>) -> Self {
        self.disks.insert(name.into(), storage);
        self
    }

    /// Look up a disk by name
    pub fn disk(&self, name: &str) -> StorageResult<Arc<dyn Storage>> {
        self.disks
            .get(name)
            .cloned()
            .ok_or_else(|| StorageError::UnknownDisk(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.disks.contains_key(name)
    }

    /// Registered disk names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.disks.keys().cloned().collect();
        names.sort();
        names
    }

    pub async fn exists(&self, disk: &str, path: &str) -> StorageResult<bool> {
        self.disk(disk)?.exists(path).await
    }

    pub async fn make_directory(&self, disk: &str, path: &str) -> StorageResult<()> {
        self.disk(disk)?.make_directory(path).await
    }

    pub async fn put(&self, disk: &str, path: &str, data: Vec<u8>) -> StorageResult<()> {
        self.disk(disk)?.put(path, data).await
    }
}

impl std::fmt::Debug for Disks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Disks").field("names", &self.names()).finish()
    }
}
