//! In-process storage backend.
//!
//! Keeps files and directories in memory. Backs the `memory` disk driver and
//! serves as the storage double in tests, where it can also be told to fail.

use crate::keys::normalize_key;
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

#[derive(Default)]
struct MemoryState {
    files: BTreeMap<String, Vec<u8>>,
    directories: BTreeSet<String>,
}

/// Memory storage implementation
#[derive(Clone, Default)]
pub struct MemoryStorage {
    state: Arc<RwLock<MemoryState>>,
    fail_writes: Arc<AtomicBool>,
    fail_directories: Arc<AtomicBool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `put` fail with `WriteFailed`.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `make_directory` fail with `DirectoryFailed`.
    pub fn fail_directories(&self, fail: bool) {
        self.fail_directories.store(fail, Ordering::SeqCst);
    }

    /// Contents of a stored file
    pub fn get(&self, path: &str) -> Option<Vec<u8>> {
        let key = normalize_key(path).ok()?;
        self.read_state().ok()?.files.get(key).cloned()
    }

    /// Keys of all stored files, sorted
    pub fn files(&self) -> Vec<String> {
        self.read_state()
            .map(|state| state.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Directories created explicitly through `make_directory`, sorted
    pub fn directories(&self) -> Vec<String> {
        self.read_state()
            .map(|state| state.directories.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn read_state(&self) -> StorageResult<std::sync::RwLockReadGuard<'_, MemoryState>> {
        self.state
            .read()
            .map_err(|_| StorageError::BackendError("memory storage lock poisoned".to_string()))
    }

    fn write_state(&self) -> StorageResult<std::sync::RwLockWriteGuard<'_, MemoryState>> {
        self.state
            .write()
            .map_err(|_| StorageError::BackendError("memory storage lock poisoned".to_string()))
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn exists(&self, path: &str) -> StorageResult<bool> {
        let key = normalize_key(path)?;
        let state = self.read_state()?;

        if state.files.contains_key(key) || state.directories.contains(key) {
            return Ok(true);
        }

        // A directory also exists implicitly once something is stored below it
        let prefix = format!("{}/", key);
        Ok(state.files.keys().any(|k| k.starts_with(&prefix)))
    }

    async fn make_directory(&self, path: &str) -> StorageResult<()> {
        let key = normalize_key(path)?;
        if self.fail_directories.load(Ordering::SeqCst) {
            return Err(StorageError::DirectoryFailed(format!(
                "Failed to create directory {}",
                key
            )));
        }

        self.write_state()?.directories.insert(key.to_string());
        Ok(())
    }

    async fn put(&self, path: &str, data: Vec<u8>) -> StorageResult<()> {
        let key = normalize_key(path)?;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::WriteFailed(format!(
                "Failed to write file {}",
                key
            )));
        }

        let size = data.len();
        self.write_state()?.files.insert(key.to_string(), data);

        tracing::debug!(key = %key, size_bytes = size, "Memory storage write successful");
        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}
