#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
use crate::{Disks, MemoryStorage, Storage, StorageBackend, StorageError, StorageResult};
use b64vault_core::{Config, DiskConfig};
use std::sync::Arc;

/// Create every disk declared in the configuration
pub async fn create_disks(config: &Config) -> StorageResult<Disks> {
    let mut disks = Disks::new();
    for disk in config.disks() {
        let storage = create_storage(disk).await?;
        tracing::debug!(
            disk = %disk.name,
            backend = %disk.backend,
            "Storage disk configured"
        );
        disks = disks.with_disk(disk.name.clone(), storage);
    }
    Ok(disks)
}

/// Create a single storage backend from its disk declaration
pub async fn create_storage(disk: &DiskConfig) -> StorageResult<Arc<dyn Storage>> {
    match disk.backend {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let bucket = disk.bucket.clone().ok_or_else(|| {
                StorageError::ConfigError(format!("Bucket not configured for disk {}", disk.name))
            })?;
            let region = disk.region.clone().ok_or_else(|| {
                StorageError::ConfigError(format!("Region not configured for disk {}", disk.name))
            })?;

            let storage = S3Storage::new(bucket, region, disk.endpoint.clone()).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let root = disk.root.clone().ok_or_else(|| {
                StorageError::ConfigError(format!("Root not configured for disk {}", disk.name))
            })?;

            let storage = LocalStorage::new(root).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),

        StorageBackend::Memory => Ok(Arc::new(MemoryStorage::new())),
    }
}
