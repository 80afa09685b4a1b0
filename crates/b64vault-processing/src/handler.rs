//! Base64 file handler
//!
//! Orchestrates decode → sniff → validate → name → persist for a single payload.
//! The handler holds only immutable configuration and shared backends, so one
//! instance can serve concurrent callers.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;

use b64vault_core::{normalize_extensions, FileDescriptor, HandlerConfig, StorageTarget};
use b64vault_storage::{Disks, StorageError};

use crate::classifier::{classifier_for, ContentClassifier};
use crate::decoder::DecodedPayload;
use crate::error::HandlerError;
use crate::path_builder::build_path;
use crate::sniffer::{extension_from_mime, sniff};
use crate::validator::{check_allowed, check_is_image};

/// Per-call overrides for [`Base64FileHandler::store`].
///
/// Unset fields fall back to the handler configuration.
#[derive(Debug, Clone, Default)]
pub struct StoreOptions {
    pub disk: Option<String>,
    pub path: Option<String>,
    pub original_name: Option<String>,
    pub allowed_extensions: Option<BTreeSet<String>>,
}

impl StoreOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_disk(mut self, disk: impl Into<String>) -> Self {
        self.disk = Some(disk.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_original_name(mut self, name: impl Into<String>) -> Self {
        self.original_name = Some(name.into());
        self
    }

    pub fn with_allowed_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allowed_extensions = Some(normalize_extensions(extensions));
        self
    }
}

pub struct Base64FileHandler {
    config: HandlerConfig,
    disks: Disks,
    classifier: Arc<dyn ContentClassifier>,
}

impl Base64FileHandler {
    /// Create a handler using the classifier selected in `config`.
    pub fn new(config: HandlerConfig, disks: Disks) -> Self {
        let classifier = classifier_for(config.classifier);
        Self {
            config,
            disks,
            classifier,
        }
    }

    /// Replace the content classifier.
    pub fn with_classifier(mut self, classifier: Arc<dyn ContentClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    pub fn disks(&self) -> &Disks {
        &self.disks
    }

    /// Decode, validate and persist a payload.
    ///
    /// Returns the relative path the file was written to on the resolved disk.
    /// Nothing is created or written unless decoding, sniffing and the allow-list
    /// check all succeed.
    #[tracing::instrument(skip(self, input, options), fields(input_len = input.len()))]
    pub async fn store(&self, input: &str, options: StoreOptions) -> Result<String, HandlerError> {
        let start = Instant::now();

        let disk_name = options.disk.as_deref().unwrap_or(&self.config.disk);
        let base_path = options.path.as_deref().unwrap_or(&self.config.path);
        let allowed = options
            .allowed_extensions
            .as_ref()
            .unwrap_or(&self.config.allowed_extensions);

        let payload = DecodedPayload::parse(input)?;
        let mime = sniff(&payload, self.classifier.as_ref())?;
        let extension = extension_from_mime(&mime);

        tracing::debug!(
            mime = %mime,
            extension = %extension,
            size_bytes = payload.data.len(),
            "Payload decoded"
        );

        check_allowed(extension, allowed)?;

        if !self.disks.contains(disk_name) {
            return Err(HandlerError::UnknownDisk(disk_name.to_string()));
        }

        let target = StorageTarget::new(
            disk_name,
            build_path(base_path, extension, options.original_name.as_deref()),
        );

        let directory = target.directory();
        if !directory.is_empty() {
            let directory_failed = |source: StorageError| {
                tracing::error!(
                    disk = %target.disk_name,
                    directory = %directory,
                    error = %source,
                    "Failed to prepare storage directory"
                );
                HandlerError::DirectoryCreateFailed {
                    disk: target.disk_name.clone(),
                    path: directory.to_string(),
                    source,
                }
            };

            let exists = self
                .disks
                .exists(&target.disk_name, directory)
                .await
                .map_err(directory_failed)?;
            if !exists {
                self.disks
                    .make_directory(&target.disk_name, directory)
                    .await
                    .map_err(directory_failed)?;
            }
        }

        let size_bytes = payload.data.len();
        self.disks
            .put(&target.disk_name, &target.relative_path, payload.data)
            .await
            .map_err(|source| {
                tracing::error!(
                    disk = %target.disk_name,
                    path = %target.relative_path,
                    error = %source,
                    "Failed to store file"
                );
                HandlerError::StorageWriteFailed {
                    disk: target.disk_name.clone(),
                    path: target.relative_path.clone(),
                    source,
                }
            })?;

        tracing::info!(
            disk = %target.disk_name,
            path = %target.relative_path,
            size_bytes = size_bytes,
            duration_ms = start.elapsed().as_millis() as u64,
            "File stored"
        );

        Ok(target.relative_path)
    }

    /// Decode and describe a payload without touching storage.
    pub fn get_file_info(&self, input: &str) -> Result<FileDescriptor, HandlerError> {
        let payload = DecodedPayload::parse(input)?;
        let mime_type = sniff(&payload, self.classifier.as_ref())?;
        let extension = extension_from_mime(&mime_type).to_string();

        Ok(FileDescriptor {
            mime_type,
            extension,
            size_bytes: payload.data.len(),
            data: payload.data,
        })
    }

    /// Check that a payload decodes and sniffs to an image extension.
    ///
    /// Returns `Ok(true)` on success; every failure is an error, never `Ok(false)`.
    /// `valid_extensions` replaces the configured image set for this call.
    pub fn is_valid_image(
        &self,
        input: &str,
        valid_extensions: Option<&BTreeSet<String>>,
    ) -> Result<bool, HandlerError> {
        let payload = DecodedPayload::parse(input)?;
        let mime = sniff(&payload, self.classifier.as_ref())?;
        let extension = extension_from_mime(&mime);

        let images = valid_extensions.unwrap_or(&self.config.valid_image_extensions);
        check_is_image(extension, images)?;

        tracing::debug!(mime = %mime, extension = %extension, "Payload is a valid image");
        Ok(true)
    }
}

impl std::fmt::Debug for Base64FileHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Base64FileHandler")
            .field("config", &self.config)
            .field("disks", &self.disks)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use b64vault_storage::MemoryStorage;

    const PNG_B64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    fn handler() -> (Base64FileHandler, MemoryStorage) {
        let storage = MemoryStorage::new();
        let disks = Disks::new().with_disk("public", Arc::new(storage.clone()));
        (Base64FileHandler::new(HandlerConfig::default(), disks), storage)
    }

    #[test]
    fn test_store_options_builder_normalizes_extensions() {
        let options = StoreOptions::new()
            .with_disk("custom")
            .with_path("docs/")
            .with_original_name("report.pdf")
            .with_allowed_extensions([" PDF ", "png"]);

        assert_eq!(options.disk.as_deref(), Some("custom"));
        assert_eq!(options.path.as_deref(), Some("docs/"));
        assert_eq!(options.original_name.as_deref(), Some("report.pdf"));
        assert_eq!(
            options.allowed_extensions,
            Some(BTreeSet::from(["pdf".to_string(), "png".to_string()]))
        );
    }

    #[tokio::test]
    async fn test_store_writes_under_configured_path() {
        let (handler, storage) = handler();
        let path = handler.store(PNG_B64, StoreOptions::new()).await.unwrap();

        assert!(path.starts_with("uploads/"));
        assert!(path.ends_with(".png"));
        assert_eq!(storage.files(), vec![path]);
        assert_eq!(storage.directories(), vec!["uploads".to_string()]);
    }

    #[tokio::test]
    async fn test_store_at_disk_root_skips_directory() {
        let (handler, storage) = handler();
        let path = handler
            .store(PNG_B64, StoreOptions::new().with_path(""))
            .await
            .unwrap();

        assert!(!path.contains('/'));
        assert!(storage.directories().is_empty());
        assert_eq!(storage.files().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_disk_has_no_side_effects() {
        let (handler, storage) = handler();
        let err = handler
            .store(PNG_B64, StoreOptions::new().with_disk("archive"))
            .await
            .unwrap_err();

        assert!(matches!(err, HandlerError::UnknownDisk(name) if name == "archive"));
        assert!(storage.files().is_empty());
        assert!(storage.directories().is_empty());
    }

    /// Records every storage call it receives, in order.
    #[derive(Default)]
    struct RecordingStorage {
        calls: std::sync::Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl b64vault_storage::Storage for RecordingStorage {
        async fn exists(&self, path: &str) -> b64vault_storage::StorageResult<bool> {
            self.calls.lock().unwrap().push(format!("exists {path}"));
            Ok(false)
        }

        async fn make_directory(&self, path: &str) -> b64vault_storage::StorageResult<()> {
            self.calls.lock().unwrap().push(format!("make_directory {path}"));
            Ok(())
        }

        async fn put(&self, path: &str, _data: Vec<u8>) -> b64vault_storage::StorageResult<()> {
            self.calls.lock().unwrap().push(format!("put {path}"));
            Ok(())
        }

        fn backend_type(&self) -> b64vault_storage::StorageBackend {
            b64vault_storage::StorageBackend::Memory
        }
    }

    #[tokio::test]
    async fn test_store_addresses_the_resolved_disk() {
        let public = Arc::new(RecordingStorage::default());
        let custom = Arc::new(RecordingStorage::default());
        let disks = Disks::new()
            .with_disk("public", public.clone())
            .with_disk("custom", custom.clone());
        let handler = Base64FileHandler::new(HandlerConfig::default(), disks);

        let path = handler
            .store(PNG_B64, StoreOptions::new().with_disk("custom"))
            .await
            .unwrap();

        assert_eq!(
            *custom.calls.lock().unwrap(),
            vec![
                "exists uploads".to_string(),
                "make_directory uploads".to_string(),
                format!("put {path}"),
            ]
        );
        assert!(public.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_get_file_info_sniffs_raw_png() {
        let (handler, _) = handler();
        let info = handler.get_file_info(PNG_B64).unwrap();

        assert_eq!(info.mime_type, "image/png");
        assert_eq!(info.extension, "png");
        assert_eq!(info.size_bytes, info.data.len());
    }

    #[test]
    fn test_is_valid_image_override_set() {
        let (handler, _) = handler();
        assert!(handler.is_valid_image(PNG_B64, None).unwrap());

        let pdf_only = BTreeSet::from(["pdf".to_string()]);
        assert!(matches!(
            handler.is_valid_image(PNG_B64, Some(&pdf_only)),
            Err(HandlerError::Validation(_))
        ));
    }
}
