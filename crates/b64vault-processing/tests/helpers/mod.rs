#![allow(dead_code)]

use std::sync::Arc;

use b64vault_core::HandlerConfig;
use b64vault_processing::Base64FileHandler;
use b64vault_storage::{Disks, LocalStorage, MemoryStorage};
use base64::{engine::general_purpose, Engine as _};
use tempfile::TempDir;

/// 1x1 transparent PNG
pub const PNG_B64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

pub fn png_bytes() -> Vec<u8> {
    general_purpose::STANDARD
        .decode(PNG_B64)
        .expect("fixture is valid base64")
}

/// `data:<mime>;base64,<payload>` for the given bytes
pub fn data_uri(bytes: &[u8], mime: &str) -> String {
    format!(
        "data:{};base64,{}",
        mime,
        general_purpose::STANDARD.encode(bytes)
    )
}

/// Handler backed by two in-memory disks, "public" (default) and "custom"
pub struct MemoryApp {
    pub handler: Base64FileHandler,
    pub public: MemoryStorage,
    pub custom: MemoryStorage,
}

pub fn memory_app(config: HandlerConfig) -> MemoryApp {
    let public = MemoryStorage::new();
    let custom = MemoryStorage::new();
    let disks = Disks::new()
        .with_disk("public", Arc::new(public.clone()))
        .with_disk("custom", Arc::new(custom.clone()));

    MemoryApp {
        handler: Base64FileHandler::new(config, disks),
        public,
        custom,
    }
}

/// Handler writing to a local "public" disk rooted in a temporary directory
pub struct LocalApp {
    pub handler: Base64FileHandler,
    pub _temp_dir: TempDir,
}

impl LocalApp {
    pub fn root(&self) -> &std::path::Path {
        self._temp_dir.path()
    }
}

pub async fn local_app(config: HandlerConfig) -> LocalApp {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let storage = LocalStorage::new(temp_dir.path())
        .await
        .expect("Failed to create local storage");
    let disks = Disks::new().with_disk("public", Arc::new(storage));

    LocalApp {
        handler: Base64FileHandler::new(config, disks),
        _temp_dir: temp_dir,
    }
}
