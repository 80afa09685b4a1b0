//! Configuration module
//!
//! This module provides the handler defaults (disk, path, extension lists,
//! content classifier) and the declaration of the named storage disks.
//! Both are read once from the environment and never mutated afterwards;
//! per-call overrides are passed alongside each operation instead.

use std::collections::BTreeSet;
use std::env;
use std::str::FromStr;

use crate::storage_types::StorageBackend;

// Common constants
pub const DEFAULT_DISK: &str = "public";
pub const DEFAULT_PATH: &str = "uploads/";
const VALID_IMAGE_EXTENSIONS: [&str; 5] = ["jpeg", "jpg", "png", "gif", "webp"];
const ENV_PREFIX: &str = "B64VAULT";

/// Parse a comma separated extension list into a normalized set.
///
/// Entries are trimmed, lowercased and stripped of a leading dot; blanks are dropped,
/// so an empty string yields an empty set.
pub fn parse_extension_list(raw: &str) -> BTreeSet<String> {
    normalize_extensions(raw.split(','))
}

/// The image extensions accepted by image validation unless overridden.
pub fn default_valid_image_extensions() -> BTreeSet<String> {
    VALID_IMAGE_EXTENSIONS
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

/// Which content classifier inspects payloads that carry no data-URI header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassifierKind {
    /// Magic-byte signatures via the `infer` crate
    #[default]
    Infer,
    /// The host `file --mime-type` command
    FileCommand,
}

impl FromStr for ClassifierKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "infer" => Ok(ClassifierKind::Infer),
            "file" => Ok(ClassifierKind::FileCommand),
            _ => Err(anyhow::anyhow!("Invalid content classifier: {}", s)),
        }
    }
}

/// Defaults applied by the file handler when a call does not override them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HandlerConfig {
    pub disk: String,
    pub path: String,
    /// Empty means every extension is allowed
    pub allowed_extensions: BTreeSet<String>,
    pub valid_image_extensions: BTreeSet<String>,
    pub classifier: ClassifierKind,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            disk: DEFAULT_DISK.to_string(),
            path: DEFAULT_PATH.to_string(),
            allowed_extensions: BTreeSet::new(),
            valid_image_extensions: default_valid_image_extensions(),
            classifier: ClassifierKind::default(),
        }
    }
}

impl HandlerConfig {
    pub fn with_disk(mut self, disk: impl Into<String>) -> Self {
        self.disk = disk.into();
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_allowed_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allowed_extensions = normalize_extensions(extensions);
        self
    }

    pub fn with_valid_image_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.valid_image_extensions = normalize_extensions(extensions);
        self
    }

    pub fn with_classifier(mut self, classifier: ClassifierKind) -> Self {
        self.classifier = classifier;
        self
    }
}

/// Normalize extension entries: trimmed, lowercased, no leading dot, blanks dropped.
pub fn normalize_extensions<I, S>(extensions: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    extensions
        .into_iter()
        .map(|ext| ext.as_ref().trim().trim_start_matches('.').to_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}

/// Declaration of one named disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiskConfig {
    pub name: String,
    pub backend: StorageBackend,
    /// Root directory for local disks
    pub root: Option<String>,
    pub bucket: Option<String>,
    pub region: Option<String>,
    /// Custom endpoint for S3-compatible providers (MinIO, DigitalOcean Spaces, etc.)
    pub endpoint: Option<String>,
}

impl DiskConfig {
    pub fn local(name: impl Into<String>, root: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            backend: StorageBackend::Local,
            root: Some(root.into()),
            bucket: None,
            region: None,
            endpoint: None,
        }
    }

    pub fn memory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            backend: StorageBackend::Memory,
            root: None,
            bucket: None,
            region: None,
            endpoint: None,
        }
    }

    pub fn s3(
        name: impl Into<String>,
        bucket: impl Into<String>,
        region: impl Into<String>,
        endpoint: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            backend: StorageBackend::S3,
            root: None,
            bucket: Some(bucket.into()),
            region: Some(region.into()),
            endpoint,
        }
    }
}

/// Application configuration: handler defaults plus the disks they can target.
#[derive(Clone, Debug)]
pub struct Config {
    pub handler: HandlerConfig,
    pub disks: Vec<DiskConfig>,
}

impl Config {
    pub fn new(handler: HandlerConfig, disks: Vec<DiskConfig>) -> Self {
        Self { handler, disks }
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// `from_env` delegates here; tests pass a map so they never touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |suffix: &str| {
            lookup(&format!("{}_{}", ENV_PREFIX, suffix)).filter(|s| !s.trim().is_empty())
        };

        let disk = var("DISK")
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| DEFAULT_DISK.to_string());

        let classifier = match var("CLASSIFIER") {
            Some(raw) => raw.parse()?,
            None => ClassifierKind::default(),
        };

        let handler = HandlerConfig {
            disk: disk.clone(),
            path: var("PATH").unwrap_or_else(|| DEFAULT_PATH.to_string()),
            allowed_extensions: var("ALLOWED_EXTENSIONS")
                .map(|s| parse_extension_list(&s))
                .unwrap_or_default(),
            valid_image_extensions: var("VALID_IMAGE_EXTENSIONS")
                .map(|s| parse_extension_list(&s))
                .unwrap_or_else(default_valid_image_extensions),
            classifier,
        };

        let disk_names: Vec<String> = var("DISKS")
            .unwrap_or_else(|| disk.clone())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let aws_region = lookup("AWS_REGION");
        let mut disks = Vec::with_capacity(disk_names.len());
        for name in disk_names {
            let key = disk_env_key(&name);
            let disk_var = |field: &str| var(&format!("DISK_{}_{}", key, field));

            let backend = match disk_var("DRIVER") {
                Some(raw) => raw.parse()?,
                None => StorageBackend::Local,
            };

            let root = match backend {
                StorageBackend::Local => {
                    Some(disk_var("ROOT").unwrap_or_else(|| format!("storage/{}", name)))
                }
                _ => disk_var("ROOT"),
            };

            disks.push(DiskConfig {
                backend,
                root,
                bucket: disk_var("BUCKET"),
                region: disk_var("REGION").or_else(|| aws_region.clone()),
                endpoint: disk_var("ENDPOINT"),
                name,
            });
        }

        let config = Config { handler, disks };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.handler.disk.trim().is_empty() {
            return Err(anyhow::anyhow!("B64VAULT_DISK must not be empty"));
        }

        let mut seen = BTreeSet::new();
        for disk in &self.disks {
            if !seen.insert(disk.name.as_str()) {
                return Err(anyhow::anyhow!("Disk '{}' is declared twice", disk.name));
            }

            match disk.backend {
                StorageBackend::S3 => {
                    if disk.bucket.is_none() {
                        return Err(anyhow::anyhow!(
                            "B64VAULT_DISK_{}_BUCKET must be set when using S3 storage backend",
                            disk_env_key(&disk.name)
                        ));
                    }
                    if disk.region.is_none() {
                        return Err(anyhow::anyhow!(
                            "B64VAULT_DISK_{}_REGION or AWS_REGION must be set when using S3 storage backend",
                            disk_env_key(&disk.name)
                        ));
                    }
                }
                StorageBackend::Local => {
                    if disk.root.is_none() {
                        return Err(anyhow::anyhow!(
                            "B64VAULT_DISK_{}_ROOT must be set when using local storage backend",
                            disk_env_key(&disk.name)
                        ));
                    }
                }
                StorageBackend::Memory => {}
            }
        }

        if !seen.contains(self.handler.disk.as_str()) {
            return Err(anyhow::anyhow!(
                "Default disk '{}' is not listed in B64VAULT_DISKS",
                self.handler.disk
            ));
        }

        Ok(())
    }

    // Convenience getters for common fields
    pub fn handler(&self) -> &HandlerConfig {
        &self.handler
    }

    pub fn disks(&self) -> &[DiskConfig] {
        &self.disks
    }

    pub fn disk(&self, name: &str) -> Option<&DiskConfig> {
        self.disks.iter().find(|d| d.name == name)
    }
}

/// Environment key fragment for a disk name: `my-disk` becomes `MY_DISK`.
fn disk_env_key(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}
