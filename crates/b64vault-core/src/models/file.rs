//! Values produced by the decode pipeline.

use serde::Serialize;

/// Description of a decoded payload, returned by the inspect operation.
///
/// `data` holds the decoded bytes and is left out of serialized output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDescriptor {
    pub mime_type: String,
    pub extension: String,
    pub size_bytes: usize,
    #[serde(skip)]
    pub data: Vec<u8>,
}

/// Where a decoded file is written: a named disk and a path relative to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageTarget {
    pub disk_name: String,
    pub relative_path: String,
}

impl StorageTarget {
    pub fn new(disk_name: impl Into<String>, relative_path: impl Into<String>) -> Self {
        Self {
            disk_name: disk_name.into(),
            relative_path: relative_path.into(),
        }
    }

    /// Directory portion of the relative path, without a trailing separator.
    /// Empty when the file sits at the disk root.
    pub fn directory(&self) -> &str {
        match self.relative_path.rsplit_once('/') {
            Some((dir, _)) => dir,
            None => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_of_nested_path() {
        let target = StorageTarget::new("public", "uploads/avatars/me_1700000000.png");
        assert_eq!(target.directory(), "uploads/avatars");
    }

    #[test]
    fn directory_of_root_file_is_empty() {
        let target = StorageTarget::new("public", "me_1700000000.png");
        assert_eq!(target.directory(), "");
    }

    #[test]
    fn descriptor_serialization_omits_data() {
        let descriptor = FileDescriptor {
            mime_type: "text/plain".to_string(),
            extension: "txt".to_string(),
            size_bytes: 5,
            data: b"hello".to_vec(),
        };
        let json = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(json["mime_type"], "text/plain");
        assert_eq!(json["size_bytes"], 5);
        assert!(json.get("data").is_none());
    }
}
