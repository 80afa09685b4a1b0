//! Errors raised by the file handler pipeline.

use b64vault_core::{ErrorMetadata, LogLevel};
use b64vault_storage::StorageError;

use crate::validator::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("Invalid base64 data: {0}")]
    InvalidEncoding(#[source] base64::DecodeError),

    #[error("Unable to determine MIME type: {0}")]
    MimeUndetermined(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Unknown disk: {0}")]
    UnknownDisk(String),

    #[error("Unable to create directory '{path}' on disk '{disk}'")]
    DirectoryCreateFailed {
        disk: String,
        path: String,
        #[source]
        source: StorageError,
    },

    #[error("Unable to store file to '{path}' on disk '{disk}'")]
    StorageWriteFailed {
        disk: String,
        path: String,
        #[source]
        source: StorageError,
    },
}

/// Static metadata for each variant: (http_status, error_code, recoverable, log_level).
fn handler_error_static_metadata(err: &HandlerError) -> (u16, &'static str, bool, LogLevel) {
    match err {
        HandlerError::InvalidEncoding(_) => (400, "INVALID_ENCODING", false, LogLevel::Debug),
        HandlerError::MimeUndetermined(_) => (422, "MIME_UNDETERMINED", false, LogLevel::Debug),
        HandlerError::Validation(ValidationError::ExtensionNotAllowed { .. }) => {
            (422, "EXTENSION_NOT_ALLOWED", false, LogLevel::Debug)
        }
        HandlerError::Validation(ValidationError::InvalidImageExtension { .. }) => {
            (422, "INVALID_IMAGE_EXTENSION", false, LogLevel::Debug)
        }
        HandlerError::UnknownDisk(_) => (400, "UNKNOWN_DISK", false, LogLevel::Debug),
        HandlerError::DirectoryCreateFailed { .. } => {
            (500, "DIRECTORY_CREATE_FAILED", true, LogLevel::Error)
        }
        HandlerError::StorageWriteFailed { .. } => {
            (500, "STORAGE_WRITE_FAILED", true, LogLevel::Error)
        }
    }
}

impl ErrorMetadata for HandlerError {
    fn http_status_code(&self) -> u16 {
        handler_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        handler_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        handler_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        handler_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            HandlerError::InvalidEncoding(_) => "Invalid base64 data".to_string(),
            HandlerError::MimeUndetermined(_) => "Unable to determine MIME type".to_string(),
            HandlerError::Validation(err) => err.to_string(),
            HandlerError::UnknownDisk(name) => format!("Unknown disk: {}", name),
            HandlerError::DirectoryCreateFailed { .. } => {
                "Unable to prepare the storage directory".to_string()
            }
            HandlerError::StorageWriteFailed { .. } => {
                "Unable to store file to the path".to_string()
            }
        }
    }
}
