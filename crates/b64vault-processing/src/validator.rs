use std::collections::BTreeSet;

/// Extension validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("File extension not allowed: {extension} (allowed: {allowed:?})")]
    ExtensionNotAllowed {
        extension: String,
        allowed: Vec<String>,
    },

    #[error("Invalid image file extension: {extension} (allowed: {allowed:?})")]
    InvalidImageExtension {
        extension: String,
        allowed: Vec<String>,
    },
}

/// Validate an extension against an allow-list.
///
/// An empty allow-list places no restriction.
pub fn check_allowed(
    extension: &str,
    allowed_extensions: &BTreeSet<String>,
) -> Result<(), ValidationError> {
    if allowed_extensions.is_empty() || allowed_extensions.contains(extension) {
        return Ok(());
    }

    Err(ValidationError::ExtensionNotAllowed {
        extension: extension.to_string(),
        allowed: allowed_extensions.iter().cloned().collect(),
    })
}

/// Validate that an extension belongs to the image extension set.
///
/// Unlike [`check_allowed`], an empty set rejects everything.
pub fn check_is_image(
    extension: &str,
    image_extensions: &BTreeSet<String>,
) -> Result<(), ValidationError> {
    if image_extensions.contains(extension) {
        return Ok(());
    }

    Err(ValidationError::InvalidImageExtension {
        extension: extension.to_string(),
        allowed: image_extensions.iter().cloned().collect(),
    })
}
