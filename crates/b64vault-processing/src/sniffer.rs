//! MIME type and extension detection.
//!
//! Detection strategy (in priority order):
//! 1. The media type declared in a `data:<mime>;base64,` header, trusted as-is
//! 2. A [`ContentClassifier`] run against the decoded bytes written to a temporary file

use std::io::Write;

use crate::classifier::ContentClassifier;
use crate::decoder::{decode, split_data_uri, DecodedPayload};
use crate::error::HandlerError;

/// Extension used when the MIME type has no entry in the table
pub const FALLBACK_EXTENSION: &str = "bin";
const TEMP_FILE_PREFIX: &str = "b64";

/// Resolve the MIME type of a raw payload.
///
/// A declared data-URI type is returned without decoding; otherwise the payload is
/// decoded (failing with `InvalidEncoding`) and classified.
pub fn mime_type(input: &str, classifier: &dyn ContentClassifier) -> Result<String, HandlerError> {
    if let (Some(declared), _) = split_data_uri(input) {
        return Ok(declared.to_string());
    }
    let data = decode(input)?;
    detect_mime(&data, classifier)
}

/// Resolve the file extension of a raw payload.
pub fn extension(input: &str, classifier: &dyn ContentClassifier) -> Result<String, HandlerError> {
    let mime = mime_type(input, classifier)?;
    Ok(extension_from_mime(&mime).to_string())
}

/// MIME type of an already decoded payload.
pub fn sniff(
    payload: &DecodedPayload,
    classifier: &dyn ContentClassifier,
) -> Result<String, HandlerError> {
    match &payload.declared_mime {
        Some(declared) => Ok(declared.clone()),
        None => detect_mime(&payload.data, classifier),
    }
}

/// Write `data` to a uniquely named temporary file and classify it.
///
/// The temporary file is removed when it goes out of scope, whether or not the
/// classifier succeeds.
pub fn detect_mime(
    data: &[u8],
    classifier: &dyn ContentClassifier,
) -> Result<String, HandlerError> {
    let mut temp = tempfile::Builder::new()
        .prefix(TEMP_FILE_PREFIX)
        .tempfile()
        .map_err(|e| {
            HandlerError::MimeUndetermined(format!("failed to create temporary file: {}", e))
        })?;

    temp.write_all(data)
        .and_then(|_| temp.flush())
        .map_err(|e| {
            HandlerError::MimeUndetermined(format!("failed to write temporary file: {}", e))
        })?;

    let detected = classifier.classify(temp.path()).map_err(|e| {
        tracing::warn!(error = %e, "Content classifier failed");
        HandlerError::MimeUndetermined(format!("content classifier failed: {}", e))
    })?;

    match detected {
        Some(mime) => {
            tracing::debug!(mime = %mime, size_bytes = data.len(), "Classified payload");
            Ok(mime)
        }
        None => Err(HandlerError::MimeUndetermined(
            "content classifier could not identify the payload".to_string(),
        )),
    }
}

/// Normalize MIME type by stripping parameters (e.g. "text/plain; charset=utf-8" -> "text/plain").
fn normalize_mime_type(mime: &str) -> String {
    mime.split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(mime)
        .to_lowercase()
}

/// Map a MIME type to its canonical extension. Unknown types map to `bin`.
pub fn extension_from_mime(mime: &str) -> &'static str {
    match normalize_mime_type(mime).as_str() {
        // Images
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        // Documents
        "application/pdf" => "pdf",
        "text/plain" => "txt",
        "text/csv" => "csv",
        "application/vnd.ms-excel" => "xls",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => "xlsx",
        "application/msword" => "doc",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => "docx",
        _ => FALLBACK_EXTENSION,
    }
}
