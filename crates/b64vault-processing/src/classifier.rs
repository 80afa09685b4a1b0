//! Content classifiers.
//!
//! A classifier inspects a file on disk and names its MIME type. It is only
//! consulted for payloads that arrive without a data-URI header.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::process::Command;
use std::sync::Arc;

use b64vault_core::ClassifierKind;

/// Bytes read from the head of a file when sniffing
const SNIFF_LEN: u64 = 8192;
const EMPTY_MIME: &str = "application/x-empty";
const TEXT_MIME: &str = "text/plain";

pub trait ContentClassifier: Send + Sync {
    /// Classify the file at `path`. `Ok(None)` means the type could not be determined.
    fn classify(&self, path: &Path) -> io::Result<Option<String>>;
}

/// Build the classifier selected in configuration
pub fn classifier_for(kind: ClassifierKind) -> Arc<dyn ContentClassifier> {
    match kind {
        ClassifierKind::Infer => Arc::new(InferClassifier),
        ClassifierKind::FileCommand => Arc::new(FileCommandClassifier::default()),
    }
}

/// Magic-byte classifier backed by the `infer` crate.
///
/// Falls back to `text/plain` for UTF-8 text without control characters and
/// reports empty files as `application/x-empty`.
#[derive(Debug, Clone, Copy, Default)]
pub struct InferClassifier;

impl ContentClassifier for InferClassifier {
    fn classify(&self, path: &Path) -> io::Result<Option<String>> {
        let mut head = Vec::new();
        File::open(path)?.take(SNIFF_LEN).read_to_end(&mut head)?;

        if head.is_empty() {
            return Ok(Some(EMPTY_MIME.to_string()));
        }

        if let Some(kind) = infer::get(&head) {
            return Ok(Some(kind.mime_type().to_string()));
        }

        if looks_like_text(&head) {
            return Ok(Some(TEXT_MIME.to_string()));
        }

        Ok(None)
    }
}

/// UTF-8 without control characters other than common whitespace.
///
/// A multi-byte character cut off at the end of the sniffed chunk is tolerated.
fn looks_like_text(head: &[u8]) -> bool {
    let text = match std::str::from_utf8(head) {
        Ok(text) => text,
        Err(e) if e.error_len().is_none() => {
            // Incomplete trailing sequence; the prefix is valid UTF-8
            match std::str::from_utf8(&head[..e.valid_up_to()]) {
                Ok(text) => text,
                Err(_) => return false,
            }
        }
        Err(_) => return false,
    };

    text.chars()
        .all(|c| !c.is_control() || matches!(c, '\n' | '\r' | '\t' | '\x0c'))
}

/// Classifier that asks the host `file` utility (`file --brief --mime-type`).
#[derive(Debug, Clone)]
pub struct FileCommandClassifier {
    program: String,
}

impl Default for FileCommandClassifier {
    fn default() -> Self {
        Self::new("file")
    }
}

impl FileCommandClassifier {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl ContentClassifier for FileCommandClassifier {
    fn classify(&self, path: &Path) -> io::Result<Option<String>> {
        let output = Command::new(&self.program)
            .arg("--brief")
            .arg("--mime-type")
            .arg(path)
            .output()?;

        if !output.status.success() {
            return Err(io::Error::other(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let mime = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if mime.is_empty() || !mime.contains('/') {
            return Ok(None);
        }
        Ok(Some(mime))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn classify_bytes(bytes: &[u8]) -> Option<String> {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file.flush().unwrap();
        InferClassifier.classify(file.path()).unwrap()
    }

    #[test]
    fn detects_binary_signatures() {
        assert_eq!(
            classify_bytes(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0]).as_deref(),
            Some("image/png")
        );
        assert_eq!(
            classify_bytes(&[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10]).as_deref(),
            Some("image/jpeg")
        );
        assert_eq!(classify_bytes(b"GIF89a\x01\x00").as_deref(), Some("image/gif"));
        assert_eq!(
            classify_bytes(b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n").as_deref(),
            Some("application/pdf")
        );
    }

    #[test]
    fn falls_back_to_plain_text() {
        assert_eq!(
            classify_bytes(b"hello world\nsecond line\n").as_deref(),
            Some("text/plain")
        );
        assert_eq!(classify_bytes("héllo".as_bytes()).as_deref(), Some("text/plain"));
    }

    #[test]
    fn empty_file_is_reported_as_empty() {
        assert_eq!(classify_bytes(b"").as_deref(), Some("application/x-empty"));
    }

    #[test]
    fn unknown_binary_is_undetermined() {
        assert_eq!(classify_bytes(&[0x13, 0x37, 0xFE, 0xFF, 0x00, 0x42]), None);
    }

    #[test]
    fn text_check_tolerates_truncated_trailing_character() {
        let mut bytes = "abc".as_bytes().to_vec();
        bytes.push(0xC3); // first byte of a two-byte sequence
        assert!(looks_like_text(&bytes));
        assert!(!looks_like_text(&[b'a', 0xFF, b'b']));
        assert!(!looks_like_text(b"bell\x07"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(InferClassifier.classify(&dir.path().join("missing")).is_err());
    }

    #[test]
    fn missing_file_command_is_an_io_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let classifier = FileCommandClassifier::new("b64vault-no-such-program");
        assert!(classifier.classify(file.path()).is_err());
    }

    #[test]
    fn classifier_for_kind() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let classifier = classifier_for(ClassifierKind::Infer);
        assert_eq!(
            classifier.classify(file.path()).unwrap().as_deref(),
            Some("application/x-empty")
        );
    }
}
