//! Helpers shared by the `b64vault` binary.

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use b64vault_core::ErrorMetadata;
use serde::Serialize;

/// Argument value that means "read from stdin"
pub const STDIN_SOURCE: &str = "-";

/// Initialize tracing for CLI binaries.
///
/// Logs go to stderr so stdout carries only the JSON result.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Load environment variables from `path`, or from a `.env` in the working
/// directory (or a parent) when no path is given. A missing default `.env` is ignored.
pub fn load_env(path: Option<&Path>) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            dotenvy::from_path(path)
                .with_context(|| format!("Load environment file {}", path.display()))?;
        }
        None => {
            dotenvy::dotenv().ok();
        }
    }
    Ok(())
}

/// Read a base64 payload from a file, or from stdin when `source` is `-`.
pub fn read_payload(source: &str) -> anyhow::Result<String> {
    if source == STDIN_SOURCE {
        return payload_from_reader(std::io::stdin().lock()).context("Read payload from stdin");
    }

    let path = Path::new(source);
    let file = std::fs::File::open(path)
        .with_context(|| format!("Open payload file {}", path.display()))?;
    payload_from_reader(file).with_context(|| format!("Read payload file {}", path.display()))
}

/// Read all text from `reader`, trimming surrounding whitespace.
pub fn payload_from_reader<R: Read>(mut reader: R) -> anyhow::Result<String> {
    let mut raw = String::new();
    reader
        .read_to_string(&mut raw)
        .context("Payload is not valid UTF-8 text")?;
    Ok(raw.trim().to_string())
}

/// JSON body printed when an operation fails.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ErrorReport {
    pub error_code: &'static str,
    pub message: String,
    pub recoverable: bool,
}

impl ErrorReport {
    pub fn from_error<E: ErrorMetadata + std::fmt::Display>(err: &E) -> Self {
        Self {
            error_code: err.error_code(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
        }
    }
}
