//! Error metadata module
//!
//! Concrete error enums live next to the code that raises them
//! (`StorageError` in b64vault-storage, `HandlerError` in b64vault-processing).
//! They all describe themselves through [`ErrorMetadata`] so callers such as the
//! CLI can report failures uniformly without matching on every variant.

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like a flaky backend
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error reporting - defines how an error should be presented
/// This trait allows errors to self-describe their response characteristics
pub trait ErrorMetadata {
    /// HTTP status code a service wrapper should return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "INVALID_ENCODING")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried by the caller)
    fn is_recoverable(&self) -> bool;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}
