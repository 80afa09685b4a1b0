//! b64vault Processing Library
//!
//! The decode → sniff → validate → name → persist pipeline for base64 payloads.
//!
//! - [`decoder`] strips an optional `data:<mime>;base64,` header and decodes strictly
//! - [`sniffer`] resolves the MIME type (declared, or classified from a temporary file)
//!   and maps it to a file extension
//! - [`validator`] checks extensions against allow-lists
//! - [`path_builder`] names the stored file
//! - [`handler`] ties the stages together behind `store`, `get_file_info` and `is_valid_image`

pub mod classifier;
pub mod decoder;
pub mod error;
pub mod handler;
pub mod path_builder;
pub mod sniffer;
pub mod validator;

// Re-export commonly used types
pub use classifier::{classifier_for, ContentClassifier, FileCommandClassifier, InferClassifier};
pub use decoder::{decode, DecodedPayload};
pub use error::HandlerError;
pub use handler::{Base64FileHandler, StoreOptions};
pub use path_builder::{build_path, slugify};
pub use sniffer::{detect_mime, extension, extension_from_mime, mime_type, sniff};
pub use validator::{check_allowed, check_is_image, ValidationError};
