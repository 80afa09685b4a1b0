//! Data models shared across crates

mod file;

pub use file::*;
