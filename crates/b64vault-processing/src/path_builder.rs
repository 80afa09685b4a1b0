//! Relative path generation for stored files.
//!
//! Paths have the shape `{base}{stem}_{unix_seconds}.{extension}` where the stem is
//! the slugified original file name or, when none is usable, a random UUID.

use chrono::Utc;
use deunicode::deunicode;
use uuid::Uuid;

/// Build a storage path using the current time.
pub fn build_path(base_path: &str, extension: &str, original_name: Option<&str>) -> String {
    build_path_at(base_path, extension, original_name, Utc::now().timestamp())
}

/// Build a storage path for an explicit Unix timestamp (seconds).
pub fn build_path_at(
    base_path: &str,
    extension: &str,
    original_name: Option<&str>,
    timestamp: i64,
) -> String {
    let stem = original_name
        .map(|name| slugify(file_stem(name)))
        .filter(|slug| !slug.is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    format!(
        "{}{}_{}.{}",
        prepare_path(base_path),
        stem,
        timestamp,
        extension
    )
}

/// Normalize a base path to end with exactly one `/`.
///
/// Leading separators are dropped so the result stays relative to the disk root.
/// An empty base path stays empty and files land at the root.
pub fn prepare_path(base_path: &str) -> String {
    let trimmed = base_path.trim_matches(|c| c == '/' || c == '\\');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{}/", trimmed)
    }
}

/// File name without directories or its last extension.
fn file_stem(name: &str) -> &str {
    let file_name = name.rsplit(['/', '\\']).next().unwrap_or(name);
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => &file_name[..idx],
        _ => file_name,
    }
}

/// Lowercase ASCII, `-`-separated token safe for file names and URLs.
///
/// Non-ASCII text is transliterated first, so `Café` becomes `cafe`.
pub fn slugify(input: &str) -> String {
    let ascii = deunicode(&input.replace('@', "-at-"));
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_separator = false;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }

    slug
}
