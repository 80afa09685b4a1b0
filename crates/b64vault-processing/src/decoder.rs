//! Base64 payload decoding.

use base64::{engine::general_purpose, Engine as _};

use crate::error::HandlerError;

const DATA_URI_SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// A payload after decoding: the declared MIME type (if a data-URI header was
/// present) and the decoded bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPayload {
    pub declared_mime: Option<String>,
    pub data: Vec<u8>,
}

impl DecodedPayload {
    /// Split off the optional data-URI header and decode the rest.
    pub fn parse(input: &str) -> Result<Self, HandlerError> {
        let (declared_mime, encoded) = split_data_uri(input);
        let data = decode_strict(encoded)?;
        Ok(Self {
            declared_mime: declared_mime.map(str::to_string),
            data,
        })
    }
}

/// Split a `data:<mime>;base64,` header from the payload.
///
/// The media type is everything between `data:` and the first `;base64,`, taken
/// verbatim. An empty media type means the input has no header at all.
pub fn split_data_uri(input: &str) -> (Option<&str>, &str) {
    let Some(rest) = input.strip_prefix(DATA_URI_SCHEME) else {
        return (None, input);
    };
    match rest.find(BASE64_MARKER) {
        Some(end) if end > 0 => {
            (Some(&rest[..end]), &rest[end + BASE64_MARKER.len()..])
        }
        _ => (None, input),
    }
}

/// Decode a payload, with or without a data-URI header, into bytes.
pub fn decode(input: &str) -> Result<Vec<u8>, HandlerError> {
    let (_, encoded) = split_data_uri(input);
    decode_strict(encoded)
}

/// Standard alphabet with canonical padding; whitespace and URL-safe characters are rejected.
fn decode_strict(encoded: &str) -> Result<Vec<u8>, HandlerError> {
    general_purpose::STANDARD
        .decode(encoded)
        .map_err(HandlerError::InvalidEncoding)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_data_uri_header() {
        assert_eq!(
            split_data_uri("data:image/png;base64,iVBORw0KGgo="),
            (Some("image/png"), "iVBORw0KGgo=")
        );
    }

    #[test]
    fn header_capture_stops_at_first_base64_marker() {
        assert_eq!(
            split_data_uri("data:text/plain;charset=utf-8;base64,aGk="),
            (Some("text/plain;charset=utf-8"), "aGk=")
        );
    }

    #[test]
    fn header_is_case_sensitive() {
        let input = "DATA:image/png;base64,aGk=";
        assert_eq!(split_data_uri(input), (None, input));
    }

    #[test]
    fn empty_media_type_is_not_a_header() {
        let empty = "data:;base64,aGk=";
        assert_eq!(split_data_uri(empty), (None, empty));
    }

    #[test]
    fn media_type_may_contain_commas() {
        let input = "data:text/plain,x;base64,aGk=";
        assert_eq!(split_data_uri(input), (Some("text/plain,x"), "aGk="));
        assert_eq!(decode(input).unwrap(), b"hi");
    }

    #[test]
    fn decodes_plain_and_prefixed_payloads() {
        assert_eq!(decode("aGVsbG8=").unwrap(), b"hello");
        assert_eq!(decode("data:text/plain;base64,aGVsbG8=").unwrap(), b"hello");
    }

    #[test]
    fn decodes_empty_payload() {
        assert_eq!(decode("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn rejects_characters_outside_the_alphabet() {
        assert!(matches!(
            decode("invalid-base64-string"),
            Err(HandlerError::InvalidEncoding(_))
        ));
        assert!(matches!(
            decode("aGVs bG8="),
            Err(HandlerError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn rejects_malformed_padding() {
        assert!(matches!(
            decode("aGVsbG8"),
            Err(HandlerError::InvalidEncoding(_))
        ));
        assert!(matches!(
            decode("aGVsbG8=="),
            Err(HandlerError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn parse_keeps_declared_mime() {
        let payload = DecodedPayload::parse("data:image/gif;base64,R0lGODlh").unwrap();
        assert_eq!(payload.declared_mime.as_deref(), Some("image/gif"));
        assert_eq!(payload.data, b"GIF89a");

        let payload = DecodedPayload::parse("R0lGODlh").unwrap();
        assert_eq!(payload.declared_mime, None);
    }
}
