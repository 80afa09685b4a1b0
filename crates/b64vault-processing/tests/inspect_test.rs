mod helpers;

use std::collections::BTreeSet;

use b64vault_core::HandlerConfig;
use b64vault_processing::{HandlerError, ValidationError};
use helpers::{data_uri, memory_app, png_bytes, PNG_B64};

#[test]
fn test_get_file_info_data_uri() {
    let app = memory_app(HandlerConfig::default());
    let bytes = png_bytes();

    let info = app
        .handler
        .get_file_info(&data_uri(&bytes, "image/png"))
        .unwrap();

    assert_eq!(info.mime_type, "image/png");
    assert_eq!(info.extension, "png");
    assert_eq!(info.size_bytes, bytes.len());
    assert_eq!(info.data, bytes);
}

#[test]
fn test_get_file_info_does_not_touch_storage() {
    let app = memory_app(HandlerConfig::default());

    app.handler.get_file_info(PNG_B64).unwrap();

    assert!(app.public.files().is_empty());
    assert!(app.public.directories().is_empty());
}

#[test]
fn test_get_file_info_declared_type_is_trusted() {
    let app = memory_app(HandlerConfig::default());

    // PNG bytes declared as PDF keep the declared type
    let info = app
        .handler
        .get_file_info(&data_uri(&png_bytes(), "application/pdf"))
        .unwrap();

    assert_eq!(info.mime_type, "application/pdf");
    assert_eq!(info.extension, "pdf");
}

#[test]
fn test_get_file_info_unknown_mime_maps_to_bin() {
    let app = memory_app(HandlerConfig::default());

    let info = app
        .handler
        .get_file_info(&data_uri(b"PK\x03\x04", "application/zip"))
        .unwrap();

    assert_eq!(info.extension, "bin");
    assert_eq!(info.size_bytes, 4);
}

#[test]
fn test_get_file_info_plain_text() {
    let app = memory_app(HandlerConfig::default());

    // "hello world"
    let info = app.handler.get_file_info("aGVsbG8gd29ybGQ=").unwrap();

    assert_eq!(info.mime_type, "text/plain");
    assert_eq!(info.extension, "txt");
    assert_eq!(info.data, b"hello world");
}

#[test]
fn test_invalid_base64_fails_everywhere() {
    let app = memory_app(HandlerConfig::default());

    for _ in 0..2 {
        assert!(matches!(
            app.handler.get_file_info("invalid-base64-string"),
            Err(HandlerError::InvalidEncoding(_))
        ));
        assert!(matches!(
            app.handler.is_valid_image("invalid-base64-string", None),
            Err(HandlerError::InvalidEncoding(_))
        ));
    }
}

#[test]
fn test_is_valid_image() {
    let app = memory_app(HandlerConfig::default());

    assert!(app
        .handler
        .is_valid_image(&data_uri(&png_bytes(), "image/png"), None)
        .unwrap());
    assert!(app.handler.is_valid_image(PNG_B64, None).unwrap());
}

#[test]
fn test_is_valid_image_with_custom_extensions() {
    let app = memory_app(HandlerConfig::default());
    let pdf_only = BTreeSet::from(["pdf".to_string()]);

    let err = app
        .handler
        .is_valid_image(&data_uri(&png_bytes(), "image/png"), Some(&pdf_only))
        .unwrap_err();

    assert!(matches!(
        err,
        HandlerError::Validation(ValidationError::InvalidImageExtension { ref extension, .. })
            if extension == "png"
    ));
}

#[test]
fn test_is_valid_image_rejects_documents() {
    let app = memory_app(HandlerConfig::default());

    let result = app
        .handler
        .is_valid_image(&data_uri(b"%PDF-1.4\n", "application/pdf"), None);

    assert!(matches!(
        result,
        Err(HandlerError::Validation(
            ValidationError::InvalidImageExtension { .. }
        ))
    ));
}

#[test]
fn test_is_valid_image_configured_set() {
    let app = memory_app(HandlerConfig::default().with_valid_image_extensions(["gif"]));

    assert!(app.handler.is_valid_image(PNG_B64, None).is_err());
    assert!(app.handler.is_valid_image("R0lGODlh", None).unwrap());
}
