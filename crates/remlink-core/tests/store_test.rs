#![allow(clippy::unwrap_used)]
// Integration tests for `CodeStore` against a real temp directory.

use std::fs;

use pretty_assertions::assert_eq;
use serde_json::json;

use remlink_core::{CodeStore, CoreError, HardwareId};

fn hw() -> HardwareId {
    "AA:BB:CC:DD:EE:FF".parse().unwrap()
}

#[test]
fn path_uses_lowercase_template() {
    let dir = tempfile::tempdir().unwrap();
    let store = CodeStore::new(dir.path());

    let path = store.path_for(&hw());

    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "broadlink_remote_aabbccddeeff_codes"
    );
    assert!(path.starts_with(dir.path()));
}

#[test]
fn absent_file_is_empty_mapping() {
    let dir = tempfile::tempdir().unwrap();
    let store = CodeStore::new(dir.path());

    let codes = store.read_codes(&hw()).unwrap();

    assert!(codes.is_empty());
}

#[test]
fn reads_devices_and_passes_payloads_through() {
    let dir = tempfile::tempdir().unwrap();
    let store = CodeStore::new(dir.path());

    let document = json!({
        "version": 1,
        "key": "broadlink_remote_aabbccddeeff_codes",
        "data": {
            "devices": {
                "tv": {
                    "power_on": "JgBQAAABKJIT...",
                    "volume_up": "JgBQAAABKZET..."
                },
                "soundbar": {
                    "mute": "sgcYAAABKJIT..."
                }
            }
        }
    });
    fs::write(store.path_for(&hw()), document.to_string()).unwrap();

    let codes = store.read_codes(&hw()).unwrap();

    assert_eq!(codes.len(), 2);
    assert_eq!(codes["tv"].len(), 2);
    // Payloads are opaque -- returned byte-for-byte as JSON values.
    assert_eq!(codes["tv"]["power_on"], json!("JgBQAAABKJIT..."));
    assert_eq!(codes["soundbar"]["mute"], json!("sgcYAAABKJIT..."));
}

#[test]
fn document_without_devices_is_empty_mapping() {
    let dir = tempfile::tempdir().unwrap();
    let store = CodeStore::new(dir.path());

    fs::write(store.path_for(&hw()), json!({"version": 1, "data": {}}).to_string()).unwrap();

    assert!(store.read_codes(&hw()).unwrap().is_empty());
}

#[test]
fn corrupt_file_errors_with_path() {
    let dir = tempfile::tempdir().unwrap();
    let store = CodeStore::new(dir.path());

    // A torn write from the external learning service.
    fs::write(store.path_for(&hw()), "{\"data\": {\"devi").unwrap();

    let err = store.read_codes(&hw()).unwrap_err();

    match &err {
        CoreError::CorruptStore { path, .. } => {
            assert_eq!(path, &store.path_for(&hw()));
        }
        other => panic!("expected CorruptStore error, got: {other:?}"),
    }

    let message = err.to_string();
    assert!(
        message.contains("broadlink_remote_aabbccddeeff_codes"),
        "error should name the path, got: {message}"
    );
}
