// crates/atlas-core/tests/file_input.rs
// ============================================================================
// Module: Definition File Input Tests
// Description: Path-based parsing, size caps, and UTF-8 enforcement.
// ============================================================================

//! ## Overview
//! Validates that definition files are read with the documented limits.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_docs_in_private_items,
    reason = "Test-only assertions are permitted."
)]

use std::fs;
use std::io::Write;
use std::path::Path;

use atlas_core::ErrorKind;
use atlas_core::GeneratorOptions;
use atlas_core::MAX_INPUT_BYTES;
use atlas_core::parse_interaction_file_path;
use atlas_core::parse_type_file_path;
use tempfile::NamedTempFile;
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, content: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn type_file_path_reports_the_path_in_errors() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "types.atlas", b"namespace=app\n[Id]\ndescription=int; bogus\n");
    let err = parse_type_file_path(&path, &GeneratorOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownToken);
    let location = err.location().unwrap();
    assert_eq!(Path::new(&location.file), path.as_path());
    assert_eq!(location.line, 2);
}

#[test]
fn type_file_path_parses_valid_content() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "types.atlas", b"namespace=app\n[Id]\ndescription=int; ==\n");
    let file = parse_type_file_path(&path, &GeneratorOptions::default()).unwrap();
    assert_eq!(file.classes[0].full_qualified_name, "app::Id");
}

#[test]
fn interaction_file_path_parses_valid_content() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"namespace=physics\nDistance / Time -> Velocity\n").unwrap();
    let parsed = parse_interaction_file_path(file.path(), &GeneratorOptions::default()).unwrap();
    assert_eq!(parsed.interactions.len(), 1);
    assert_eq!(parsed.interactions[0].namespace, "physics");
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let err = parse_type_file_path(&dir.path().join("absent.atlas"), &GeneratorOptions::default())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(err.location().is_none());
}

#[test]
fn invalid_utf8_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "bad.atlas", &[b'A', b' ', b'+', b' ', 0xff, 0xfe, b'\n']);
    let err = parse_interaction_file_path(&path, &GeneratorOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(err.message().contains("UTF-8"));
}

#[test]
fn oversized_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let size = usize::try_from(MAX_INPUT_BYTES).unwrap() + 1;
    let path = write_file(&dir, "huge.atlas", &vec![b'#'; size]);
    let err = parse_type_file_path(&path, &GeneratorOptions::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(err.message().contains("exceeds"));
}

#[test]
fn file_at_the_cap_is_accepted() {
    let dir = TempDir::new().unwrap();
    let mut content = b"namespace=app\n[Id]\ndescription=int\n".to_vec();
    let padding = usize::try_from(MAX_INPUT_BYTES).unwrap() - content.len() - 1;
    content.extend(std::iter::repeat_n(b' ', padding));
    content.push(b'\n');
    let path = write_file(&dir, "full.atlas", &content);
    let file = parse_type_file_path(&path, &GeneratorOptions::default()).unwrap();
    assert_eq!(file.classes.len(), 1);
}
