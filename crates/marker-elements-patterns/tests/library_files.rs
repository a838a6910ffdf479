use std::io::Write;
use std::sync::Arc;

use marker_elements_patterns::{PatternError, PatternLibrary, PatternMatcher, Rotation};

const TWO_MARKERS: &str = r#"{
  "grid_dimension": 4,
  "patterns": [
    { "id": 10, "rows": ["....", ".##.", ".#..", "...."] },
    { "id": 11, "rows": ["0000", "0110", "0010", "0000"] }
  ]
}"#;

#[test]
fn loads_library_from_json_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(TWO_MARKERS.as_bytes()).expect("write");

    let lib = PatternLibrary::from_json_file(file.path()).expect("load");
    assert_eq!(lib.grid_dimension(), 4);
    assert_eq!(lib.len(), 2);
    assert_eq!(lib.patterns()[0].id(), 10);
}

#[test]
fn overlapping_markers_resolve_to_first_registered() {
    let lib = Arc::new(PatternLibrary::from_json_str(TWO_MARKERS).expect("parse"));
    let matcher = PatternMatcher::new(lib.clone());

    // Marker 11 is marker 10 turned a quarter clockwise.
    let observed = lib.get(11).expect("marker 11").reference();
    let m = matcher.match_grid(&observed).expect("match");
    assert_eq!(m.id, 10);
    assert_eq!(m.rotation, Rotation::Deg90);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = PatternLibrary::from_json_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, PatternError::Io(_)));
}

#[test]
fn malformed_json_is_reported() {
    let err = PatternLibrary::from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, PatternError::Json(_)));
}
