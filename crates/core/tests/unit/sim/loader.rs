//! Document loader unit tests.
//!
//! Verifies the JSON extension check, I/O and parse failures, level count
//! handling, and configuration documents, using temporary files.

use crate::common::fixtures::{hierarchy, hierarchy_json};
use memhier_core::common::MemorySize;
use memhier_core::common::error::LoadError;
use memhier_core::config::Clusivity;
use memhier_core::sim::{load_config, load_hierarchy, parse_hierarchy};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

// ══════════════════════════════════════════════════════════
// 1. Hierarchy documents
// ══════════════════════════════════════════════════════════

#[test]
fn loads_hierarchy_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "caches.json", &hierarchy_json(3));
    let spec = load_hierarchy(&path).unwrap();
    assert_eq!(spec.level_count, 3);
    assert_eq!(spec.entries.len(), 4);
    assert_eq!(spec.entries[1].size, Some(MemorySize::from_kib(64)));
    assert_eq!(spec.entries[3].clusivity, Some(Clusivity::MostlyExclusive));
}

#[test]
fn extension_is_case_insensitive() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "CACHES.JSON", &hierarchy_json(0));
    assert_eq!(load_hierarchy(&path).unwrap(), hierarchy(0));
}

#[test]
fn non_json_path_rejected_before_reading() {
    let err = load_hierarchy(&PathBuf::from("does/not/exist/caches.yaml")).unwrap_err();
    assert!(matches!(err, LoadError::UnsupportedDocumentFormat { .. }));
    let err = load_hierarchy(&PathBuf::from("caches")).unwrap_err();
    assert!(matches!(err, LoadError::UnsupportedDocumentFormat { .. }));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    match load_hierarchy(&path) {
        Err(LoadError::Io { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected I/O error, got {other:?}"),
    }
}

#[test]
fn malformed_json_names_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "broken.json", "{ \"num_levels\": 1, ");
    match load_hierarchy(&path) {
        Err(LoadError::Parse { origin, .. }) => assert!(origin.ends_with("broken.json")),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn negative_level_count_rejected() {
    let err = parse_hierarchy(r#"{ "num_levels": -1, "caches": [] }"#).unwrap_err();
    assert!(matches!(err, LoadError::InvalidLevelCount(-1)));
}

#[test]
fn level_count_aliases() {
    let spec = parse_hierarchy(r#"{ "levelCount": 0 }"#).unwrap();
    assert_eq!(spec, hierarchy(0));
    let spec = parse_hierarchy(r#"{ "level_count": 0, "caches": [] }"#).unwrap();
    assert_eq!(spec.level_count, 0);
}

#[test]
fn unknown_cache_field_rejected() {
    let json = r#"{ "num_levels": 1, "caches": [
        { "type": "L1I", "replacement": "lru" },
        { "type": "L1D" }
    ] }"#;
    match parse_hierarchy(json) {
        Err(LoadError::Parse { origin, .. }) => assert_eq!(origin, "<string>"),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn parsing_does_not_validate() {
    // Ordering rules belong to validation; the loader accepts any entry list.
    let json = r#"{ "num_levels": 5, "caches": [ { "type": "L3" } ] }"#;
    let spec = parse_hierarchy(json).unwrap();
    assert_eq!(spec.level_count, 5);
    assert_eq!(spec.entries[0].kind, "L3");
}

// ══════════════════════════════════════════════════════════
// 2. Configuration documents
// ══════════════════════════════════════════════════════════

#[test]
fn loads_config_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(
        &dir,
        "system.json",
        r#"{ "memory": { "size": "1GB", "channels": 2 }, "cache_specs_file": "caches.json" }"#,
    );
    let config = load_config(&path).unwrap();
    assert_eq!(config.memory.size, MemorySize::from_mib(1024));
    assert_eq!(config.memory.channels, 2);
    assert_eq!(config.cache_specs_file, Some(PathBuf::from("caches.json")));
}

#[test]
fn bad_config_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(&dir, "system.json", r#"{ "system": { "sys_clock": "fast" } }"#);
    assert!(matches!(load_config(&path), Err(LoadError::Parse { .. })));
}
