//! Document loading.
//!
//! This module reads the two JSON documents a run consumes. It performs:
//! 1. **Format check:** Cache hierarchy documents must carry a `.json` extension.
//! 2. **Reading:** The file is read whole; I/O failures keep the offending path.
//! 3. **Parsing:** `serde_json` into the typed records, with the level count checked
//!    for sign before it becomes a `usize`.

use std::fs;
use std::path::Path;

use crate::common::error::LoadError;
use crate::config::Config;
use crate::hierarchy::spec::{HierarchyDocument, HierarchySpec};

/// Origin label used for documents parsed from memory.
const STRING_ORIGIN: &str = "<string>";

/// Loads a cache hierarchy document from disk.
///
/// # Errors
///
/// `UnsupportedDocumentFormat` unless the extension is `.json` (any case), `Io` if the
/// file cannot be read, and `Parse` or `InvalidLevelCount` for a malformed document.
pub fn load_hierarchy(path: &Path) -> Result<HierarchySpec, LoadError> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if !is_json {
        return Err(LoadError::UnsupportedDocumentFormat {
            path: path.to_path_buf(),
        });
    }

    tracing::info!(path = %path.display(), "reading cache hierarchy");
    let text = read(path)?;
    parse_hierarchy_from(&text, &path.display().to_string())
}

/// Parses a cache hierarchy document held in memory.
///
/// # Errors
///
/// `Parse` for malformed JSON or unknown fields, `InvalidLevelCount` for a negative count.
pub fn parse_hierarchy(text: &str) -> Result<HierarchySpec, LoadError> {
    parse_hierarchy_from(text, STRING_ORIGIN)
}

fn parse_hierarchy_from(text: &str, origin: &str) -> Result<HierarchySpec, LoadError> {
    let doc: HierarchyDocument =
        serde_json::from_str(text).map_err(|source| LoadError::Parse {
            origin: origin.to_string(),
            source,
        })?;
    let spec = HierarchySpec::try_from(doc)?;
    tracing::debug!(
        origin,
        levels = spec.level_count,
        entries = spec.entries.len(),
        "parsed cache hierarchy"
    );
    Ok(spec)
}

/// Loads a system configuration document from disk.
///
/// Fields left out of the document take their defaults.
///
/// # Errors
///
/// `Io` if the file cannot be read, `Parse` if it is not a valid configuration.
pub fn load_config(path: &Path) -> Result<Config, LoadError> {
    tracing::info!(path = %path.display(), "reading configuration file");
    let text = read(path)?;
    serde_json::from_str(&text).map_err(|source| LoadError::Parse {
        origin: path.display().to_string(),
        source,
    })
}

fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}
