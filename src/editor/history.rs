//! Recent projects from the editor's global storage
//!
//! Collects every folder, file and workspace path recorded in storage.json,
//! decodes `file://` URIs and keeps the ones that still exist on disk.

use anyhow::Result;
use percent_encoding::percent_decode_str;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::storage::StorageDocument;
use crate::config::{self, Editor};

const FILE_SCHEME: &str = "file://";

/// List recent projects for `editor` from the current user's storage file
pub fn recent_projects(editor: Editor) -> Result<Vec<PathBuf>> {
    let storage_path = config::current_storage_path(editor)?;
    read_recent_projects(&storage_path)
}

/// List recent projects recorded in the storage file at `storage_path`
///
/// A missing file means the editor was never used and yields an empty list.
/// An unreadable or malformed file is an error.
pub fn read_recent_projects(storage_path: &Path) -> Result<Vec<PathBuf>> {
    if !storage_path.exists() {
        tracing::debug!(path = %storage_path.display(), "storage file not found");
        return Ok(Vec::new());
    }

    let document = StorageDocument::read(storage_path)?;
    let candidates = document.candidates();
    tracing::debug!(count = candidates.len(), "collected history candidates");

    Ok(existing_unique(
        candidates.into_iter().filter_map(normalize_candidate),
    ))
}

/// Convert a raw candidate into a filesystem path
///
/// `file://` URIs lose the scheme and are percent-decoded; anything else is
/// taken verbatim. Malformed escapes such as `%ZZ` are kept literally. Empty
/// candidates and URIs that don't decode to UTF-8 are dropped.
pub fn normalize_candidate(candidate: &str) -> Option<PathBuf> {
    if candidate.is_empty() {
        return None;
    }

    let Some(encoded) = candidate.strip_prefix(FILE_SCHEME) else {
        return Some(PathBuf::from(candidate));
    };

    match percent_decode_str(encoded).decode_utf8() {
        Ok(decoded) if !decoded.is_empty() => Some(PathBuf::from(decoded.into_owned())),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!(candidate, error = %e, "skipping undecodable URI");
            None
        }
    }
}

/// Keep paths that exist, dropping repeats but preserving first-seen order
fn existing_unique(paths: impl IntoIterator<Item = PathBuf>) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    paths
        .into_iter()
        .filter(|path| path.exists())
        .filter(|path| seen.insert(path.clone()))
        .collect()
}
