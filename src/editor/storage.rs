//! Global storage document
//!
//! Models the parts of `User/globalStorage/storage.json` that record opened
//! folders and workspaces. The file has changed shape across editor releases,
//! so every field is read leniently: a missing field or one with an unexpected
//! type simply contributes nothing.

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Convert a loose JSON value into `T`
///
/// Arrays never match: nothing read here is a tuple, and derived structs would
/// otherwise accept an array positionally.
fn from_loose<T: DeserializeOwned>(value: Value) -> Option<T> {
    if value.is_array() {
        return None;
    }
    T::deserialize(value).ok()
}

/// Deserialize `T`, mapping a type mismatch to `None`
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(from_loose(value))
}

/// Deserialize a list of `T`, dropping elements that don't match
/// and treating a non-array value as empty
fn lenient_list<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        _ => return Ok(Vec::new()),
    };
    Ok(items.into_iter().filter_map(from_loose).collect())
}

/// The storage.json file structure (read-only view)
#[derive(Debug, Default, Deserialize)]
pub struct StorageDocument {
    #[serde(rename = "backupWorkspaces", default, deserialize_with = "lenient")]
    pub backup_workspaces: Option<BackupWorkspaces>,

    #[serde(rename = "windowsState", default, deserialize_with = "lenient")]
    pub windows_state: Option<WindowsState>,

    #[serde(rename = "openedPathsList", default, deserialize_with = "lenient")]
    pub opened_paths_list: Option<OpenedPathsList>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BackupWorkspaces {
    #[serde(default, deserialize_with = "lenient_list")]
    pub folders: Vec<BackupFolder>,

    #[serde(default, deserialize_with = "lenient_list")]
    pub workspaces: Vec<BackupWorkspace>,
}

#[derive(Debug, Deserialize)]
pub struct BackupFolder {
    #[serde(rename = "folderUri", default, deserialize_with = "lenient")]
    pub folder_uri: Option<String>,
}

/// Backup workspaces are either a bare URI or an object carrying one
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum BackupWorkspace {
    Uri(String),
    Entry {
        #[serde(rename = "workspaceUri", default, deserialize_with = "lenient")]
        workspace_uri: Option<String>,
    },
}

#[derive(Debug, Default, Deserialize)]
pub struct WindowsState {
    #[serde(rename = "lastActiveWindow", default, deserialize_with = "lenient")]
    pub last_active_window: Option<WindowEntry>,

    #[serde(rename = "openedWindows", default, deserialize_with = "lenient_list")]
    pub opened_windows: Vec<WindowEntry>,
}

#[derive(Debug, Deserialize)]
pub struct WindowEntry {
    #[serde(default, deserialize_with = "lenient")]
    pub folder: Option<String>,
}

/// Recently opened list
///
/// Newer releases write `entries`; older ones wrote flat `workspaces` and
/// `folders` arrays.
#[derive(Debug, Default, Deserialize)]
pub struct OpenedPathsList {
    #[serde(default, deserialize_with = "lenient_list")]
    pub entries: Vec<OpenedEntry>,

    #[serde(default, deserialize_with = "lenient_list")]
    pub workspaces: Vec<PathEntry>,

    #[serde(default, deserialize_with = "lenient_list")]
    pub folders: Vec<PathEntry>,
}

#[derive(Debug, Deserialize)]
pub struct OpenedEntry {
    #[serde(rename = "folderUri", default, deserialize_with = "lenient")]
    pub folder_uri: Option<String>,

    #[serde(rename = "fileUri", default, deserialize_with = "lenient")]
    pub file_uri: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub workspace: Option<WorkspaceRef>,
}

#[derive(Debug, Deserialize)]
pub struct WorkspaceRef {
    #[serde(rename = "configPath", default, deserialize_with = "lenient")]
    pub config_path: Option<String>,

    #[serde(rename = "configURIPath", default, deserialize_with = "lenient")]
    pub config_uri_path: Option<String>,
}

/// Legacy list item: a bare path or `{ "path": .. }` / `{ "uri": .. }`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PathEntry {
    Plain(String),
    Entry {
        #[serde(default, deserialize_with = "lenient")]
        path: Option<String>,
        #[serde(default, deserialize_with = "lenient")]
        uri: Option<String>,
    },
}

impl BackupWorkspaces {
    fn candidates(&self) -> impl Iterator<Item = &str> {
        let folders = self
            .folders
            .iter()
            .filter_map(|folder| folder.folder_uri.as_deref());
        let workspaces = self.workspaces.iter().filter_map(|ws| match ws {
            BackupWorkspace::Uri(uri) => Some(uri.as_str()),
            BackupWorkspace::Entry { workspace_uri } => workspace_uri.as_deref(),
        });
        folders.chain(workspaces)
    }
}

impl WindowsState {
    fn candidates(&self) -> impl Iterator<Item = &str> {
        self.last_active_window
            .iter()
            .chain(&self.opened_windows)
            .filter_map(|window| window.folder.as_deref())
    }
}

impl OpenedEntry {
    fn candidates(&self) -> impl Iterator<Item = &str> {
        let workspace = self.workspace.iter().flat_map(|w| {
            w.config_path
                .as_deref()
                .into_iter()
                .chain(w.config_uri_path.as_deref())
        });
        self.folder_uri
            .as_deref()
            .into_iter()
            .chain(self.file_uri.as_deref())
            .chain(workspace)
    }
}

impl PathEntry {
    fn candidate(&self) -> Option<&str> {
        match self {
            Self::Plain(path) => Some(path.as_str()),
            Self::Entry { path, uri } => path.as_deref().or(uri.as_deref()),
        }
    }
}

impl OpenedPathsList {
    fn candidates(&self) -> impl Iterator<Item = &str> {
        let entries = self.entries.iter().flat_map(OpenedEntry::candidates);
        let legacy = self
            .workspaces
            .iter()
            .chain(&self.folders)
            .filter_map(PathEntry::candidate);
        entries.chain(legacy)
    }
}

impl StorageDocument {
    /// Parse a storage document from JSON text
    ///
    /// Invalid JSON is an error. Valid JSON whose top level is not an object
    /// yields an empty document.
    pub fn parse(content: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(content).context("Failed to parse storage.json")?;
        if !value.is_object() {
            return Ok(Self::default());
        }
        serde_json::from_value(value).context("Failed to parse storage.json")
    }

    /// Read storage.json from a file
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read: {}", path.as_ref().display()))?;
        Self::parse(&content)
            .with_context(|| format!("Invalid storage file: {}", path.as_ref().display()))
    }

    /// All raw path candidates in extraction order: backups, then window
    /// state, then the opened paths list
    pub fn candidates(&self) -> Vec<&str> {
        let backups = self.backup_workspaces.iter().flat_map(|b| b.candidates());
        let windows = self.windows_state.iter().flat_map(|w| w.candidates());
        let opened = self.opened_paths_list.iter().flat_map(|o| o.candidates());
        backups.chain(windows).chain(opened).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates_of(json: &str) -> Vec<String> {
        StorageDocument::parse(json)
            .unwrap()
            .candidates()
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_backup_workspaces() {
        let found = candidates_of(
            r#"{
                "backupWorkspaces": {
                    "folders": [{ "folderUri": "file:///a" }, { "other": 1 }],
                    "workspaces": ["file:///w.code-workspace", { "workspaceUri": "file:///x.code-workspace" }],
                    "emptyWindows": [{ "backupFolder": "123" }]
                }
            }"#,
        );
        assert_eq!(
            found,
            vec![
                "file:///a",
                "file:///w.code-workspace",
                "file:///x.code-workspace"
            ]
        );
    }

    #[test]
    fn test_windows_state() {
        let found = candidates_of(
            r#"{
                "windowsState": {
                    "lastActiveWindow": { "folder": "file:///last" },
                    "openedWindows": [{ "folder": "file:///one" }, {}, { "folder": "file:///two" }]
                }
            }"#,
        );
        assert_eq!(found, vec!["file:///last", "file:///one", "file:///two"]);
    }

    #[test]
    fn test_opened_paths_list_entries() {
        let found = candidates_of(
            r#"{
                "openedPathsList": {
                    "entries": [
                        { "folderUri": "file:///folder" },
                        { "fileUri": "file:///file.txt" },
                        { "workspace": { "configPath": "/legacy.code-workspace", "configURIPath": "file:///new.code-workspace" } },
                        null
                    ]
                }
            }"#,
        );
        assert_eq!(
            found,
            vec![
                "file:///folder",
                "file:///file.txt",
                "/legacy.code-workspace",
                "file:///new.code-workspace"
            ]
        );
    }

    #[test]
    fn test_opened_paths_list_legacy_arrays() {
        let found = candidates_of(
            r#"{
                "openedPathsList": {
                    "workspaces": ["/ws1", { "path": "/ws2", "uri": "file:///ignored" }],
                    "folders": [{ "uri": "file:///f1" }, "/f2", 42]
                }
            }"#,
        );
        assert_eq!(found, vec!["/ws1", "/ws2", "file:///f1", "/f2"]);
    }

    #[test]
    fn test_extraction_order_across_sections() {
        let found = candidates_of(
            r#"{
                "openedPathsList": { "folders": ["/opened"] },
                "windowsState": { "lastActiveWindow": { "folder": "/window" } },
                "backupWorkspaces": { "folders": [{ "folderUri": "/backup" }] }
            }"#,
        );
        assert_eq!(found, vec!["/backup", "/window", "/opened"]);
    }

    #[test]
    fn test_wrong_types_are_skipped() {
        let found = candidates_of(
            r#"{
                "backupWorkspaces": { "folders": "not-a-list", "workspaces": [{ "workspaceUri": 7 }] },
                "windowsState": { "lastActiveWindow": { "folder": 12 }, "openedWindows": { "folder": "/x" } },
                "openedPathsList": {
                    "entries": [{ "folderUri": false, "fileUri": "/kept", "workspace": "oops" }],
                    "workspaces": [{ "path": 3, "uri": "/from-uri" }]
                }
            }"#,
        );
        assert_eq!(found, vec!["/kept", "/from-uri"]);
    }

    #[test]
    fn test_section_with_wrong_type_is_empty() {
        let doc = StorageDocument::parse(r#"{ "windowsState": [1, 2], "openedPathsList": null }"#)
            .unwrap();
        assert!(doc.windows_state.is_none());
        assert!(doc.opened_paths_list.is_none());
        assert!(doc.candidates().is_empty());
    }

    #[test]
    fn test_array_items_do_not_match_objects() {
        let found = candidates_of(r#"{ "backupWorkspaces": { "folders": [["file:///a"]] } }"#);
        assert!(found.is_empty());
    }

    #[test]
    fn test_non_object_document_is_empty() {
        assert!(candidates_of("[]").is_empty());
        assert!(candidates_of("null").is_empty());
        assert!(candidates_of("\"text\"").is_empty());
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(StorageDocument::parse("{ not json").is_err());
    }

    #[test]
    fn test_read_missing_file_is_error() {
        let result = StorageDocument::read("/nonexistent/storage.json");
        assert!(result.is_err());
    }
}
