//! List command - Show recent and local projects

use anyhow::{anyhow, Context, Result};
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, ContentArrangement, Table};
use owo_colors::OwoColorize;
use serde::{Serialize, Serializer};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread::{self, ScopedJoinHandle};
use std::time::SystemTime;

use editor_projects::config::Editor;
use editor_projects::editor::{history, scanner, ScanLimits};

/// Where a project was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    /// From the editor's history
    Recent,
    /// From scanning the project roots
    Local,
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recent => write!(f, "recent"),
            Self::Local => write!(f, "local"),
        }
    }
}

/// A project shown to the user
#[derive(Debug, Serialize)]
pub struct Project {
    /// Final path component
    pub name: String,

    /// Absolute project path
    pub path: PathBuf,

    /// Where the project was found
    pub kind: ProjectKind,

    /// When the project directory was last modified (RFC 3339 in JSON)
    #[serde(rename = "modified", serialize_with = "serialize_modified")]
    pub last_modified: Option<SystemTime>,
}

impl Project {
    pub fn from_path(path: PathBuf, kind: ProjectKind) -> Self {
        let name = project_name(&path);
        let last_modified = fs::metadata(&path).and_then(|m| m.modified()).ok();
        Self {
            name,
            path,
            kind,
            last_modified,
        }
    }
}

fn serialize_modified<S: Serializer>(
    modified: &Option<SystemTime>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    modified
        .map(|t| chrono::DateTime::<chrono::Utc>::from(t).to_rfc3339())
        .serialize(serializer)
}

/// Display name of a project: its last path component, or the whole path
pub fn project_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Options for the list command
pub struct ListOptions {
    /// Editor whose history is read
    pub editor: Editor,
    /// Comma-separated local project roots
    pub project_roots: String,
    /// Show the recent projects section
    pub show_recent: bool,
    /// Show the local projects section
    pub show_local: bool,
    /// Only keep projects whose path contains this pattern
    pub filter: Option<String>,
    /// Limit number of results per section
    pub limit: Option<usize>,
    /// Print JSON instead of tables
    pub json: bool,
    /// Bounds on the local scan
    pub scan_limits: ScanLimits,
}

/// JSON output shape
#[derive(Debug, Serialize)]
struct ListOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    recent: Option<Vec<Project>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    local: Option<Vec<Project>>,
}

/// Execute the list command and return formatted output
pub fn execute(options: ListOptions) -> Result<String> {
    let (recent, local) = load(&options);

    let recent = recent.map(|result| section(ProjectKind::Recent, result, &options));
    let local = local.map(|result| section(ProjectKind::Local, result, &options));

    if options.json {
        let output = ListOutput { recent, local };
        return serde_json::to_string_pretty(&output).context("Failed to serialize projects");
    }

    let mut output = Vec::new();
    if let Some(projects) = &recent {
        output.push(render_section("Recent Projects", projects));
    }
    if let Some(projects) = &local {
        output.push(render_section("Local Projects", projects));
    }
    Ok(output.join("\n\n"))
}

type Loaded = Option<Result<Vec<PathBuf>>>;

/// Run the history reader and the local scanner side by side
fn load(options: &ListOptions) -> (Loaded, Loaded) {
    thread::scope(|scope| {
        let recent = options
            .show_recent
            .then(|| scope.spawn(|| history::recent_projects(options.editor)));
        let local = options.show_local.then(|| {
            scope.spawn(|| {
                Ok(scanner::local_projects(
                    &options.project_roots,
                    options.scan_limits,
                ))
            })
        });

        (recent.map(join), local.map(join))
    })
}

fn join<T>(handle: ScopedJoinHandle<'_, Result<T>>) -> Result<T> {
    handle
        .join()
        .unwrap_or_else(|_| Err(anyhow!("worker thread panicked")))
}

/// Turn one section's result into projects, reporting a failure on stderr
fn section(
    kind: ProjectKind,
    result: Result<Vec<PathBuf>>,
    options: &ListOptions,
) -> Vec<Project> {
    let paths = match result {
        Ok(paths) => paths,
        Err(e) => {
            eprintln!(
                "{} {:#}",
                format!("Failed to load {} projects:", kind).red(),
                e
            );
            return Vec::new();
        }
    };

    let filtered = paths.into_iter().filter(|path| match &options.filter {
        Some(pattern) => path.to_string_lossy().contains(pattern.as_str()),
        None => true,
    });

    filtered
        .take(options.limit.unwrap_or(usize::MAX))
        .map(|path| Project::from_path(path, kind))
        .collect()
}

fn render_section(title: &str, projects: &[Project]) -> String {
    let heading = title.bold().to_string();
    if projects.is_empty() {
        return format!("{}\n{}", heading, "No projects found".dimmed());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Name"),
            Cell::new("Path"),
            Cell::new("Modified"),
        ]);

    for project in projects {
        table.add_row(vec![
            Cell::new(&project.name),
            Cell::new(project.path.to_string_lossy()),
            Cell::new(format_modified(project.last_modified)),
        ]);
    }

    format!("{}\n{}\n{} projects", heading, table, projects.len())
}

fn format_modified(modified: Option<SystemTime>) -> String {
    modified
        .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
        .map(|d| {
            let dt = chrono::DateTime::from_timestamp(d.as_secs() as i64, 0).unwrap_or_default();
            dt.format("%Y-%m-%d %H:%M").to_string()
        })
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};
    use tempfile::tempdir;

    fn options(project_roots: String) -> ListOptions {
        ListOptions {
            editor: Editor::VsCode,
            project_roots,
            show_recent: false,
            show_local: true,
            filter: None,
            limit: None,
            json: false,
            scan_limits: ScanLimits::default(),
        }
    }

    #[test]
    fn test_project_name() {
        assert_eq!(project_name(Path::new("/Users/me/app")), "app");
        assert_eq!(project_name(Path::new("/")), "/");
    }

    #[test]
    fn test_format_modified() {
        assert_eq!(format_modified(None), "-");
        let t = UNIX_EPOCH + Duration::from_secs(1_704_067_200);
        assert_eq!(format_modified(Some(t)), "2024-01-01 00:00");
    }

    #[test]
    fn test_section_filter_and_limit() {
        let mut opts = options(String::new());
        opts.filter = Some("keep".to_string());
        opts.limit = Some(1);

        let paths = vec![
            PathBuf::from("/a/drop"),
            PathBuf::from("/a/keep-1"),
            PathBuf::from("/a/keep-2"),
        ];
        let projects = section(ProjectKind::Local, Ok(paths), &opts);
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].name, "keep-1");
        assert!(projects[0].last_modified.is_none());
    }

    #[test]
    fn test_section_error_is_empty() {
        let projects = section(
            ProjectKind::Recent,
            Err(anyhow!("boom")),
            &options(String::new()),
        );
        assert!(projects.is_empty());
    }

    #[test]
    fn test_execute_json_local_only() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("foo")).unwrap();

        let mut opts = options(dir.path().to_string_lossy().into_owned());
        opts.json = true;
        let output = execute(opts).unwrap();

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert!(value.get("recent").is_none());
        let local = value["local"].as_array().unwrap();
        assert_eq!(local.len(), 1);
        assert_eq!(local[0]["name"], "foo");
        assert_eq!(local[0]["kind"], "local");
        let modified = local[0]["modified"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(modified).is_ok());
    }

    #[test]
    fn test_missing_project_serializes_null_modified() {
        let project = Project::from_path(PathBuf::from("/nonexistent/app"), ProjectKind::Recent);
        let value = serde_json::to_value(&project).unwrap();
        assert_eq!(value["kind"], "recent");
        assert!(value["modified"].is_null());
        assert!(value.get("last_modified").is_none());
    }

    #[test]
    fn test_execute_table_with_no_projects() {
        let output = execute(options(String::new())).unwrap();
        assert!(output.contains("Local Projects"));
        assert!(output.contains("No projects found"));
    }
}
