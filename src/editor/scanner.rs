//! Local project discovery
//!
//! Walks user-configured roots and reports every directory beneath them as a
//! project candidate. The walk is bounded by depth and by a global result
//! count shared across all roots.

use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Directory names that are never reported nor descended into
pub const IGNORED_DIR_NAMES: &[&str] = &[
    "node_modules",
    ".git",
    ".venv",
    "venv",
    "dist",
    "build",
    ".DS_Store",
];

/// Bounds on a local scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanLimits {
    /// Deepest directory level that is still listed (the root is level 0)
    pub max_depth: usize,
    /// Maximum number of projects collected across all roots
    pub max_projects: usize,
}

impl Default for ScanLimits {
    fn default() -> Self {
        Self {
            max_depth: 6,
            max_projects: 2000,
        }
    }
}

/// Scan state shared by every root of one invocation
#[derive(Debug)]
pub struct ScanContext {
    limits: ScanLimits,
    seen: HashSet<PathBuf>,
    found: Vec<PathBuf>,
}

impl ScanContext {
    pub fn new(limits: ScanLimits) -> Self {
        Self {
            limits,
            seen: HashSet::new(),
            found: Vec::new(),
        }
    }

    /// Whether the global project budget is exhausted
    pub fn is_full(&self) -> bool {
        self.found.len() >= self.limits.max_projects
    }

    /// Walk one root, adding directories in pre-order until a limit is hit
    pub fn scan_root(&mut self, root: &Path) {
        if self.is_full() {
            return;
        }

        // Entries at depth d + 1 come from listing a directory at depth d
        let walker = WalkDir::new(root)
            .min_depth(1)
            .max_depth(self.limits.max_depth.saturating_add(1))
            .into_iter()
            .filter_entry(|entry| !is_ignored(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!(
                        root = %root.display(),
                        error = %e,
                        "skipping unreadable directory"
                    );
                    continue;
                }
            };

            if !entry.file_type().is_dir() {
                continue;
            }

            let path = entry.into_path();
            if self.seen.insert(path.clone()) {
                self.found.push(path);
            }

            if self.is_full() {
                tracing::info!(
                    limit = self.limits.max_projects,
                    "project limit reached, stopping scan"
                );
                return;
            }
        }
    }

    /// Consume the context, returning projects in discovery order
    pub fn into_projects(self) -> Vec<PathBuf> {
        self.found
    }
}

fn is_ignored(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| IGNORED_DIR_NAMES.contains(&name))
}

/// Split a comma-separated root list into trimmed, non-empty entries
pub fn parse_roots(project_roots: &str) -> Vec<&str> {
    project_roots
        .split(',')
        .map(str::trim)
        .filter(|root| !root.is_empty())
        .collect()
}

/// Replace a leading `~` with `home`
///
/// This is a plain prefix substitution, not shell expansion: `~user` is not
/// resolved to another user's home.
pub fn expand_home(root: &str, home: &Path) -> PathBuf {
    match root.strip_prefix('~') {
        Some(rest) => {
            let mut expanded = OsString::from(home.as_os_str());
            expanded.push(rest);
            PathBuf::from(expanded)
        }
        None => PathBuf::from(root),
    }
}

/// Expand `root` against an optional home directory
///
/// Returns `None` for a `~` root when there is no home to expand it with.
pub fn expand_root(root: &str, home: Option<&Path>) -> Option<PathBuf> {
    match home {
        Some(home) => Some(expand_home(root, home)),
        None if root.starts_with('~') => None,
        None => Some(PathBuf::from(root)),
    }
}

/// Expand every root, skipping `~` roots that cannot be resolved
pub fn expand_roots(roots: &[&str], home: Option<&Path>) -> Vec<PathBuf> {
    roots
        .iter()
        .filter_map(|root| {
            let expanded = expand_root(root, home);
            if expanded.is_none() {
                tracing::warn!(root, "no home directory to expand ~, skipping root");
            }
            expanded
        })
        .collect()
}

/// Discover local projects under the comma-separated `project_roots`
///
/// Blank input returns immediately without touching the filesystem.
/// Missing or unreadable roots contribute nothing.
pub fn local_projects(project_roots: &str, limits: ScanLimits) -> Vec<PathBuf> {
    let roots = parse_roots(project_roots);
    if roots.is_empty() {
        return Vec::new();
    }

    let home = dirs::home_dir();
    scan_roots(expand_roots(&roots, home.as_deref()), limits)
}

/// Scan already-expanded roots one after another
pub fn scan_roots(roots: impl IntoIterator<Item = PathBuf>, limits: ScanLimits) -> Vec<PathBuf> {
    let mut context = ScanContext::new(limits);
    for root in roots {
        if context.is_full() {
            break;
        }
        tracing::debug!(root = %root.display(), "scanning root");
        context.scan_root(&root);
    }
    context.into_projects()
}
