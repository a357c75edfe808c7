//! Open command - Open a project with the editor's launcher

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::path::PathBuf;

use editor_projects::config::Editor;
use editor_projects::editor::{launcher, scanner};

/// Resolve the user-supplied project argument, expanding a leading `~`
pub fn resolve_project_path(project: &str) -> Result<PathBuf> {
    scanner::expand_root(project, dirs::home_dir().as_deref())
        .context("Could not determine home directory")
}

/// Execute the open command
pub fn execute(editor: Editor, project: &str, new_window: bool) -> Result<()> {
    let project_path = resolve_project_path(project)?;

    launcher::open_project(editor, &project_path, new_window).with_context(|| {
        if new_window {
            "Failed to open in a new window"
        } else {
            "Failed to open project"
        }
    })?;

    println!(
        "{} {} in {}",
        "Opened:".green(),
        project_path.display(),
        editor
    );
    Ok(())
}
