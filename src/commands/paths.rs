//! Paths command - Show where editor data and the launcher are looked up

use anyhow::Result;
use owo_colors::OwoColorize;
use std::path::Path;

use editor_projects::config::{self, Editor, Platform};
use editor_projects::editor::launcher::{self, LauncherEnv};

/// Execute the paths command and return formatted output
pub fn execute(editor: Editor) -> Result<String> {
    let storage_path = config::current_storage_path(editor)?;
    let candidates = launcher::cli_candidates(editor, Platform::current(), &LauncherEnv::detect());

    let mut lines = vec![
        format!("{}", editor.bold()),
        format!(
            "  Storage file: {} {}",
            storage_path.display(),
            presence(&storage_path)
        ),
        "  Launcher candidates:".to_string(),
    ];
    lines.extend(
        candidates
            .iter()
            .map(|path| format!("    {} {}", path.display(), presence(path))),
    );

    match launcher::resolve_cli(editor, &candidates) {
        Ok(cli) => lines.push(format!("  Launcher: {}", cli.display().green())),
        Err(e) => lines.push(format!("  Launcher: {}", e.red())),
    }

    Ok(lines.join("\n"))
}

fn presence(path: &Path) -> String {
    if path.exists() {
        "(found)".green().to_string()
    } else {
        "(missing)".dimmed().to_string()
    }
}
