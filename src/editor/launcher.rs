//! Editor launcher discovery and invocation
//!
//! Looks for the editor's command-line launcher in a few well-known install
//! locations before falling back to a PATH lookup.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use thiserror::Error;

use crate::config::{Editor, Platform};

/// Flag accepted by all supported editors to force a new window
pub const NEW_WINDOW_FLAG: &str = "-n";

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("{editor} CLI not found. Please ensure '{binary}' is installed and in your PATH.")]
    NotFound {
        editor: Editor,
        binary: &'static str,
    },

    #[error("Project path does not exist: {}", .0.display())]
    MissingProject(PathBuf),

    #[error("Failed to run {path}: {source}", path = .cli.display())]
    Spawn {
        cli: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "{path} exited with {status}{detail}",
        path = .cli.display(),
        detail = format_stderr(.stderr)
    )]
    Failed {
        cli: PathBuf,
        status: ExitStatus,
        stderr: String,
    },
}

fn format_stderr(stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {}", stderr)
    }
}

/// Environment the fixed install locations are derived from
#[derive(Debug, Clone, Default)]
pub struct LauncherEnv {
    pub home: Option<PathBuf>,
    /// `%ProgramFiles%`
    pub program_files: Option<PathBuf>,
    /// `%ProgramFiles(x86)%`
    pub program_files_x86: Option<PathBuf>,
}

impl LauncherEnv {
    pub fn detect() -> Self {
        Self {
            home: dirs::home_dir(),
            program_files: std::env::var_os("ProgramFiles").map(PathBuf::from),
            program_files_x86: std::env::var_os("ProgramFiles(x86)").map(PathBuf::from),
        }
    }
}

/// Well-known launcher locations for `editor` on `platform`, in priority order
///
/// Locations depending on an unset variable are left out.
pub fn cli_candidates(editor: Editor, platform: Platform, env: &LauncherEnv) -> Vec<PathBuf> {
    let binary = editor.binary_name();

    match platform {
        Platform::MacOs => {
            let user_install = env.home.as_ref().map(|home| match editor {
                Editor::VsCode => home.join(".vscode").join("bin").join("code"),
                Editor::Cursor => home.join(".cursor").join("bin").join("cursor"),
                Editor::Antigravity => home
                    .join(".antigravity")
                    .join("antigravity")
                    .join("bin")
                    .join("antigravity"),
            });

            [
                Some(Path::new("/usr/local/bin").join(binary)),
                Some(Path::new("/opt/homebrew/bin").join(binary)),
                user_install,
            ]
            .into_iter()
            .flatten()
            .collect()
        }

        Platform::Linux => vec![
            Path::new("/usr/local/bin").join(binary),
            Path::new("/usr/bin").join(binary),
        ],

        Platform::Windows => {
            let relative = match editor {
                Editor::VsCode => Path::new("Microsoft VS Code").join("bin").join("code.cmd"),
                Editor::Cursor => Path::new("Cursor").join("cursor.exe"),
                Editor::Antigravity => Path::new("Antigravity").join("antigravity.exe"),
            };

            [&env.program_files, &env.program_files_x86]
                .into_iter()
                .flatten()
                .map(|base| base.join(&relative))
                .collect()
        }
    }
}

/// First candidate that exists on disk
pub fn first_existing(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates.iter().find(|path| path.exists()).cloned()
}

/// Locate the launcher for `editor` on the current machine
pub fn locate_cli(editor: Editor) -> Result<PathBuf, LaunchError> {
    let candidates = cli_candidates(editor, Platform::current(), &LauncherEnv::detect());
    resolve_cli(editor, &candidates)
}

/// Resolve the launcher from `candidates`, falling back to PATH
pub fn resolve_cli(editor: Editor, candidates: &[PathBuf]) -> Result<PathBuf, LaunchError> {
    if let Some(cli) = first_existing(candidates) {
        tracing::debug!(cli = %cli.display(), "found launcher at install location");
        return Ok(cli);
    }

    let binary = editor.binary_name();
    match which::which(binary) {
        Ok(cli) => {
            tracing::debug!(cli = %cli.display(), "found launcher on PATH");
            Ok(cli)
        }
        Err(e) => {
            tracing::debug!(binary, error = %e, "launcher not on PATH");
            Err(LaunchError::NotFound { editor, binary })
        }
    }
}

/// Arguments passed to the launcher to open `project`
pub fn open_args(project: &Path, new_window: bool) -> Vec<&OsStr> {
    let mut args: Vec<&OsStr> = Vec::with_capacity(2);
    if new_window {
        args.push(NEW_WINDOW_FLAG.as_ref());
    }
    args.push(project.as_os_str());
    args
}

/// Run `cli` to open `project` and wait for it to exit
pub fn open_with(cli: &Path, project: &Path, new_window: bool) -> Result<(), LaunchError> {
    if !project.exists() {
        return Err(LaunchError::MissingProject(project.to_path_buf()));
    }

    tracing::info!(
        cli = %cli.display(),
        project = %project.display(),
        new_window,
        "opening project"
    );

    let output = Command::new(cli)
        .args(open_args(project, new_window))
        .output()
        .map_err(|source| LaunchError::Spawn {
            cli: cli.to_path_buf(),
            source,
        })?;

    if !output.status.success() {
        return Err(LaunchError::Failed {
            cli: cli.to_path_buf(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    Ok(())
}

/// Open `project` in `editor`
pub fn open_project(editor: Editor, project: &Path, new_window: bool) -> Result<(), LaunchError> {
    let cli = locate_cli(editor)?;
    open_with(&cli, project, new_window)
}
