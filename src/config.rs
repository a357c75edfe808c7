//! Platform-specific configuration and paths

use anyhow::{Context, Result};
use std::fmt;
use std::path::PathBuf;

/// Supported editors
///
/// All three are VS Code derivatives sharing the same `storage.json` layout;
/// only the application directory name and the launcher executable differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Editor {
    /// Visual Studio Code
    #[value(name = "code", alias = "vscode")]
    VsCode,
    /// Cursor
    Cursor,
    /// Antigravity
    Antigravity,
}

impl Editor {
    /// Human-readable product name
    pub fn display_name(self) -> &'static str {
        match self {
            Self::VsCode => "VS Code",
            Self::Cursor => "Cursor",
            Self::Antigravity => "Antigravity",
        }
    }

    /// Directory name used under the platform application-data directory
    pub fn app_dir_name(self) -> &'static str {
        match self {
            Self::VsCode => "Code",
            Self::Cursor => "Cursor",
            Self::Antigravity => "Antigravity",
        }
    }

    /// Name of the launcher executable as found on PATH
    pub fn binary_name(self) -> &'static str {
        match self {
            Self::VsCode => "code",
            Self::Cursor => "cursor",
            Self::Antigravity => "antigravity",
        }
    }
}

impl fmt::Display for Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Operating system families with distinct path conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    /// Linux and any other Unix-like system
    Linux,
    Windows,
}

impl Platform {
    /// The platform this binary was compiled for
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Self::MacOs
        } else if cfg!(windows) {
            Self::Windows
        } else {
            Self::Linux
        }
    }
}

/// User directories the storage lookup depends on
#[derive(Debug, Clone)]
pub struct PlatformDirs {
    /// The user's home directory
    pub home: PathBuf,
    /// `$XDG_CONFIG_HOME` on Linux, `%APPDATA%` on Windows
    pub config: Option<PathBuf>,
}

impl PlatformDirs {
    /// Detect the directories of the current user
    pub fn detect() -> Result<Self> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(Self {
            home,
            config: dirs::config_dir(),
        })
    }
}

/// Get the editor's global storage file
/// - macOS: ~/Library/Application Support/<App>/User/globalStorage/storage.json
/// - Linux: ~/.config/<App>/User/globalStorage/storage.json
/// - Windows: %APPDATA%/<App>/User/globalStorage/storage.json
pub fn storage_path(editor: Editor, platform: Platform, dirs: &PlatformDirs) -> PathBuf {
    let app_data = match platform {
        Platform::MacOs => dirs.home.join("Library").join("Application Support"),
        Platform::Linux => dirs
            .config
            .clone()
            .unwrap_or_else(|| dirs.home.join(".config")),
        Platform::Windows => dirs
            .config
            .clone()
            .unwrap_or_else(|| dirs.home.join("AppData").join("Roaming")),
    };

    app_data
        .join(editor.app_dir_name())
        .join("User")
        .join("globalStorage")
        .join("storage.json")
}

/// Storage file of `editor` for the current user and platform
pub fn current_storage_path(editor: Editor) -> Result<PathBuf> {
    let dirs = PlatformDirs::detect()?;
    Ok(storage_path(editor, Platform::current(), &dirs))
}
