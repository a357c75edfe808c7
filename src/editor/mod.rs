//! Core project discovery for VS Code-family editors

pub mod history;
pub mod launcher;
pub mod scanner;
pub mod storage;

pub use history::recent_projects;
pub use launcher::{open_project, LaunchError};
pub use scanner::{local_projects, ScanLimits};
