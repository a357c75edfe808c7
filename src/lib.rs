//! editor-projects library
//!
//! Finds recent and local projects for VS Code, Cursor and Antigravity and
//! opens them through the editor's command-line launcher.
//!
//! Recent projects come from the editor's `globalStorage/storage.json`; local
//! projects come from a bounded walk of user-configured root directories.

pub mod config;
pub mod editor;
pub mod logging;
