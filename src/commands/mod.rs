//! CLI commands

pub mod list;
pub mod open;
pub mod paths;
