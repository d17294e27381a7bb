//! Configuration file locations
//!
//! Uses XDG directories via `dirs` crate.
//!
//! Platform-specific locations:
//! - Linux: `~/.config/gh-pr-projects/config.toml`
//! - macOS: `~/Library/Application Support/gh-pr-projects/config.toml`
//! - Windows: `%APPDATA%\gh-pr-projects\config.toml`

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_NAME: &str = "gh-pr-projects";

/// Name of the per-repository config file, looked up in the working directory
pub const CONFIG_FILE: &str = ".gh-pr-projects.toml";

/// Get the application config directory
///
/// The directory is not created; it only needs to exist when a user puts
/// a config file there.
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine config directory")?;
    Ok(base.join(APP_NAME))
}

/// Get path to the global config file
pub fn global_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Get path to the config file in the working directory
pub fn local_config_path() -> Result<PathBuf> {
    Ok(std::env::current_dir()?.join(CONFIG_FILE))
}
