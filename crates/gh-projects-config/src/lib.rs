//! Configuration for gh-pr-projects
//!
//! This crate provides:
//! - Config file discovery (CWD first, then the user config directory)
//! - Application configuration (AppConfig)

pub mod app_config;
pub mod config_file;
pub mod paths;

pub use app_config::AppConfig;
pub use config_file::load_config_file;
pub use paths::{config_dir, global_config_path, local_config_path, CONFIG_FILE};
