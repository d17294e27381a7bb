use crate::paths::{global_config_path, local_config_path};

/// Load config file content from CWD first, then the user config directory
///
/// Searches for:
/// 1. `.gh-pr-projects.toml` in the current working directory
/// 2. `config.toml` in the platform config directory (see [`crate::paths`])
///
/// Returns the file content if found, None otherwise.
pub fn load_config_file() -> Option<String> {
    if let Ok(local_config) = local_config_path() {
        if let Ok(content) = std::fs::read_to_string(&local_config) {
            log::debug!("Loaded config from {}", local_config.display());
            return Some(content);
        }
    }

    if let Ok(global_config) = global_config_path() {
        if let Ok(content) = std::fs::read_to_string(&global_config) {
            log::debug!("Loaded config from {}", global_config.display());
            return Some(content);
        }
    }

    None
}
