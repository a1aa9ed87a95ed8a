use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScriptgenError};

/// User-level configuration loaded from `~/.config/scriptgen/config.toml`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UserConfig {
    /// Generator script directories shared by every project, searched after
    /// the project's own script directories.
    #[serde(default)]
    pub script_dirs: Vec<PathBuf>,
}

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("scriptgen").join("config.toml"))
}

/// Load user configuration from the XDG config directory.
///
/// Returns `Ok(None)` if the config file does not exist.
/// Returns `Err` if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<Option<UserConfig>> {
    let path = match config_path() {
        Some(p) => p,
        None => return Ok(None),
    };

    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&path).map_err(|e| ScriptgenError::Io {
        context: format!("reading user config {}", path.display()),
        source: e,
    })?;

    let config: UserConfig =
        toml::from_str(&content).map_err(|e| ScriptgenError::ConfigParse { path, source: e })?;

    Ok(Some(config))
}
