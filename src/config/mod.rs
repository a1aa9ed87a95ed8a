pub mod schema;
pub mod user;

use std::path::{Path, PathBuf};

use crate::error::{Result, ScriptgenError};

pub use schema::{GeneratorConfig, ProjectConfig, ScriptLimits};
pub use user::{load_user_config, UserConfig};

pub const CONFIG_FILE: &str = "scriptgen.toml";

/// A project config together with the file it was read from, if any.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub config: ProjectConfig,
    pub config_path: Option<PathBuf>,
}

impl LoadedConfig {
    /// Configured script directories, relative entries resolved against the
    /// directory holding scriptgen.toml.
    pub fn script_dirs(&self) -> Vec<PathBuf> {
        let base = self
            .config_path
            .as_deref()
            .and_then(Path::parent)
            .unwrap_or_else(|| Path::new("."));
        self.config
            .generator
            .script_dirs
            .iter()
            .map(|dir| {
                if dir.is_absolute() {
                    dir.clone()
                } else {
                    base.join(dir)
                }
            })
            .collect()
    }
}

/// Load and validate a ProjectConfig from a scriptgen.toml file or a directory holding one.
pub fn load_config(path: &Path) -> Result<ProjectConfig> {
    let config_path = if path.ends_with(CONFIG_FILE) {
        path.to_path_buf()
    } else {
        path.join(CONFIG_FILE)
    };

    let content = std::fs::read_to_string(&config_path).map_err(|e| ScriptgenError::Io {
        context: format!("reading {}", config_path.display()),
        source: e,
    })?;

    let config: ProjectConfig =
        toml::from_str(&content).map_err(|e| ScriptgenError::ConfigParse {
            path: config_path,
            source: e,
        })?;

    config.validate()?;

    Ok(config)
}

/// Find the nearest scriptgen.toml in `start` or one of its ancestors.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILE))
        .find(|candidate| candidate.is_file())
}

/// Load the nearest project config for `start`, falling back to defaults.
pub fn discover_config(start: &Path) -> Result<LoadedConfig> {
    match find_config(start) {
        Some(path) => {
            tracing::debug!(config = %path.display(), "loading project config");
            Ok(LoadedConfig {
                config: load_config(&path)?,
                config_path: Some(path),
            })
        }
        None => Ok(LoadedConfig::default()),
    }
}
