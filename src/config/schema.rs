use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScriptgenError};

/// Root config structure deserialized from scriptgen.toml.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub generator: GeneratorConfig,

    #[serde(default)]
    pub limits: ScriptLimits,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneratorConfig {
    /// Extension of generated files, without the leading dot.
    /// Template documents use `.template.<source_extension>`.
    #[serde(default = "default_source_extension")]
    pub source_extension: String,

    /// Name of the contract a template's generation type must implement.
    #[serde(default = "default_contract")]
    pub contract: String,

    /// Extra directories searched for generator scripts.
    #[serde(default)]
    pub script_dirs: Vec<PathBuf>,
}

fn default_source_extension() -> String {
    "rs".to_string()
}

fn default_contract() -> String {
    "ClassTemplate".to_string()
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            source_extension: default_source_extension(),
            contract: default_contract(),
            script_dirs: Vec::new(),
        }
    }
}

/// Sandbox limits applied to every generator script engine.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct ScriptLimits {
    #[serde(default = "default_max_operations")]
    pub max_operations: u64,
    #[serde(default = "default_max_call_levels")]
    pub max_call_levels: usize,
    #[serde(default = "default_max_string_size")]
    pub max_string_size: usize,
}

fn default_max_operations() -> u64 {
    1_000_000
}

fn default_max_call_levels() -> usize {
    32
}

fn default_max_string_size() -> usize {
    10 * 1024 * 1024
}

impl Default for ScriptLimits {
    fn default() -> Self {
        Self {
            max_operations: default_max_operations(),
            max_call_levels: default_max_call_levels(),
            max_string_size: default_max_string_size(),
        }
    }
}

impl GeneratorConfig {
    /// Suffix every template document must end with, e.g. `.template.rs`.
    pub fn template_suffix(&self) -> String {
        format!(".template.{}", self.source_extension)
    }

    pub fn validate(&self) -> Result<()> {
        let ext = &self.source_extension;
        if ext.is_empty() || ext.contains('.') || ext.contains(std::path::is_separator) {
            return Err(ScriptgenError::ConfigInvalid {
                reason: format!(
                    "source_extension must be a bare extension like \"rs\", got \"{ext}\""
                ),
            });
        }

        if self.contract.trim().is_empty() {
            return Err(ScriptgenError::ConfigInvalid {
                reason: "contract must not be empty".into(),
            });
        }

        Ok(())
    }
}

impl ProjectConfig {
    /// Validate the config for internal consistency.
    pub fn validate(&self) -> Result<()> {
        self.generator.validate()
    }
}
