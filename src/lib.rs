pub mod check;
pub mod config;
pub mod error;
pub mod logic;
pub mod resolve;
pub mod slice;
pub mod validate;

use std::path::{Path, PathBuf};

use crate::config::{discover_config, load_user_config, GeneratorConfig};
use crate::error::{Result, ScriptgenError};
use crate::logic::{derive_name, LogicRegistry, FALLBACK_NAME};
use crate::resolve::{resolve_document, ResolvedTemplate};
use crate::validate::validate_selection;

pub use crate::logic::GenerationLogic;
pub use crate::slice::substring_between;

/// Everything needed to write a generated file, computed without touching the filesystem.
#[derive(Debug, Clone)]
pub struct GenerationPlan {
    pub template: PathBuf,
    /// Generation type declared by the template.
    pub type_name: String,
    /// Declared output name, or the `_` fallback.
    pub output_name: String,
    pub output_path: PathBuf,
    pub content: String,
}

impl GenerationPlan {
    pub fn uses_fallback_name(&self) -> bool {
        self.output_name == FALLBACK_NAME
    }
}

/// A source file written by a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    pub path: PathBuf,
    pub type_name: String,
    pub output_name: String,
    pub content: String,
}

/// Generates source files from template documents.
///
/// Holds no per-run state: each call validates, resolves and produces from
/// scratch. Runs writing to the same output path are not serialized; the
/// last write wins.
#[derive(Debug)]
pub struct Generator {
    registry: LogicRegistry,
    config: GeneratorConfig,
}

impl Generator {
    pub fn new(registry: LogicRegistry, config: GeneratorConfig) -> Self {
        Self { registry, config }
    }

    /// Build a generator configured from the scriptgen.toml nearest to `start`
    /// and the user config, extending `registry` with their script directories.
    pub fn discover(start: &Path, mut registry: LogicRegistry) -> Result<Self> {
        let loaded = discover_config(start)?;
        registry.set_limits(loaded.config.limits);
        for dir in loaded.script_dirs() {
            registry.add_script_dir(dir);
        }

        if let Some(user) = load_user_config()? {
            for dir in user.script_dirs {
                registry.add_script_dir(dir);
            }
        }

        Ok(Self::new(registry, loaded.config.generator))
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut GeneratorConfig {
        &mut self.config
    }

    pub fn registry(&self) -> &LogicRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut LogicRegistry {
        &mut self.registry
    }

    /// Suffix template documents must carry, e.g. `.template.rs`.
    pub fn template_suffix(&self) -> String {
        self.config.template_suffix()
    }

    /// Pre-flight check of a selected template path. Has no side effects.
    pub fn validate(&self, path: &Path) -> Result<()> {
        validate_selection(path, &self.template_suffix())
    }

    /// Validate `path` and instantiate the generation logic it declares.
    pub fn resolve(&self, path: &Path) -> Result<ResolvedTemplate> {
        self.validate(path)?;
        resolve_document(path, &self.registry, &self.config.contract)
    }

    /// Run the pipeline up to, but not including, the write.
    pub fn plan(&self, path: &Path) -> Result<GenerationPlan> {
        let resolved = self.resolve(path)?;

        let output_name = derive_name(resolved.logic.as_ref(), FALLBACK_NAME);
        let output_path = output_path(path, &output_name, &self.config.source_extension);
        check_output_name(path, &output_name, &output_path)?;
        tracing::debug!(
            type_name = %resolved.type_name,
            output = %output_path.display(),
            "producing source text"
        );

        let content = resolved.logic.produce()?;

        Ok(GenerationPlan {
            template: resolved.path,
            type_name: resolved.type_name,
            output_name,
            output_path,
            content,
        })
    }

    /// Write a planned file, overwriting whatever is at its output path.
    pub fn execute(&self, plan: GenerationPlan) -> Result<GeneratedArtifact> {
        std::fs::write(&plan.output_path, &plan.content).map_err(|e| ScriptgenError::Io {
            context: format!("writing {}", plan.output_path.display()),
            source: e,
        })?;

        tracing::info!(
            name = %plan.output_name,
            path = %plan.output_path.display(),
            "generated source file"
        );

        Ok(GeneratedArtifact {
            path: plan.output_path,
            type_name: plan.type_name,
            output_name: plan.output_name,
            content: plan.content,
        })
    }

    /// Generate the source file declared by the template at `path`.
    ///
    /// Writes exactly one file on success and nothing on failure.
    pub fn generate(&self, path: &Path) -> Result<GeneratedArtifact> {
        let plan = self.plan(path)?;
        self.execute(plan)
    }
}

/// Path of the generated file: the template's directory, named `<name>.<extension>`.
pub fn output_path(template: &Path, name: &str, extension: &str) -> PathBuf {
    template.with_file_name(format!("{name}.{extension}"))
}

/// Reject output names that would leave the template's directory or
/// replace the template document itself.
fn check_output_name(template: &Path, name: &str, output: &Path) -> Result<()> {
    let reason = if name.chars().any(std::path::is_separator) || name == ".." {
        "Output names must not contain path separators"
    } else if output == template {
        "The output would overwrite the template document"
    } else {
        return Ok(());
    };

    Err(ScriptgenError::InvalidOutputName {
        path: template.to_path_buf(),
        name: name.to_string(),
        reason: reason.to_string(),
    })
}

/// Directory whose scriptgen.toml governs the template at `path`.
pub fn config_root(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Generate a source file from a template using discovered configuration
/// and script-only generation logic.
pub fn generate(path: &Path) -> Result<GeneratedArtifact> {
    Generator::discover(config_root(path), LogicRegistry::new())?.generate(path)
}
