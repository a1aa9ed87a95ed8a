use std::collections::hash_map::{Entry, HashMap};
use std::path::{Path, PathBuf};

use crate::config::find_config;
use crate::error::FailureKind;
use crate::{config_root, GenerationPlan, Generator};

/// Result of checking a template document without writing anything.
pub struct CheckResult {
    pub template: PathBuf,
    /// Present when the whole pipeline short of the write succeeded.
    pub plan: Option<GenerationPlan>,
    pub failure: Option<FailureKind>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl CheckResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validate a template document and dry-run its generation logic.
pub fn check_template(generator: &Generator, path: &Path) -> CheckResult {
    let mut warnings = Vec::new();
    let mut errors = Vec::new();

    let (plan, failure) = match generator.plan(path) {
        Ok(plan) => (Some(plan), None),
        Err(e) => {
            errors.push(e.to_string());
            (None, Some(e.kind()))
        }
    };

    if let Some(plan) = &plan {
        if plan.uses_fallback_name() {
            warnings.push(format!(
                "\"{}\" declares no output name; output falls back to {}",
                plan.type_name,
                plan.output_path.display()
            ));
        }
        if plan.output_path.exists() {
            warnings.push(format!(
                "{} already exists and will be overwritten",
                plan.output_path.display()
            ));
        }
    }

    CheckResult {
        template: path.to_path_buf(),
        plan,
        failure,
        warnings,
        errors,
    }
}

/// Check every template document under `dir`, in path order.
///
/// Each file is judged by the generator `build` returns for the file's own
/// directory, the same way `generate` would see it. Files governed by one
/// scriptgen.toml share a generator, and only those ending in that
/// generator's template suffix are checked.
pub fn check_all<F, E>(dir: &Path, mut build: F) -> Result<Vec<CheckResult>, E>
where
    F: FnMut(&Path) -> Result<Generator, E>,
{
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect();
    files.sort();

    let mut generators: HashMap<Option<PathBuf>, Generator> = HashMap::new();
    let mut results = Vec::new();

    for path in files {
        let root = config_root(&path);
        let generator = match generators.entry(find_config(root)) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(build(root)?),
        };

        if path.to_string_lossy().ends_with(&generator.template_suffix()) {
            results.push(check_template(generator, &path));
        }
    }

    Ok(results)
}
