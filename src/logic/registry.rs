use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::ScriptLimits;
use crate::error::{Result, ScriptgenError};
use crate::logic::script::{compile_script, create_engine, defines_fn, ScriptLogic, PRODUCE_FN};
use crate::logic::GenerationLogic;

pub const SCRIPT_EXTENSION: &str = "rhai";

/// Constructor for a natively registered generation type, fed the template's raw text.
pub type LogicFactory = Box<dyn Fn(String) -> Box<dyn GenerationLogic> + Send + Sync>;

/// Maps declared type names to the generation logic that implements them.
///
/// Native factories take precedence. Otherwise a type `Foo` is served by the
/// first `Foo.rhai` found in the template's own directory, then in each
/// script directory in the order they were added.
#[derive(Default)]
pub struct LogicRegistry {
    factories: BTreeMap<String, LogicFactory>,
    script_dirs: Vec<PathBuf>,
    limits: ScriptLimits,
}

impl std::fmt::Debug for LogicRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogicRegistry")
            .field("factories", &self.factories.keys().collect::<Vec<_>>())
            .field("script_dirs", &self.script_dirs)
            .field("limits", &self.limits)
            .finish()
    }
}

impl LogicRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F, L>(&mut self, type_name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(String) -> L + Send + Sync + 'static,
        L: GenerationLogic + 'static,
    {
        self.factories.insert(
            type_name.into(),
            Box::new(move |text| Box::new(factory(text)) as Box<dyn GenerationLogic>),
        );
        self
    }

    pub fn add_script_dir(&mut self, dir: impl Into<PathBuf>) -> &mut Self {
        let dir = dir.into();
        if !self.script_dirs.contains(&dir) {
            self.script_dirs.push(dir);
        }
        self
    }

    pub fn set_limits(&mut self, limits: ScriptLimits) -> &mut Self {
        self.limits = limits;
        self
    }

    pub fn is_registered(&self, type_name: &str) -> bool {
        self.factories.contains_key(type_name)
    }

    pub fn registered_types(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn script_dirs(&self) -> &[PathBuf] {
        &self.script_dirs
    }

    /// Locate the generator script for `type_name`, if any.
    pub fn find_script(&self, type_name: &str, template_dir: Option<&Path>) -> Option<PathBuf> {
        let file_name = format!("{type_name}.{SCRIPT_EXTENSION}");
        template_dir
            .into_iter()
            .chain(self.script_dirs.iter().map(PathBuf::as_path))
            .map(|dir| dir.join(&file_name))
            .find(|candidate| candidate.is_file())
    }

    /// Instantiate the logic for `type_name` declared in the template at `template`.
    pub fn instantiate(
        &self,
        template: &Path,
        type_name: &str,
        contract: &str,
        raw_text: String,
    ) -> Result<Box<dyn GenerationLogic>> {
        if let Some(factory) = self.factories.get(type_name) {
            tracing::debug!(type_name, "instantiating native generation logic");
            return Ok(factory(raw_text));
        }

        let template_dir = template.parent();
        let script = self
            .find_script(type_name, template_dir)
            .ok_or_else(|| ScriptgenError::UnregisteredLogic {
                path: template.to_path_buf(),
                type_name: type_name.to_string(),
            })?;

        tracing::debug!(type_name, script = %script.display(), "loading generator script");

        let engine = create_engine(&self.limits);
        let ast = compile_script(&engine, &script)?;

        if !defines_fn(&ast, PRODUCE_FN, 1) {
            return Err(ScriptgenError::LogicDoesNotConform {
                path: template.to_path_buf(),
                type_name: type_name.to_string(),
                contract: contract.to_string(),
            });
        }

        Ok(Box::new(ScriptLogic::new(engine, ast, script, raw_text)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use std::fs;

    struct Echo(String);

    impl GenerationLogic for Echo {
        fn output_name(&self) -> Option<&str> {
            Some("Echo")
        }

        fn produce(&self) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_native_factory_receives_raw_text() {
        let mut registry = LogicRegistry::new();
        registry.register("EchoTemplate", Echo);

        let logic = registry
            .instantiate(
                Path::new("Echo.template.rs"),
                "EchoTemplate",
                "ClassTemplate",
                "raw".into(),
            )
            .unwrap();
        assert_eq!(logic.output_name(), Some("Echo"));
        assert_eq!(logic.produce().unwrap(), "raw");
        assert!(registry.is_registered("EchoTemplate"));
        assert_eq!(registry.registered_types().collect::<Vec<_>>(), ["EchoTemplate"]);
    }

    #[test]
    fn test_unregistered_type() {
        let dir = tempfile::tempdir().unwrap();
        let registry = LogicRegistry::new();
        let err = registry
            .instantiate(
                &dir.path().join("Foo.template.rs"),
                "FooTemplate",
                "ClassTemplate",
                String::new(),
            )
            .err()
            .unwrap();
        assert_eq!(err.kind(), FailureKind::UnregisteredLogic);
        assert!(err.to_string().contains("FooTemplate"));
    }

    #[test]
    fn test_template_dir_script_wins_over_script_dirs() {
        let template_dir = tempfile::tempdir().unwrap();
        let shared_dir = tempfile::tempdir().unwrap();
        fs::write(
            template_dir.path().join("FooTemplate.rhai"),
            r#"fn produce(text) { "local" }"#,
        )
        .unwrap();
        fs::write(
            shared_dir.path().join("FooTemplate.rhai"),
            r#"fn produce(text) { "shared" }"#,
        )
        .unwrap();

        let mut registry = LogicRegistry::new();
        registry.add_script_dir(shared_dir.path());

        let logic = registry
            .instantiate(
                &template_dir.path().join("Foo.template.rs"),
                "FooTemplate",
                "ClassTemplate",
                String::new(),
            )
            .unwrap();
        assert_eq!(logic.produce().unwrap(), "local");
    }

    #[test]
    fn test_script_dir_fallback() {
        let template_dir = tempfile::tempdir().unwrap();
        let shared_dir = tempfile::tempdir().unwrap();
        fs::write(
            shared_dir.path().join("FooTemplate.rhai"),
            r#"fn produce(text) { "shared" }"#,
        )
        .unwrap();

        let mut registry = LogicRegistry::new();
        registry.add_script_dir(shared_dir.path());
        registry.add_script_dir(shared_dir.path());
        assert_eq!(registry.script_dirs().len(), 1);
        assert_eq!(
            registry.find_script("FooTemplate", Some(template_dir.path())),
            Some(shared_dir.path().join("FooTemplate.rhai"))
        );

        let logic = registry
            .instantiate(
                &template_dir.path().join("Foo.template.rs"),
                "FooTemplate",
                "ClassTemplate",
                String::new(),
            )
            .unwrap();
        assert_eq!(logic.produce().unwrap(), "shared");
    }

    #[test]
    fn test_script_without_produce_does_not_conform() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("FooTemplate.rhai"),
            r#"fn output_name(text) { "Foo" }"#,
        )
        .unwrap();

        let registry = LogicRegistry::new();
        let err = registry
            .instantiate(
                &dir.path().join("Foo.template.rs"),
                "FooTemplate",
                "ClassTemplate",
                String::new(),
            )
            .err()
            .unwrap();
        assert_eq!(err.kind(), FailureKind::LogicDoesNotConform);
    }

    #[test]
    fn test_script_syntax_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("FooTemplate.rhai"), "fn produce(text) {").unwrap();

        let registry = LogicRegistry::new();
        let err = registry
            .instantiate(
                &dir.path().join("Foo.template.rs"),
                "FooTemplate",
                "ClassTemplate",
                String::new(),
            )
            .err()
            .unwrap();
        assert_eq!(err.kind(), FailureKind::Script);
    }
}
