use std::path::{Path, PathBuf};

use rhai::{Dynamic, Engine, Scope, AST};

use crate::config::ScriptLimits;
use crate::error::{Result, ScriptgenError};
use crate::logic::GenerationLogic;
use crate::slice::substring_between;

pub const PRODUCE_FN: &str = "produce";
pub const OUTPUT_NAME_FN: &str = "output_name";

/// Create a sandboxed Rhai engine with scriptgen-specific functions.
pub fn create_engine(limits: &ScriptLimits) -> Engine {
    let mut engine = Engine::new();

    engine.set_max_call_levels(limits.max_call_levels);
    engine.set_max_operations(limits.max_operations);
    engine.set_max_string_size(limits.max_string_size);

    engine.register_fn(
        "substring_between",
        |input: &str, start: &str, end: &str| -> String {
            substring_between(input, start, end).to_string()
        },
    );

    engine
}

/// Compile a generator script from disk.
pub fn compile_script(engine: &Engine, script: &Path) -> Result<AST> {
    let source = std::fs::read_to_string(script).map_err(|e| ScriptgenError::Io {
        context: format!("reading generator script {}", script.display()),
        source: e,
    })?;

    engine.compile(&source).map_err(|e| ScriptgenError::Script {
        script: script.to_path_buf(),
        message: e.to_string(),
    })
}

/// Whether the script defines `name` taking exactly `arity` parameters.
pub fn defines_fn(ast: &AST, name: &str, arity: usize) -> bool {
    ast.iter_functions()
        .any(|f| f.name == name && f.params.len() == arity)
}

/// Generation logic backed by a Rhai script.
///
/// The script must define `fn produce(text)` and may define
/// `fn output_name(text)`; both receive the template's raw text.
pub struct ScriptLogic {
    engine: Engine,
    ast: AST,
    script: PathBuf,
    text: String,
    output_name: Option<String>,
}

impl std::fmt::Debug for ScriptLogic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptLogic")
            .field("script", &self.script)
            .field("output_name", &self.output_name)
            .finish_non_exhaustive()
    }
}

impl ScriptLogic {
    /// Instantiate the script's logic for `text`, evaluating its declared
    /// output name up front.
    pub fn new(engine: Engine, ast: AST, script: PathBuf, text: String) -> Result<Self> {
        let mut logic = Self {
            engine,
            ast,
            script,
            text,
            output_name: None,
        };

        if defines_fn(&logic.ast, OUTPUT_NAME_FN, 1) {
            let value = logic.call(OUTPUT_NAME_FN)?;
            let output_name = if value.is_unit() {
                None
            } else if value.is_string() {
                let name = value.into_string().unwrap_or_default();
                let name = name.trim();
                (!name.is_empty()).then(|| name.to_string())
            } else {
                return Err(logic.type_error(OUTPUT_NAME_FN, &value));
            };
            logic.output_name = output_name;
        }

        Ok(logic)
    }

    pub fn script(&self) -> &Path {
        &self.script
    }

    fn call(&self, name: &str) -> Result<Dynamic> {
        let mut scope = Scope::new();
        self.engine
            .call_fn::<Dynamic>(&mut scope, &self.ast, name, (self.text.clone(),))
            .map_err(|e| ScriptgenError::Script {
                script: self.script.clone(),
                message: format!("{name}(text): {e}"),
            })
    }

    fn type_error(&self, name: &str, value: &Dynamic) -> ScriptgenError {
        ScriptgenError::Script {
            script: self.script.clone(),
            message: format!("{name}(text) must return a string, got {}", value.type_name()),
        }
    }
}

impl GenerationLogic for ScriptLogic {
    fn output_name(&self) -> Option<&str> {
        self.output_name.as_deref()
    }

    fn produce(&self) -> Result<String> {
        let value = self.call(PRODUCE_FN)?;
        if !value.is_string() {
            return Err(self.type_error(PRODUCE_FN, &value));
        }
        Ok(value.into_string().unwrap_or_default())
    }
}
