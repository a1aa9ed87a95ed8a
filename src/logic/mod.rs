pub mod registry;
pub mod script;

use crate::error::Result;

pub use registry::{LogicFactory, LogicRegistry};
pub use script::{create_engine, ScriptLogic};

/// Output name used when the generation logic declares none.
pub const FALLBACK_NAME: &str = "_";

/// Generation logic resolved from a template document.
///
/// Implementations are constructed from the template's raw text and own it
/// for the duration of a single run.
pub trait GenerationLogic {
    /// Explicit output name, without extension. `None` means unnamed.
    fn output_name(&self) -> Option<&str> {
        None
    }

    /// Produce the final source text.
    fn produce(&self) -> Result<String>;
}

/// The declared output name of `logic`, or `fallback` when it declares none.
pub fn derive_name(logic: &dyn GenerationLogic, fallback: &str) -> String {
    match logic.output_name() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => fallback.to_string(),
    }
}
