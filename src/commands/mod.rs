pub mod check;
pub mod generate;
pub mod list;

use std::path::Path;

use miette::Result;
use scriptgen::logic::LogicRegistry;
use scriptgen::Generator;

use crate::cli::GeneratorArgs;

/// Build a generator from the config governing `start`, with CLI overrides applied.
pub fn build_generator(start: &Path, args: GeneratorArgs) -> Result<Generator> {
    let mut generator = Generator::discover(start, LogicRegistry::new())?;

    for dir in args.scripts {
        generator.registry_mut().add_script_dir(dir);
    }

    let config = generator.config_mut();
    if let Some(extension) = args.extension {
        config.source_extension = extension;
    }
    if let Some(contract) = args.contract {
        config.contract = contract;
    }
    config.validate()?;

    Ok(generator)
}
