use std::path::PathBuf;

use console::style;
use miette::Result;
use scriptgen::config_root;

use super::build_generator;
use crate::cli::GeneratorArgs;

pub fn run(path: PathBuf, args: GeneratorArgs, dry_run: bool) -> Result<()> {
    let generator = build_generator(config_root(&path), args)?;

    if dry_run {
        let plan = generator.plan(&path)?;

        println!(
            "\n{} Dry run: \"{}\" would be generated at {}",
            style("==>").cyan().bold(),
            plan.output_name,
            style(plan.output_path.display()).cyan()
        );
        println!("  {}", style("──────").dim());
        for line in plan.content.lines() {
            println!("  {}", line);
        }
        println!("  {}", style("──────").dim());

        if plan.uses_fallback_name() {
            eprintln!(
                "{} \"{}\" declares no output name",
                style("warning:").yellow().bold(),
                plan.type_name
            );
        }

        println!(
            "\n{} Dry run: no files written.",
            style("\u{2139}").blue().bold()
        );
        return Ok(());
    }

    let artifact = generator.generate(&path)?;

    println!(
        "{} \"{}\" generated at \"{}\"",
        style("✓").green().bold(),
        artifact.output_name,
        style(artifact.path.display()).cyan()
    );

    Ok(())
}
