use std::path::PathBuf;

use console::style;
use miette::Result;

use scriptgen::check::check_template;
use scriptgen::config_root;

use super::build_generator;
use crate::cli::GeneratorArgs;

pub fn run(path: PathBuf, args: GeneratorArgs) -> Result<()> {
    let generator = build_generator(config_root(&path), args)?;

    println!(
        "{} {}",
        style("Checking template at").bold(),
        style(path.display()).cyan()
    );

    let result = check_template(&generator, &path);

    if let Some(plan) = &result.plan {
        println!("  Type: {}", plan.type_name);
        println!("  Output name: {}", plan.output_name);
        println!("  Output path: {}", plan.output_path.display());
    }

    if !result.warnings.is_empty() {
        println!("\n{}", style("Warnings:").yellow().bold());
        for w in &result.warnings {
            println!("  {} {}", style("⚠").yellow(), w);
        }
    }

    if !result.errors.is_empty() {
        println!("\n{}", style("Errors:").red().bold());
        for e in &result.errors {
            println!("  {} {}", style("✗").red(), e);
        }
        println!(
            "\n{} Template has {} error(s)",
            style("✗").red().bold(),
            result.errors.len()
        );
        std::process::exit(1);
    } else {
        println!("\n{} Template is valid!", style("✓").green().bold());
    }

    Ok(())
}
