use std::path::PathBuf;

use console::style;
use miette::Result;

use scriptgen::check::check_all;

use super::build_generator;
use crate::cli::GeneratorArgs;

pub fn run(dir: PathBuf, args: GeneratorArgs) -> Result<()> {
    let results = check_all(&dir, |start| build_generator(start, args.clone()))?;

    if results.is_empty() {
        println!("No templates found under {}", style(dir.display()).cyan());
        return Ok(());
    }

    println!(
        "{} ({}):\n",
        style("Templates").bold(),
        style(dir.display()).cyan()
    );

    for result in &results {
        let rel = result
            .template
            .strip_prefix(&dir)
            .unwrap_or(&result.template)
            .display();

        match &result.plan {
            Some(plan) => println!(
                "  {} {}  {} {} {}",
                style("✓").green(),
                style(rel).cyan(),
                style(&plan.type_name).bold(),
                style("->").dim(),
                plan.output_path.file_name().unwrap_or_default().to_string_lossy()
            ),
            None => println!(
                "  {} {}  {}",
                style("✗").red(),
                style(rel).cyan(),
                result.errors.join("; ")
            ),
        }
    }

    let failed = results.iter().filter(|r| !r.is_valid()).count();
    println!(
        "\n{} template(s), {} with errors",
        results.len(),
        failed
    );

    Ok(())
}
