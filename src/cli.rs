use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "scriptgen",
    about = "Generate source files from self-describing template scripts",
    version
)]
pub struct Cli {
    /// Log each pipeline stage to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the source file declared by a template document
    Generate {
        /// Template document (e.g. Player.template.rs)
        path: PathBuf,

        #[command(flatten)]
        generator: GeneratorArgs,

        /// Show the file that would be generated without writing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate a template document and dry-run its generation logic
    Check {
        /// Template document to check
        path: PathBuf,

        #[command(flatten)]
        generator: GeneratorArgs,
    },

    /// List template documents under a directory and what they generate
    List {
        /// Directory to search (default: current directory)
        #[arg(default_value = ".")]
        dir: PathBuf,

        #[command(flatten)]
        generator: GeneratorArgs,
    },
}

/// Overrides applied on top of scriptgen.toml.
#[derive(Args, Clone, Default)]
pub struct GeneratorArgs {
    /// Additional directory to search for generator scripts (can be repeated)
    #[arg(long = "scripts", value_name = "DIR")]
    pub scripts: Vec<PathBuf>,

    /// Source extension of generated files (templates use .template.<EXT>)
    #[arg(long, value_name = "EXT")]
    pub extension: Option<String>,

    /// Contract the template's generation type must implement
    #[arg(long, value_name = "NAME")]
    pub contract: Option<String>,
}
