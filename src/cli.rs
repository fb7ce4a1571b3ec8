use crate::config::{CliOverrides, Config};
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mdscaffold")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Materialize deployment files embedded in a markdown pattern document")]
#[command(
    long_about = "mdscaffold reads a deployment-pattern document, finds the Dockerfiles, \
                  nginx config, docker-compose file and deploy workflow embedded in it, \
                  and writes them out as real files, creating directories as needed."
)]
#[command(after_help = "EXAMPLES:\n  \
    mdscaffold\n  \
    mdscaffold --input docs/deploy_pattern_prompt.md --output ./project\n  \
    mdscaffold --dry-run --output-format json")]
pub struct Cli {
    /// Source document (defaults to deploy_pattern_prompt.md)
    #[arg(short, long, help = "Path to the pattern document to read")]
    pub input: Option<PathBuf>,

    /// Directory the extracted paths are written under
    #[arg(short, long, help = "Output root directory (default: current directory)")]
    pub output: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Dry run (show what would be written without writing)
    #[arg(long, help = "List the files that would be created without writing them")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_document(self.input.clone())
            .with_output_dir(self.output.clone())
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}
