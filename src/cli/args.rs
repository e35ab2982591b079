//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    asset::AssetCommands, catalog::CatalogArgs, completions::CompletionsArgs,
    generate::GenerateArgs, init::InitArgs, validate::ValidateArgs,
};

#[derive(Parser)]
#[command(name = "pmc")]
#[command(author, version, about = "PM Creator - preventive maintenance plans from asset descriptions")]
#[command(long_about = "Describe a maintained asset (subsystems, components, operating context) as a \
plain YAML file and generate its preventive-maintenance task list: what to do, how often, how to \
check it and who is responsible.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logging on stderr)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Project root (default: auto-detect by finding .pmc/)
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new PMC project
    Init(InitArgs),

    /// Asset management (context, subsystems, components)
    #[command(subcommand)]
    Asset(AssetCommands),

    /// Generate the PM task list for one or all assets
    Generate(GenerateArgs),

    /// Show the rule catalog
    Catalog(CatalogArgs),

    /// Validate asset files against the schema
    Validate(ValidateArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (yaml for show, tsv for lists)
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets and CMMS upload)
    Csv,
    /// Markdown tables
    Md,
    /// Just IDs, one per line
    Id,
}

impl OutputFormat {
    /// Replace `Auto` with a configured default, then with `fallback`
    pub fn resolve(self, configured: Option<&str>, fallback: OutputFormat) -> OutputFormat {
        if self != OutputFormat::Auto {
            return self;
        }
        match configured.map(|s| <OutputFormat as ValueEnum>::from_str(s, true)) {
            Some(Ok(format)) if format != OutputFormat::Auto => format,
            Some(Err(_)) => {
                tracing::warn!(format = ?configured, "ignoring unknown default_format");
                fallback
            }
            _ => fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_format_resolution() {
        assert_eq!(
            OutputFormat::Json.resolve(Some("csv"), OutputFormat::Tsv),
            OutputFormat::Json
        );
        assert_eq!(
            OutputFormat::Auto.resolve(Some("md"), OutputFormat::Tsv),
            OutputFormat::Md
        );
        assert_eq!(
            OutputFormat::Auto.resolve(Some("nonsense"), OutputFormat::Tsv),
            OutputFormat::Tsv
        );
        assert_eq!(OutputFormat::Auto.resolve(None, OutputFormat::Yaml), OutputFormat::Yaml);
    }
}
