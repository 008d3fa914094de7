use bioview::engine::config::ConnectivityStrategy;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "BioView Developers",
    version,
    about = "BioView CLI - Inspect PDB and XYZ molecular structure files: composition, subunits, trajectories and bonds.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used for parallel parsing.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a structure file and print a summary of its contents.
    Inspect(InspectArgs),
}

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Path to the structure file (.pdb, .ent or .xyz).
    #[arg(value_name = "PATH")]
    pub input: PathBuf,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Generate bonds for every model, overriding the config file.
    #[arg(short, long)]
    pub bonds: bool,

    /// Override the bonding distance threshold, in ångström.
    #[arg(long, value_name = "FLOAT")]
    pub threshold: Option<f32>,

    /// Override the pair search strategy ('brute-force' or 'spatial-index').
    #[arg(long, value_name = "NAME")]
    pub strategy: Option<ConnectivityStrategy>,

    /// Override the number of lines classified per parallel block.
    #[arg(long, value_name = "LINES")]
    pub block_size: Option<usize>,

    /// Maximum number of parse warnings to list in the summary.
    #[arg(long, value_name = "NUM", default_value_t = 20)]
    pub max_warnings: usize,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S connectivity.threshold=1.8
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}
