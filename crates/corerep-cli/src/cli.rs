use clap::{Args, Parser, Subcommand};
use corerep::core::pair::DerivativeOrder;
use corerep::engine::config::RepulsionMethod;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "corerep - core-core repulsion energies and derivatives for MNDO and AM1.",
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

    /// Set the number of threads for the pair computations.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute the core-core repulsion energy (and derivatives) of a geometry.
    Compute(ComputeArgs),
    /// Print or export the built-in element parameters of a method.
    Params(ParamsArgs),
}

/// Arguments for the `compute` subcommand.
#[derive(Args, Debug, Clone)]
pub struct ComputeArgs {
    /// Path to the input geometry in XYZ format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Write the full report (energy and derivatives) to this TOML file.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Path to a run configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Element parameter file overriding the method's built-in parameters.
    #[arg(short, long, value_name = "PATH")]
    pub params: Option<PathBuf>,

    /// Semiempirical method (am1 or mndo).
    #[arg(short, long, value_name = "METHOD")]
    pub method: Option<RepulsionMethod>,

    /// Derivative order: energy, gradient, hessian-atomic or hessian-full.
    #[arg(long, value_name = "ORDER")]
    pub order: Option<DerivativeOrder>,

    /// Minimum number of atom pairs handled by one parallel task.
    #[arg(long, value_name = "INT")]
    pub min_pairs_per_task: Option<usize>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S calculation.order=gradient
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `params` subcommand.
#[derive(Args, Debug, Clone)]
pub struct ParamsArgs {
    /// Method whose built-in parameters are exported.
    #[arg(short, long, value_name = "METHOD", default_value = "am1")]
    pub method: RepulsionMethod,

    /// Write the parameters to this file instead of standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}
