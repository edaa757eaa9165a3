use clap::{Args, Parser, Subcommand};
use phipsi::engine::config::LookupScope;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "phipsi - backbone phi/psi analysis, secondary-structure assignment and Ramachandran plots for protein structures.",
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
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute phi/psi torsions of a PDB structure and assign secondary structure.
    Analyze(AnalyzeArgs),
    /// Classify a single (phi, psi) pair.
    Classify(ClassifyArgs),
}

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    // --- Input ---
    /// Path to the input structure in PDB format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path to a configuration file in TOML format.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Selection ---
    /// Chain to analyze and to look the target residue up in [default: A].
    #[arg(short, long, value_name = "ID")]
    pub chain: Option<String>,

    /// Sequence number of a residue to report individually.
    #[arg(short, long, value_name = "INT", allow_negative_numbers = true)]
    pub residue: Option<isize>,

    /// Analyze every chain of the first model instead of the selected chain only.
    #[arg(long)]
    pub all_chains: bool,

    /// Where the target residue is searched: the whole structure or the selected chain.
    #[arg(long, value_name = "SCOPE")]
    pub lookup_scope: Option<LookupScope>,

    /// Secondary-structure threshold windows in TOML format.
    #[arg(long, value_name = "PATH")]
    pub rules: Option<PathBuf>,

    // --- Outputs ---
    /// Render a Ramachandran plot.
    #[arg(long)]
    pub plot: bool,

    /// Output path of the plot; implies --plot [default: ramachandran_plot.svg].
    #[arg(long, value_name = "PATH")]
    pub plot_output: Option<PathBuf>,

    /// Title drawn above the plot.
    #[arg(long, value_name = "TEXT")]
    pub plot_title: Option<String>,

    /// Write the torsion table as CSV.
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,

    /// Print label counts after the residue table.
    #[arg(long)]
    pub summary: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S segmentation.peptide-bond-cutoff=2.0
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `classify` subcommand.
#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Phi angle in degrees.
    #[arg(long, value_name = "DEGREES", allow_negative_numbers = true)]
    pub phi: f64,

    /// Psi angle in degrees.
    #[arg(long, value_name = "DEGREES", allow_negative_numbers = true)]
    pub psi: f64,

    /// Path to a configuration file whose `[rules]` table is used.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Secondary-structure threshold windows in TOML format.
    #[arg(long, value_name = "PATH")]
    pub rules: Option<PathBuf>,
}
