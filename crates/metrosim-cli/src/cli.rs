use clap::{Args, Parser, Subcommand};
use metrosim::engine::evaluator::Backend;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Nathan Coleman, Albert Wallace, Joshua Mosby",
    version,
    about = "metrosim - Monte Carlo simulation of rigid molecules in a periodic box, with sequential and parallel energy backends.",
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

    /// Set the number of threads used by the parallel backend.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a new box from a configuration file and run the simulation.
    Run(RunArgs),
    /// Continue a simulation from a saved state file.
    Resume(ResumeArgs),
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to the simulation configuration file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub config: PathBuf,

    /// Override the random seed from the config file.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    #[command(flatten)]
    pub overrides: RunOverrides,
}

/// Arguments for the `resume` subcommand.
#[derive(Args, Debug)]
pub struct ResumeArgs {
    /// Path to the state file to resume from.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub state: PathBuf,

    /// Optional configuration file supplying `[simulation]` and `[files]` settings.
    /// The `[environment]` section is ignored; the state file defines the box.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: RunOverrides,
}

/// Overrides shared by `run` and `resume`.
#[derive(Args, Debug, Default)]
pub struct RunOverrides {
    #[command(flatten)]
    pub backend: BackendFlags,

    /// Override the number of Monte Carlo steps.
    #[arg(short = 'n', long, value_name = "INT")]
    pub steps: Option<usize>,

    /// Name of the run; used as the stem of every output file.
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// Override the directory that receives state, trajectory and results files.
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Print a status line every this many steps (0 disables).
    #[arg(long, value_name = "INT")]
    pub status_interval: Option<usize>,

    /// Write a state file every this many steps (0 disables).
    #[arg(long, value_name = "INT")]
    pub state_interval: Option<usize>,

    /// Do not write a state file at the end of the run.
    #[arg(long)]
    pub no_final_state: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S simulation.steps=5000
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Mutually exclusive backend selection.
#[derive(Args, Debug, Clone, Copy, Default)]
#[group(required = false, multiple = false)]
pub struct BackendFlags {
    /// Evaluate energies on a single thread.
    #[arg(long)]
    pub serial: bool,
    /// Evaluate energies on the rayon thread pool.
    #[arg(long)]
    pub parallel: bool,
}

impl BackendFlags {
    pub fn selected(self) -> Option<Backend> {
        match (self.serial, self.parallel) {
            (true, false) => Some(Backend::Sequential),
            (false, true) => Some(Backend::Parallel),
            _ => None,
        }
    }
}
