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
    version,
    about = "qcflow - batch automation for quantum-chemistry calculations: \
             generate input decks, run them sequentially through an external \
             engine, and collect the resulting energies.",
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
    /// Generate engine input decks from a directory of XYZ geometries.
    Generate(GenerateArgs),
    /// Run calculations for a directory of XYZ geometries, one at a time.
    Run(RunArgs),
    /// Collect SCF energies from finished log files into a JSON table.
    Collect(CollectArgs),
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Directory containing .xyz geometry files.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub geometries: PathBuf,

    /// Directory the decks are written to. Defaults to the geometry
    /// directory.
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Methods to generate decks for. Defaults to every registered method
    /// that runs as an independent job.
    #[arg(short, long, value_name = "NAME", num_args(0..))]
    pub methods: Vec<String>,

    /// Basis set used for every generated deck.
    #[arg(short, long, default_value = "cc-pVDZ", value_name = "NAME")]
    pub basis_set: String,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Directory containing .xyz geometry files.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub geometries: PathBuf,

    /// Methods to run. Defaults to every registered method that runs as an
    /// independent job.
    #[arg(short, long, value_name = "NAME", num_args(0..))]
    pub methods: Vec<String>,

    /// Basis set used for every job.
    #[arg(short, long, default_value = "cc-pVDZ", value_name = "NAME")]
    pub basis_set: String,

    /// Engine configuration file in TOML format (executable, file
    /// extensions, subprocess timeout).
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory the jobs run in. Created if missing. Defaults to the
    /// current directory.
    #[arg(short = 'd', long, value_name = "DIR")]
    pub work_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct CollectArgs {
    /// Directory containing finished .log files.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub logs: PathBuf,

    /// Write the JSON energy table here instead of stdout.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}
